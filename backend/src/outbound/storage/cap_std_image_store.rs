//! Filesystem image store confined to one directory via `cap-std`.
//!
//! Objects land at `uploads/<user id>/<uuid>.<ext>` under the configured root
//! and are addressed publicly as `<public base>/uploads/...`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use url::Url;
use uuid::Uuid;

use crate::domain::ports::{ImageStore, ImageStoreError, StoredImage};
use crate::domain::{ImageUpload, UserId};

const KEY_PREFIX: &str = "uploads";

/// Failures while opening the upload root.
#[derive(Debug, thiserror::Error)]
pub enum ImageStoreSetupError {
    #[error("failed to open upload directory {path}: {source}")]
    OpenRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("public base URL {url} cannot carry a path")]
    InvalidBaseUrl { url: String },
}

/// [`ImageStore`] writing into a capability-scoped directory.
#[derive(Clone)]
pub struct CapStdImageStore {
    root: Arc<Dir>,
    public_base: Url,
}

impl CapStdImageStore {
    /// Open (creating if needed) `root` and serve objects under `public_base`.
    pub fn open(root: &Path, public_base: Url) -> Result<Self, ImageStoreSetupError> {
        let open_error = |source| ImageStoreSetupError::OpenRoot {
            path: root.to_path_buf(),
            source,
        };
        Dir::create_ambient_dir_all(root, ambient_authority()).map_err(open_error)?;
        let dir = Dir::open_ambient_dir(root, ambient_authority()).map_err(open_error)?;

        if public_base.cannot_be_a_base() {
            return Err(ImageStoreSetupError::InvalidBaseUrl {
                url: public_base.to_string(),
            });
        }
        let mut public_base = public_base;
        // `Url::join` replaces the last segment unless the path ends in '/'.
        if !public_base.path().ends_with('/') {
            let path = format!("{}/", public_base.path());
            public_base.set_path(&path);
        }

        Ok(Self {
            root: Arc::new(dir),
            public_base,
        })
    }

    fn public_url(&self, key: &str) -> Result<String, ImageStoreError> {
        self.public_base
            .join(key)
            .map(String::from)
            .map_err(|err| ImageStoreError::io(format!("cannot build public URL: {err}")))
    }
}

#[async_trait]
impl ImageStore for CapStdImageStore {
    async fn store(
        &self,
        owner: UserId,
        image: &ImageUpload,
    ) -> Result<StoredImage, ImageStoreError> {
        let directory = format!("{KEY_PREFIX}/{owner}");
        let key = format!(
            "{directory}/{}.{}",
            Uuid::new_v4(),
            image.content_type().extension()
        );

        let root = Arc::clone(&self.root);
        let bytes = image.bytes().to_vec();
        let path = key.clone();
        tokio::task::spawn_blocking(move || {
            root.create_dir_all(&directory)?;
            root.write(&path, bytes)
        })
        .await
        .map_err(|err| ImageStoreError::io(err.to_string()))?
        .map_err(|err| ImageStoreError::io(err.to_string()))?;

        let url = self.public_url(&key)?;
        Ok(StoredImage { key, url })
    }
}
