//! Image upload use-case.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::ports::{ImageStore, ImageStoreError, ImageUploadCommand, UploadedImage};
use crate::domain::{Error, ImageUpload, UserId};

/// Stores validated uploads through an [`ImageStore`].
#[derive(Clone)]
pub struct ImageUploadService<S> {
    store: Arc<S>,
}

impl<S> ImageUploadService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> ImageUploadCommand for ImageUploadService<S>
where
    S: ImageStore,
{
    async fn upload(&self, owner: UserId, image: ImageUpload) -> Result<UploadedImage, Error> {
        match self.store.store(owner, &image).await {
            Ok(stored) => {
                info!(
                    user_id = %owner,
                    key = %stored.key,
                    bytes = image.bytes().len(),
                    "image stored"
                );
                Ok(UploadedImage {
                    image_url: stored.url,
                })
            }
            Err(ImageStoreError::NotConfigured) => Err(Error::service_unavailable(
                ImageStoreError::NotConfigured.to_string(),
            )),
            Err(err @ ImageStoreError::Io { .. }) => {
                error!(user_id = %owner, error = %err, "image store write failed");
                Err(Error::internal("failed to store image"))
            }
        }
    }
}
