//! Port for persisting uploaded images.
use async_trait::async_trait;

use crate::domain::{ImageUpload, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ImageStoreError {
        /// No storage backend is configured for uploads.
        NotConfigured => "image upload feature not configured",
        /// Writing the object failed.
        Io { message: String } => "image store write failed: {message}",
    }
}

/// Location of a stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Object key relative to the store root, e.g. `uploads/1/<uuid>.png`.
    pub key: String,
    /// Public URL clients can place in a todo's `imageUrl`.
    pub url: String,
}

/// Object storage for todo images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `image` under the owner's namespace.
    async fn store(&self, owner: UserId, image: &ImageUpload)
    -> Result<StoredImage, ImageStoreError>;
}

/// Store used when uploads are not configured; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledImageStore;

#[async_trait]
impl ImageStore for DisabledImageStore {
    async fn store(
        &self,
        _owner: UserId,
        _image: &ImageUpload,
    ) -> Result<StoredImage, ImageStoreError> {
        Err(ImageStoreError::NotConfigured)
    }
}
