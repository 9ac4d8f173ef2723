//! Driving port for image uploads.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, ImageUpload, UserId};

/// Response body of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    #[schema(example = "http://localhost:8080/uploads/1/0b6c0f5e.png")]
    pub image_url: String,
}

/// Image upload use-case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageUploadCommand: Send + Sync {
    /// Store a validated image for `owner`.
    ///
    /// # Errors
    ///
    /// `ServiceUnavailable` when uploads are not configured.
    async fn upload(&self, owner: UserId, image: ImageUpload) -> Result<UploadedImage, Error>;
}
