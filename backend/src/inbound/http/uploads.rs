//! Image upload handler.
//!
//! The request body is the raw image; its media type comes from the
//! `Content-Type` header. Bodies are read incrementally and rejected as soon
//! as they exceed [`MAX_IMAGE_BYTES`].
//!
//! ```text
//! POST /api/uploads/images
//! Content-Type: image/png
//! <bytes>
//! ```

use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpRequest, post, web};
use futures_util::StreamExt;
use tracing::debug;

use crate::domain::ports::UploadedImage;
use crate::domain::{
    Error, ImageContentType, ImageUpload, ImageValidationError, MAX_IMAGE_BYTES,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::image_error;

async fn read_capped(mut payload: web::Payload, limit: usize) -> Result<Vec<u8>, Error> {
    let mut body = Vec::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|err| {
            debug!(error = %err, "upload body read failed");
            Error::invalid_request("failed to read request body")
        })?;
        if body.len() + chunk.len() > limit {
            return Err(image_error(ImageValidationError::TooLarge { max: limit }));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Upload an image and receive its public URL.
#[utoipa::path(
    post,
    path = "/api/uploads/images",
    request_body(content = Vec<u8>, content_type = "image/png", description = "Raw image bytes"),
    responses(
        (status = 200, description = "Image stored", body = UploadedImage),
        (status = 400, description = "Missing, empty, oversized, or unsupported image", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Uploads not configured", body = Error)
    ),
    tags = ["uploads"],
    operation_id = "uploadImage"
)]
#[post("/images")]
pub async fn upload_image(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    req: HttpRequest,
    payload: web::Payload,
) -> ApiResult<web::Json<UploadedImage>> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    // Reject unsupported types before buffering anything.
    ImageContentType::from_header(content_type.as_deref()).map_err(image_error)?;
    let bytes = read_capped(payload, MAX_IMAGE_BYTES).await?;
    let image = ImageUpload::try_new(content_type.as_deref(), bytes).map_err(image_error)?;
    let uploaded = state.uploads.upload(user.user_id(), image).await?;
    Ok(web::Json(uploaded))
}
