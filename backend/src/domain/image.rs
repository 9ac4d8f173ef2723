//! Image attachments uploaded for todos.

use std::fmt;

/// Largest accepted upload, in bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Accepted image media types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageContentType {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageContentType {
    /// Parse a media type, ignoring parameters such as `; charset=`.
    pub fn parse(value: &str) -> Option<Self> {
        let essence = value.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Parse a declared `Content-Type`, which must be present and supported.
    pub fn from_header(value: Option<&str>) -> Result<Self, ImageValidationError> {
        let raw = value.ok_or(ImageValidationError::MissingContentType)?;
        Self::parse(raw).ok_or_else(|| ImageValidationError::UnsupportedContentType {
            value: raw.to_owned(),
        })
    }

    /// Canonical media type string.
    pub fn as_mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    /// File extension used for stored objects.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

/// Validation failures for image uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageValidationError {
    MissingContentType,
    UnsupportedContentType { value: String },
    Empty,
    TooLarge { max: usize },
}

impl fmt::Display for ImageValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingContentType => write!(f, "image content type is required"),
            Self::UnsupportedContentType { value } => write!(
                f,
                "unsupported image type {value}; expected image/jpeg, image/png, image/gif, or image/webp"
            ),
            Self::Empty => write!(f, "image must not be empty"),
            Self::TooLarge { max } => write!(f, "image must be at most {max} bytes"),
        }
    }
}

impl std::error::Error for ImageValidationError {}

/// A validated image ready to be stored.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    content_type: ImageContentType,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Validate the declared content type and body size.
    pub fn try_new(content_type: Option<&str>, bytes: Vec<u8>) -> Result<Self, ImageValidationError> {
        let content_type = ImageContentType::from_header(content_type)?;
        if bytes.is_empty() {
            return Err(ImageValidationError::Empty);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ImageValidationError::TooLarge {
                max: MAX_IMAGE_BYTES,
            });
        }
        Ok(Self {
            content_type,
            bytes,
        })
    }

    pub fn content_type(&self) -> ImageContentType {
        self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("image/jpeg", ImageContentType::Jpeg)]
    #[case("IMAGE/PNG", ImageContentType::Png)]
    #[case("image/gif; foo=bar", ImageContentType::Gif)]
    #[case("image/webp", ImageContentType::Webp)]
    fn parses_supported_types(#[case] raw: &str, #[case] expected: ImageContentType) {
        assert_eq!(ImageContentType::parse(raw), Some(expected));
    }

    #[rstest]
    fn rejects_unsupported_type() {
        let err = ImageUpload::try_new(Some("application/pdf"), vec![1]).expect_err("rejected");
        assert_eq!(
            err,
            ImageValidationError::UnsupportedContentType {
                value: "application/pdf".to_owned()
            }
        );
    }

    #[rstest]
    fn rejects_missing_type_and_empty_body() {
        assert_eq!(
            ImageUpload::try_new(None, vec![1]),
            Err(ImageValidationError::MissingContentType)
        );
        assert_eq!(
            ImageUpload::try_new(Some("image/png"), Vec::new()),
            Err(ImageValidationError::Empty)
        );
    }

    #[rstest]
    fn enforces_size_limit_inclusively() {
        assert!(ImageUpload::try_new(Some("image/png"), vec![0; MAX_IMAGE_BYTES]).is_ok());
        assert_eq!(
            ImageUpload::try_new(Some("image/png"), vec![0; MAX_IMAGE_BYTES + 1]),
            Err(ImageValidationError::TooLarge {
                max: MAX_IMAGE_BYTES
            })
        );
    }
}
