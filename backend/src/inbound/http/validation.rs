//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every field-level failure becomes `invalid_request` with
//! `details: {field, code}` so clients can highlight the offending input.

use serde_json::json;

use crate::domain::{Error, ImageValidationError, TodoId, TodoValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
    EmptyTitle,
    TitleTooLong,
    TitleNotClearable,
    DescriptionTooLong,
    InvalidImageUrl,
    InvalidStatus,
    MissingContentType,
    UnsupportedContentType,
    EmptyImage,
    ImageTooLarge,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::EmptyTitle => "empty_title",
            ErrorCode::TitleTooLong => "title_too_long",
            ErrorCode::TitleNotClearable => "title_not_clearable",
            ErrorCode::DescriptionTooLong => "description_too_long",
            ErrorCode::InvalidImageUrl => "invalid_image_url",
            ErrorCode::InvalidStatus => "invalid_status",
            ErrorCode::MissingContentType => "missing_content_type",
            ErrorCode::UnsupportedContentType => "unsupported_content_type",
            ErrorCode::EmptyImage => "empty_image",
            ErrorCode::ImageTooLarge => "image_too_large",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

const ID: FieldName = FieldName::new("id");
const TITLE: FieldName = FieldName::new("title");
const DESCRIPTION: FieldName = FieldName::new("description");
const IMAGE_URL: FieldName = FieldName::new("imageUrl");
const STATUS: FieldName = FieldName::new("status");
const CONTENT_TYPE: FieldName = FieldName::new("contentType");
const BODY: FieldName = FieldName::new("body");

/// Builder for validation errors with field context.
struct ValidationError {
    field: FieldName,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field.as_str(),
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field.as_str(),
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

/// Validate a raw path id.
pub(crate) fn parse_todo_id(raw: i64) -> Result<TodoId, Error> {
    TodoId::new(raw).map_err(|_| {
        ValidationError::new(ID, "id must be a positive integer")
            .with_value(ErrorCode::InvalidId, raw.to_string())
    })
}

/// Map a todo field failure onto the field that caused it.
pub(crate) fn todo_field_error(err: TodoValidationError) -> Error {
    let message = err.to_string();
    match err {
        TodoValidationError::NonPositiveId => {
            ValidationError::new(ID, message).with_code(ErrorCode::InvalidId)
        }
        TodoValidationError::EmptyTitle => {
            ValidationError::new(TITLE, message).with_code(ErrorCode::EmptyTitle)
        }
        TodoValidationError::TitleTooLong { .. } => {
            ValidationError::new(TITLE, message).with_code(ErrorCode::TitleTooLong)
        }
        TodoValidationError::DescriptionTooLong { .. } => {
            ValidationError::new(DESCRIPTION, message).with_code(ErrorCode::DescriptionTooLong)
        }
        TodoValidationError::InvalidImageUrl => {
            ValidationError::new(IMAGE_URL, message).with_code(ErrorCode::InvalidImageUrl)
        }
        TodoValidationError::UnknownStatus { value } => {
            ValidationError::new(STATUS, message).with_value(ErrorCode::InvalidStatus, value)
        }
    }
}

pub(crate) fn title_not_clearable_error() -> Error {
    ValidationError::new(TITLE, "title cannot be cleared").with_code(ErrorCode::TitleNotClearable)
}

pub(crate) fn image_error(err: ImageValidationError) -> Error {
    let message = err.to_string();
    match err {
        ImageValidationError::MissingContentType => {
            ValidationError::new(CONTENT_TYPE, message).with_code(ErrorCode::MissingContentType)
        }
        ImageValidationError::UnsupportedContentType { value } => {
            ValidationError::new(CONTENT_TYPE, message)
                .with_value(ErrorCode::UnsupportedContentType, value)
        }
        ImageValidationError::Empty => {
            ValidationError::new(BODY, message).with_code(ErrorCode::EmptyImage)
        }
        ImageValidationError::TooLarge { .. } => {
            ValidationError::new(BODY, message).with_code(ErrorCode::ImageTooLarge)
        }
    }
}
