//! Domain primitives, aggregates, ports, and services.
//!
//! Purpose: define strongly typed entities shared by the HTTP and
//! persistence layers, plus the services that implement the driving ports.
//! Types validate on construction so downstream code never re-checks them.
//!
//! Public surface:
//! - Error / ErrorCode: the error taxonomy returned to clients.
//! - User, Email, UserId: account identity.
//! - Todo, TodoPatch, TodoStatus: the todo aggregate and its updates.
//! - PasswordHasher: Argon2 hashing with timing-equalised misses.
//! - authorize / AccessDecision: the ownership guard.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod image;
pub mod image_upload_service;
pub mod ownership;
pub mod password;
pub mod ports;
pub mod todo;
pub mod todo_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::{AccountService, INVALID_CREDENTIALS_MESSAGE};
pub use self::auth::{
    CredentialsValidationError, LoginCredentials, PASSWORD_MIN, RegistrationCredentials,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::image::{ImageContentType, ImageUpload, ImageValidationError, MAX_IMAGE_BYTES};
pub use self::image_upload_service::ImageUploadService;
pub use self::ownership::{AccessDecision, FORBIDDEN_MESSAGE, OwnedResource, authorize};
pub use self::password::{PasswordDigest, PasswordHashError, PasswordHasher};
pub use self::todo::{
    DESCRIPTION_MAX, ImageUrl, NewTodo, Patch, TITLE_MAX, Todo, TodoDescription, TodoDraft,
    TodoId, TodoPatch, TodoStatus, TodoTitle, TodoValidationError,
};
pub use self::todo_service::TodoService;
pub use self::trace_id::TraceId;
pub use self::user::{
    EMAIL_MAX, Email, NewUserAccount, User, UserAccount, UserId, UserValidationError,
};

/// Convenient result alias for driving-port and handler code.
///
/// # Examples
/// ```
/// use todo_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
