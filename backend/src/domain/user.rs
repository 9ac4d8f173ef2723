//! User data model.
//!
//! [`User`] is the outward projection of an account and never carries the
//! password digest. [`UserAccount`] pairs it with the stored digest for the
//! authentication service and repositories only.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::PasswordDigest;

/// Validation errors raised by user primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Identifiers are assigned by storage and are always positive.
    NonPositiveId,
    /// The email address was empty.
    EmptyEmail,
    /// The email address exceeded the storage column width.
    EmailTooLong { max: usize },
    /// The email address is not shaped like `local@domain.tld`.
    InvalidEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "user id must be a positive integer"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "email must be a valid email address"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Storage-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Validate and wrap a raw identifier.
    pub fn new(id: i64) -> Result<Self, UserValidationError> {
        if id <= 0 {
            return Err(UserValidationError::NonPositiveId);
        }
        Ok(Self(id))
    }

    /// Raw integer value as stored.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum accepted email length, matching the `users.email` column.
pub const EMAIL_MAX: usize = 320;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address used as the login identifier.
///
/// Comparison is exact: no case folding or trimming is applied, so
/// `Ada@example.com` and `ada@example.com` are distinct accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    ///
    /// # Examples
    /// ```
    /// use todo_backend::domain::Email;
    ///
    /// assert!(Email::new("a@x.com").is_ok());
    /// assert!(Email::new("not-an-email").is_err());
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(email.into())
    }

    fn from_owned(email: String) -> Result<Self, UserValidationError> {
        if email.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if email.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Registered user as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = i64, example = 1)]
    pub id: UserId,
    #[schema(value_type = String, example = "a@x.com")]
    pub email: Email,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored account: the public user plus its password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub user: User,
    pub password_hash: PasswordDigest,
}

/// Account data handed to storage on registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserAccount {
    pub email: Email,
    pub password_hash: PasswordDigest,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(-7)]
    fn user_id_rejects_non_positive_values(#[case] raw: i64) {
        assert_eq!(UserId::new(raw), Err(UserValidationError::NonPositiveId));
    }

    #[rstest]
    #[case("a@x.com")]
    #[case("first.last+tag@sub.example.org")]
    fn email_accepts_well_formed_addresses(#[case] raw: &str) {
        let email = Email::new(raw).expect("valid email");
        assert_eq!(email.as_ref(), raw);
    }

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("plainaddress", UserValidationError::InvalidEmail)]
    #[case("a@b", UserValidationError::InvalidEmail)]
    #[case(" a@x.com", UserValidationError::InvalidEmail)]
    #[case("a b@x.com", UserValidationError::InvalidEmail)]
    fn email_rejects_malformed_addresses(
        #[case] raw: &str,
        #[case] expected: UserValidationError,
    ) {
        assert_eq!(Email::new(raw), Err(expected));
    }

    #[rstest]
    fn email_rejects_overlong_addresses() {
        let raw = format!("{}@x.com", "a".repeat(EMAIL_MAX));
        assert_eq!(
            Email::new(raw),
            Err(UserValidationError::EmailTooLong { max: EMAIL_MAX })
        );
    }

    #[rstest]
    fn email_comparison_is_case_sensitive() {
        let lower = Email::new("ada@example.com").expect("valid email");
        let upper = Email::new("Ada@example.com").expect("valid email");
        assert_ne!(lower, upper);
    }

    #[rstest]
    fn user_serialises_without_digest() {
        let now = Utc::now();
        let user = User {
            id: UserId::new(1).expect("valid id"),
            email: Email::new("a@x.com").expect("valid email"),
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&user).expect("serialise user");
        assert_eq!(value.get("id").and_then(serde_json::Value::as_i64), Some(1));
        assert!(value.get("createdAt").is_some());
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("password").is_none());
    }
}
