//! Driving port for registration and login.
//!
//! HTTP handlers call this port with credentials that already passed shape
//! validation. Implementations own uniqueness, hashing, and token issuance.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, RegistrationCredentials, User};

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginSession {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    /// Instant after which the token is rejected.
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Account use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account.
    ///
    /// # Errors
    ///
    /// - `Conflict` when the email is already registered, including when a
    ///   concurrent registration wins the race.
    /// - `ServiceUnavailable` or `InternalError` for storage and hashing
    ///   failures.
    async fn register(&self, credentials: RegistrationCredentials) -> Result<User, Error>;

    /// Authenticate and mint a session token.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for both an unknown email and a wrong password.
    async fn login(&self, credentials: LoginCredentials) -> Result<LoginSession, Error>;
}
