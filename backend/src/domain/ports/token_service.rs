//! Port for minting and checking signed session tokens.

use chrono::{DateTime, Utc};

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Reasons a token could not be issued or was rejected.
    ///
    /// Rejection causes are for logs only. Inbound adapters collapse every
    /// rejection into one generic unauthenticated response.
    pub enum TokenError {
        /// The token is not a structurally valid signed token.
        Malformed { message: String } => "token is malformed: {message}",
        /// The signature does not match the configured secret.
        BadSignature => "token signature does not match",
        /// The header names an algorithm other than the accepted one.
        WrongAlgorithm => "token algorithm is not accepted",
        /// The current time is at or past the expiry.
        Expired => "token has expired",
        /// The subject claim does not hold a valid user id.
        InvalidSubject { message: String } => "token subject is invalid: {message}",
        /// Signing a new token failed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// A freshly minted token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Claims recovered from a token that passed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedSession {
    pub user_id: UserId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Stateless token issuer and verifier.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Mint a token for `subject` expiring after the configured lifetime.
    fn issue(&self, subject: UserId) -> Result<IssuedToken, TokenError>;

    /// Check signature, algorithm, and expiry, returning the session claims.
    fn verify(&self, token: &str) -> Result<VerifiedSession, TokenError>;
}
