//! Registration and login.
//!
//! Registration: validate (done by the caller's credential type), check the
//! email is free, hash, persist, return the user. Login: look up, verify,
//! issue a token. An unknown email and a wrong password produce the same
//! error, and the unknown-email path still runs one verification against a
//! dummy digest.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error, info};

use crate::domain::ports::{
    AccountCommand, LoginSession, TokenService, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, NewUserAccount, PasswordHasher, RegistrationCredentials, User,
};

/// Message shared by every failed login.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid email or password";

/// Account service implementing the [`AccountCommand`] driving port.
#[derive(Clone)]
pub struct AccountService<R> {
    users: Arc<R>,
    hasher: PasswordHasher,
    tokens: Arc<dyn TokenService>,
}

impl<R> AccountService<R> {
    /// Create the service from its collaborators.
    pub fn new(users: Arc<R>, hasher: PasswordHasher, tokens: Arc<dyn TokenService>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            error!(%message, "user repository connection failed");
            Error::service_unavailable("user repository unavailable")
        }
        UserPersistenceError::Query { message } => {
            error!(%message, "user repository query failed");
            Error::internal("user repository error")
        }
        UserPersistenceError::DuplicateEmail => email_taken(),
    }
}

fn email_taken() -> Error {
    Error::conflict("email is already registered")
        .with_details(json!({ "field": "email", "code": "email_taken" }))
}

#[async_trait]
impl<R> AccountCommand for AccountService<R>
where
    R: UserRepository,
{
    async fn register(&self, credentials: RegistrationCredentials) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?;
        if existing.is_some() {
            debug!("registration rejected: email already registered");
            return Err(email_taken());
        }

        let password_hash = self
            .hasher
            .hash_blocking(credentials.password())
            .await
            .map_err(|err| {
                error!(error = %err, "password hashing failed during registration");
                Error::internal("failed to hash password")
            })?;

        let account = NewUserAccount {
            email: credentials.email().clone(),
            password_hash,
        };
        // A concurrent registration can pass the check above; the unique
        // index turns that into DuplicateEmail here.
        let created = self
            .users
            .create(&account)
            .await
            .map_err(map_user_persistence_error)?;

        info!(user_id = %created.user.id, "user registered");
        Ok(created.user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<LoginSession, Error> {
        let account = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?;

        let Some(account) = account else {
            self.hasher
                .verify_dummy_blocking(credentials.password())
                .await;
            debug!("login rejected: unknown email");
            return Err(Error::invalid_credentials(INVALID_CREDENTIALS_MESSAGE));
        };

        let verified = self
            .hasher
            .verify_blocking(credentials.password(), &account.password_hash)
            .await
            .map_err(|err| {
                error!(user_id = %account.user.id, error = %err, "password verification failed");
                Error::internal("failed to verify password")
            })?;
        if !verified {
            debug!(user_id = %account.user.id, "login rejected: password mismatch");
            return Err(Error::invalid_credentials(INVALID_CREDENTIALS_MESSAGE));
        }

        let issued = self.tokens.issue(account.user.id).map_err(|err| {
            error!(user_id = %account.user.id, error = %err, "token issuance failed");
            Error::internal("failed to issue session token")
        })?;

        info!(user_id = %account.user.id, "user logged in");
        Ok(LoginSession {
            token: issued.token,
            expires_at: issued.expires_at,
            user: account.user,
        })
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
