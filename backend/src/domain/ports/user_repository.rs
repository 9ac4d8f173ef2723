//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Email, NewUserAccount, User, UserAccount, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The email unique constraint rejected an insert.
        DuplicateEmail => "email is already registered",
    }
}

/// Storage for registered accounts.
///
/// Email lookups are exact matches. Implementations must enforce email
/// uniqueness at insert time and report a violation as
/// [`UserPersistenceError::DuplicateEmail`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account and return it with its assigned id and timestamps.
    async fn create(&self, account: &NewUserAccount) -> Result<UserAccount, UserPersistenceError>;

    /// Fetch an account, including its password digest, by email.
    async fn find_by_email(&self, email: &Email)
    -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Fetch the public user record by identifier.
    ///
    /// Part of the storage contract for adapters; no use-case calls it yet.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;
}
