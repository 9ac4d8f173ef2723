//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, NewUserAccount, PasswordDigest, User, UserAccount, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
        return UserPersistenceError::duplicate_email();
    }
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn row_to_user(row: &UserRow) -> Result<User, UserPersistenceError> {
    let id = UserId::new(row.id).map_err(|err| {
        warn!(id = row.id, error = %err, "stored user row has invalid id");
        UserPersistenceError::query("stored user row is invalid")
    })?;
    let email = Email::new(row.email.clone()).map_err(|err| {
        warn!(id = row.id, error = %err, "stored user row has invalid email");
        UserPersistenceError::query("stored user row is invalid")
    })?;
    Ok(User {
        id,
        email,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let user = row_to_user(&row)?;
    Ok(UserAccount {
        user,
        password_hash: PasswordDigest::from_stored(row.password_hash),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, account: &NewUserAccount) -> Result<UserAccount, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            email: account.email.as_ref(),
            password_hash: account.password_hash.as_str(),
        };
        let row = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_account(row)
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_account).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.as_ref().map(row_to_user).transpose()
    }
}
