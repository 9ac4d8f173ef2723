//! In-memory `UserRepository`.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::Mutex;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, NewUserAccount, User, UserAccount, UserId};

#[derive(Default)]
struct Accounts {
    next_id: i64,
    rows: Vec<UserAccount>,
}

/// Account storage held in process memory.
pub struct InMemoryUserRepository {
    accounts: Mutex<Accounts>,
    clock: Arc<dyn Clock>,
}

impl InMemoryUserRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts: Mutex::new(Accounts::default()),
            clock,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, account: &NewUserAccount) -> Result<UserAccount, UserPersistenceError> {
        let mut accounts = self.accounts.lock().await;
        if accounts.rows.iter().any(|row| row.user.email == account.email) {
            return Err(UserPersistenceError::duplicate_email());
        }
        accounts.next_id += 1;
        let id = UserId::new(accounts.next_id)
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        let now = self.clock.utc();
        let created = UserAccount {
            user: User {
                id,
                email: account.email.clone(),
                created_at: now,
                updated_at: now,
            },
            password_hash: account.password_hash.clone(),
        };
        accounts.rows.push(created.clone());
        Ok(created)
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .rows
            .iter()
            .find(|row| &row.user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .rows
            .iter()
            .find(|row| row.user.id == id)
            .map(|row| row.user.clone()))
    }
}
