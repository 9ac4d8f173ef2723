//! Driving port for todo reads.

use async_trait::async_trait;

use crate::domain::{Error, Todo, TodoId, UserId};

/// Todo read use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoQuery: Send + Sync {
    /// All of `owner`'s todos, newest first.
    async fn list(&self, owner: UserId) -> Result<Vec<Todo>, Error>;

    /// A single todo, after the ownership check.
    async fn get(&self, owner: UserId, id: TodoId) -> Result<Todo, Error>;
}
