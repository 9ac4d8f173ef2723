//! Driving port for todo mutations.

use async_trait::async_trait;

use crate::domain::{Error, Todo, TodoDraft, TodoId, TodoPatch, TodoStatus, UserId};

/// Todo write use-cases. Every call acts on behalf of `owner`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoCommand: Send + Sync {
    /// Create a todo owned by `owner` in the `Pending` state.
    async fn create(&self, owner: UserId, draft: TodoDraft) -> Result<Todo, Error>;

    /// Apply a partial content update.
    ///
    /// # Errors
    ///
    /// `NoFieldsProvided` for an empty patch, before any storage access;
    /// otherwise `NotFound` or `Forbidden` from the ownership check.
    async fn update(&self, owner: UserId, id: TodoId, patch: TodoPatch) -> Result<Todo, Error>;

    /// Move a todo to `status`.
    async fn update_status(
        &self,
        owner: UserId,
        id: TodoId,
        status: TodoStatus,
    ) -> Result<Todo, Error>;

    /// Delete a todo. A second delete of the same id is `NotFound`.
    async fn delete(&self, owner: UserId, id: TodoId) -> Result<(), Error>;
}
