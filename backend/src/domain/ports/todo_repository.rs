//! Port abstraction for todo persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NewTodo, Todo, TodoId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by todo repository adapters.
    pub enum TodoPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "todo repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "todo repository query failed: {message}",
        /// A mutation affected zero rows.
        NotFound => "todo not found",
    }
}

/// Storage for todo items.
///
/// The repository does not check ownership; callers run the ownership guard
/// before any single-item read or mutation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Insert a todo and return it with its assigned id.
    async fn create(&self, todo: &NewTodo) -> Result<Todo, TodoPersistenceError>;

    /// All todos owned by `owner`, newest first. Empty when there are none.
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Todo>, TodoPersistenceError>;

    /// Fetch a todo by identifier regardless of owner.
    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, TodoPersistenceError>;

    /// Persist the mutable fields of `todo`.
    ///
    /// Returns [`TodoPersistenceError::NotFound`] when no row was updated.
    async fn update(&self, todo: &Todo) -> Result<Todo, TodoPersistenceError>;

    /// Remove a todo.
    ///
    /// Returns [`TodoPersistenceError::NotFound`] when no row was deleted.
    async fn delete(&self, id: TodoId) -> Result<(), TodoPersistenceError>;
}
