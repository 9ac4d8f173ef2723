//! In-process repository adapters.
//!
//! Used when no database URL is configured and by integration tests. State
//! lives behind a Tokio mutex and is lost on restart.

mod todo_repository;
mod user_repository;

pub use todo_repository::InMemoryTodoRepository;
pub use user_repository::InMemoryUserRepository;
