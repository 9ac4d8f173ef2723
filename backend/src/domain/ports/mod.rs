//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, token service, image store) are implemented by
//! outbound adapters. Driving ports (`*Command`, `*Query`) are implemented by
//! domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod image_store;
mod image_upload_command;
mod todo_command;
mod todo_query;
mod todo_repository;
mod token_service;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, LoginSession};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{DisabledImageStore, ImageStore, ImageStoreError, StoredImage};
#[cfg(test)]
pub use image_upload_command::MockImageUploadCommand;
pub use image_upload_command::{ImageUploadCommand, UploadedImage};
#[cfg(test)]
pub use todo_command::MockTodoCommand;
pub use todo_command::TodoCommand;
#[cfg(test)]
pub use todo_query::MockTodoQuery;
pub use todo_query::TodoQuery;
#[cfg(test)]
pub use todo_repository::MockTodoRepository;
pub use todo_repository::{TodoPersistenceError, TodoRepository};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{IssuedToken, TokenError, TokenService, VerifiedSession};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
