//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and depend only on driving ports
//! and the token verifier, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, ImageUploadCommand, TodoCommand, TodoQuery, TokenService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub todos: Arc<dyn TodoCommand>,
    pub todos_query: Arc<dyn TodoQuery>,
    pub uploads: Arc<dyn ImageUploadCommand>,
    pub tokens: Arc<dyn TokenService>,
}
