//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: in-process repositories for database-less runs and tests.
//! - **token**: HS256 JWT session tokens.
//! - **storage**: capability-scoped filesystem store for uploaded images.
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod storage;
pub mod token;
