//! Todo-list backend: account registration, bearer-token authentication, and
//! per-user todo items behind a JSON REST API.
//!
//! The crate follows a hexagonal layout. [`domain`] holds the types, use-case
//! services, and port traits; [`inbound`] adapts HTTP requests onto the
//! driving ports; [`outbound`] implements the driven ports with PostgreSQL,
//! in-memory stores, JWT signing, and a filesystem image store.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
