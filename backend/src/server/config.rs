//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use todo_backend::outbound::persistence::DbPool;
use todo_backend::outbound::token::TokenSettings;
use url::Url;

/// Where uploaded images are written and how they are addressed.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub(crate) dir: PathBuf,
    pub(crate) public_base: Url,
}

impl UploadConfig {
    #[must_use]
    pub fn new(dir: PathBuf, public_base: Url) -> Self {
        Self { dir, public_base }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: TokenSettings,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) uploads: Option<UploadConfig>,
}

impl ServerConfig {
    /// Construct a configuration with in-memory storage and uploads disabled.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tokens: TokenSettings) -> Self {
        Self {
            bind_addr,
            tokens,
            db_pool: None,
            uploads: None,
        }
    }

    /// Attach a database connection pool; PostgreSQL-backed repositories are
    /// used instead of the in-memory ones.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Enable image uploads.
    #[must_use]
    pub fn with_uploads(mut self, uploads: UploadConfig) -> Self {
        self.uploads = Some(uploads);
        self
    }
}
