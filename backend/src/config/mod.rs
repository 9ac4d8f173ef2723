//! Startup configuration: layered application settings and the token
//! signing secret.

pub mod settings;
pub mod token_secret;

pub use settings::{AppSettings, SettingsError};
pub use token_secret::{BuildMode, TokenSecretError, secret_fingerprint, token_secret_from_env};
