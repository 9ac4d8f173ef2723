//! Application settings loaded via OrthoConfig.
//!
//! Every field can be supplied as a CLI flag or a `TODO_*` environment
//! variable, for example `TODO_DATABASE_URL` or `--bind-addr`.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;
/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;
/// Largest accepted expiry leeway: one hour.
pub const MAX_TOKEN_LEEWAY_SECONDS: i64 = 60 * 60;
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("token TTL must be between 1 and {max} minutes, got {minutes}")]
    TokenTtl { minutes: i64, max: i64 },
    #[error("token leeway must be between 0 and {max} seconds, got {seconds}")]
    TokenLeeway { seconds: i64, max: i64 },
    #[error("pool max size must be positive")]
    PoolMaxSize,
    #[error("invalid upload public base URL '{value}': {source}")]
    PublicBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TODO")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL; in-memory stores are used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Session token lifetime in minutes.
    pub token_ttl_minutes: Option<i64>,
    /// Clock skew tolerated when checking token expiry, in seconds.
    pub token_leeway_seconds: Option<i64>,
    /// Directory receiving uploaded images; uploads are disabled when absent.
    pub upload_dir: Option<PathBuf>,
    /// Base URL prefixed to stored image keys.
    pub upload_public_base_url: Option<String>,
    /// Skip applying embedded migrations at startup.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

impl AppSettings {
    /// Parsed listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn pool_max_size(&self) -> Result<u32, SettingsError> {
        match self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE) {
            0 => Err(SettingsError::PoolMaxSize),
            size => Ok(size),
        }
    }

    pub fn token_ttl(&self) -> Result<TimeDelta, SettingsError> {
        let minutes = self.token_ttl_minutes.unwrap_or(DEFAULT_TOKEN_TTL_MINUTES);
        let invalid = SettingsError::TokenTtl {
            minutes,
            max: MAX_TOKEN_TTL_MINUTES,
        };
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&minutes) {
            return Err(invalid);
        }
        TimeDelta::try_minutes(minutes).ok_or(invalid)
    }

    pub fn token_leeway(&self) -> Result<TimeDelta, SettingsError> {
        let seconds = self.token_leeway_seconds.unwrap_or(0);
        let invalid = SettingsError::TokenLeeway {
            seconds,
            max: MAX_TOKEN_LEEWAY_SECONDS,
        };
        if !(0..=MAX_TOKEN_LEEWAY_SECONDS).contains(&seconds) {
            return Err(invalid);
        }
        TimeDelta::try_seconds(seconds).ok_or(invalid)
    }

    pub fn upload_public_base_url(&self) -> Result<Url, SettingsError> {
        let value = self
            .upload_public_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_BASE_URL);
        Url::parse(value).map_err(|source| SettingsError::PublicBaseUrl {
            value: value.to_owned(),
            source,
        })
    }

    pub fn run_migrations(&self) -> bool {
        !self.skip_migrations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "TODO_BIND_ADDR",
        "TODO_DATABASE_URL",
        "TODO_POOL_MAX_SIZE",
        "TODO_TOKEN_TTL_MINUTES",
        "TODO_TOKEN_LEEWAY_SECONDS",
        "TODO_UPLOAD_DIR",
        "TODO_UPLOAD_PUBLIC_BASE_URL",
        "TODO_SKIP_MIGRATIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("todo-backend")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("valid address")
        );
        assert!(settings.database_url.is_none());
        assert_eq!(settings.pool_max_size().expect("default size"), 10);
        assert_eq!(settings.token_ttl().expect("default ttl"), TimeDelta::minutes(60));
        assert_eq!(settings.token_leeway().expect("default leeway"), TimeDelta::zero());
        assert!(settings.upload_dir.is_none());
        assert_eq!(
            settings.upload_public_base_url().expect("default url").as_str(),
            "http://localhost:8080/"
        );
        assert!(settings.run_migrations());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("TODO_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("TODO_DATABASE_URL", Some("postgres://localhost/todo".to_owned())),
            ("TODO_POOL_MAX_SIZE", Some("4".to_owned())),
            ("TODO_TOKEN_TTL_MINUTES", Some("15".to_owned())),
            ("TODO_TOKEN_LEEWAY_SECONDS", Some("5".to_owned())),
            ("TODO_UPLOAD_DIR", Some("/srv/uploads".to_owned())),
            ("TODO_UPLOAD_PUBLIC_BASE_URL", Some("https://cdn.example.com".to_owned())),
            ("TODO_SKIP_MIGRATIONS", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr().expect("address").port(), 9000);
        assert_eq!(settings.database_url.as_deref(), Some("postgres://localhost/todo"));
        assert_eq!(settings.pool_max_size().expect("size"), 4);
        assert_eq!(settings.token_ttl().expect("ttl"), TimeDelta::minutes(15));
        assert_eq!(settings.token_leeway().expect("leeway"), TimeDelta::seconds(5));
        assert_eq!(settings.upload_dir, Some(PathBuf::from("/srv/uploads")));
        assert!(!settings.run_migrations());
    }

    fn settings() -> AppSettings {
        AppSettings {
            bind_addr: None,
            database_url: None,
            pool_max_size: None,
            token_ttl_minutes: None,
            token_leeway_seconds: None,
            upload_dir: None,
            upload_public_base_url: None,
            skip_migrations: false,
        }
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    #[case(MAX_TOKEN_TTL_MINUTES + 1)]
    #[case(100_000_000_000_000)]
    fn out_of_range_ttl_is_rejected(#[case] minutes: i64) {
        let settings = AppSettings {
            token_ttl_minutes: Some(minutes),
            ..settings()
        };
        assert!(matches!(
            settings.token_ttl(),
            Err(SettingsError::TokenTtl { minutes: m, .. }) if m == minutes
        ));
    }

    #[rstest]
    fn ttl_upper_bound_is_inclusive() {
        let settings = AppSettings {
            token_ttl_minutes: Some(MAX_TOKEN_TTL_MINUTES),
            ..settings()
        };
        assert_eq!(
            settings.token_ttl().expect("ttl at bound"),
            TimeDelta::minutes(MAX_TOKEN_TTL_MINUTES)
        );
    }

    #[rstest]
    #[case(-1)]
    #[case(MAX_TOKEN_LEEWAY_SECONDS + 1)]
    #[case(i64::MAX)]
    fn out_of_range_leeway_is_rejected(#[case] seconds: i64) {
        let settings = AppSettings {
            token_leeway_seconds: Some(seconds),
            ..settings()
        };
        assert!(matches!(
            settings.token_leeway(),
            Err(SettingsError::TokenLeeway { seconds: s, .. }) if s == seconds
        ));
    }

    #[rstest]
    fn malformed_bind_addr_is_rejected() {
        let settings = AppSettings {
            bind_addr: Some("localhost".to_owned()),
            ..settings()
        };
        assert!(matches!(settings.bind_addr(), Err(SettingsError::BindAddr { .. })));
    }
}
