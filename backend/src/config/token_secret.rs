//! Token signing secret loading and validation.
//!
//! The secret comes from `TODO_JWT_SECRET`, or from the file named by
//! `TODO_JWT_SECRET_FILE`. Release builds refuse to start without a secret
//! of at least [`SECRET_MIN_LEN`] bytes; debug builds fall back to a fixed
//! development secret and say so loudly.

use std::path::PathBuf;

use mockable::Env;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroizing;

const SECRET_ENV: &str = "TODO_JWT_SECRET";
const SECRET_FILE_ENV: &str = "TODO_JWT_SECRET_FILE";
const DEV_SECRET: &[u8] = b"todo-backend-insecure-development-secret";
const FINGERPRINT_BYTES: usize = 8;

/// Minimum secret length accepted by release builds.
pub const SECRET_MIN_LEN: usize = 32;

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing or short secret with a warning.
    Debug,
    /// Release builds require an explicit secret of adequate length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use todo_backend::config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while loading the signing secret.
#[derive(thiserror::Error, Debug)]
pub enum TokenSecretError {
    #[error("missing signing secret: set TODO_JWT_SECRET or TODO_JWT_SECRET_FILE")]
    Missing,
    #[error("failed to read signing secret at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("signing secret too short: need >= {min_len} bytes, got {length}")]
    TooShort { length: usize, min_len: usize },
}

fn secret_source<E: Env>(env: &E) -> Result<Option<Zeroizing<Vec<u8>>>, TokenSecretError> {
    if let Some(value) = env.string(SECRET_ENV).filter(|value| !value.is_empty()) {
        return Ok(Some(Zeroizing::new(value.into_bytes())));
    }
    let Some(path) = env.string(SECRET_FILE_ENV).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    let path = PathBuf::from(path);
    let mut bytes = std::fs::read(&path)
        .map(Zeroizing::new)
        .map_err(|source| TokenSecretError::Read { path, source })?;
    // Secret files usually end with a newline that is not part of the key.
    while bytes.last().is_some_and(u8::is_ascii_whitespace) {
        bytes.pop();
    }
    Ok(Some(bytes))
}

/// Load the signing secret for `mode`.
///
/// # Examples
///
/// ```rust
/// use mockable::MockEnv;
/// use todo_backend::config::{BuildMode, token_secret_from_env};
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "TODO_JWT_SECRET" => Some("0123456789abcdef0123456789abcdef".to_owned()),
///     _ => None,
/// });
///
/// let secret = token_secret_from_env(&env, BuildMode::Release).expect("secret loads");
/// assert_eq!(secret.len(), 32);
/// ```
pub fn token_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Zeroizing<Vec<u8>>, TokenSecretError> {
    let Some(secret) = secret_source(env)? else {
        if mode.is_debug() {
            warn!("no signing secret configured; using insecure development secret");
            return Ok(Zeroizing::new(DEV_SECRET.to_vec()));
        }
        return Err(TokenSecretError::Missing);
    };
    let length = secret.len();
    if length < SECRET_MIN_LEN {
        if mode.is_debug() {
            warn!(length, min_len = SECRET_MIN_LEN, "signing secret is shorter than recommended");
        } else {
            return Err(TokenSecretError::TooShort {
                length,
                min_len: SECRET_MIN_LEN,
            });
        }
    }
    Ok(secret)
}

/// Truncated SHA-256 fingerprint of the secret, safe to log.
#[must_use]
pub fn secret_fingerprint(secret: &[u8]) -> String {
    let digest = Sha256::digest(secret);
    hex::encode(digest.get(..FINGERPRINT_BYTES).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    use mockable::MockEnv;
    use rstest::rstest;

    fn mock_env(vars: &[(&str, &str)]) -> MockEnv {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        env
    }

    const LONG_SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[rstest]
    fn inline_secret_takes_precedence_over_file() {
        let env = mock_env(&[(SECRET_ENV, LONG_SECRET), (SECRET_FILE_ENV, "/nonexistent")]);
        let secret = token_secret_from_env(&env, BuildMode::Release).expect("secret loads");
        assert_eq!(secret.as_slice(), LONG_SECRET.as_bytes());
    }

    #[rstest]
    fn file_secret_is_trimmed_of_trailing_newline() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "{LONG_SECRET}").expect("write secret");
        let path = file.path().to_string_lossy().into_owned();
        let env = mock_env(&[(SECRET_FILE_ENV, &path)]);

        let secret = token_secret_from_env(&env, BuildMode::Release).expect("secret loads");

        assert_eq!(secret.as_slice(), LONG_SECRET.as_bytes());
    }

    #[rstest]
    fn unreadable_file_is_an_error_in_any_mode() {
        let env = mock_env(&[(SECRET_FILE_ENV, "/definitely/not/here")]);
        let err = token_secret_from_env(&env, BuildMode::Debug).expect_err("read fails");
        assert!(matches!(err, TokenSecretError::Read { .. }));
    }

    #[rstest]
    #[case(BuildMode::Debug, true)]
    #[case(BuildMode::Release, false)]
    fn missing_secret_depends_on_build_mode(#[case] mode: BuildMode, #[case] accepted: bool) {
        let env = mock_env(&[]);
        let result = token_secret_from_env(&env, mode);
        assert_eq!(result.is_ok(), accepted);
        if let Ok(secret) = result {
            assert_eq!(secret.as_slice(), DEV_SECRET);
        }
    }

    #[rstest]
    #[case(BuildMode::Debug, true)]
    #[case(BuildMode::Release, false)]
    fn short_secret_depends_on_build_mode(#[case] mode: BuildMode, #[case] accepted: bool) {
        let env = mock_env(&[(SECRET_ENV, "short")]);
        assert_eq!(token_secret_from_env(&env, mode).is_ok(), accepted);
    }

    #[rstest]
    fn fingerprint_is_sixteen_lowercase_hex_chars() {
        let fp = secret_fingerprint(LONG_SECRET.as_bytes());
        assert_eq!(fp.len(), FINGERPRINT_BYTES * 2);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(fp, secret_fingerprint(LONG_SECRET.as_bytes()));
        assert_ne!(fp, secret_fingerprint(b"another-secret"));
    }
}
