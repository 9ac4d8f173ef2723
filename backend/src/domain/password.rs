//! Argon2id password hashing.
//!
//! Digests are stored in PHC string format, so the salt and cost parameters
//! travel with each digest and verification keeps working after the
//! configured parameters change. Verification compares the recomputed output
//! in constant time.
//!
//! Argon2 is deliberately slow; the `*_blocking` helpers move the work onto
//! Tokio's blocking pool so request workers are not stalled.

use std::fmt;

use argon2::password_hash::{
    Error as PhcError, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

const DUMMY_PASSWORD: &str = "timing-equalisation-placeholder";

/// Errors raised while hashing or verifying passwords.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The hashing primitive rejected its input or parameters.
    #[error("password hashing failed: {message}")]
    Hash { message: String },
    /// A stored digest could not be parsed.
    #[error("stored password digest is malformed: {message}")]
    MalformedDigest { message: String },
    /// The blocking worker running the hash was cancelled or panicked.
    #[error("password hashing worker failed: {message}")]
    Worker { message: String },
}

/// Opaque PHC-formatted password digest.
///
/// `Debug` is redacted so digests never end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap a digest loaded from storage. The value is parsed lazily on verify.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The PHC string for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// Salted one-way password hasher.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    dummy: PasswordDigest,
}

impl PasswordHasher {
    /// Build a hasher with explicit Argon2id cost parameters.
    ///
    /// A dummy digest is computed up front so lookups for unknown accounts can
    /// do the same amount of work as a real verification.
    pub fn new(params: Params) -> Result<Self, PasswordHashError> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy = hash_with(&argon2, DUMMY_PASSWORD)?;
        Ok(Self { argon2, dummy })
    }

    /// Build a hasher with the library's recommended Argon2id parameters.
    pub fn with_default_params() -> Result<Self, PasswordHashError> {
        Self::new(Params::default())
    }

    /// Hash `plaintext` with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<PasswordDigest, PasswordHashError> {
        hash_with(&self.argon2, plaintext)
    }

    /// Check `plaintext` against a stored digest.
    ///
    /// Returns `Ok(false)` on mismatch and an error only when the digest
    /// itself cannot be used.
    pub fn verify(
        &self,
        plaintext: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHashError> {
        let parsed =
            PasswordHash::new(digest.as_str()).map_err(|err| PasswordHashError::MalformedDigest {
                message: err.to_string(),
            })?;
        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::Hash {
                message: err.to_string(),
            }),
        }
    }

    /// Burn one verification's worth of work against the dummy digest.
    pub fn verify_dummy(&self, plaintext: &str) {
        if let Err(err) = self.verify(plaintext, &self.dummy) {
            tracing::warn!(error = %err, "dummy password verification failed");
        }
    }

    /// [`Self::hash`] on the blocking thread pool.
    pub async fn hash_blocking(&self, plaintext: &str) -> Result<PasswordDigest, PasswordHashError> {
        let hasher = self.clone();
        let plaintext = Zeroizing::new(plaintext.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|err| PasswordHashError::Worker {
                message: err.to_string(),
            })?
    }

    /// [`Self::verify`] on the blocking thread pool.
    pub async fn verify_blocking(
        &self,
        plaintext: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHashError> {
        let hasher = self.clone();
        let plaintext = Zeroizing::new(plaintext.to_owned());
        let digest = digest.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &digest))
            .await
            .map_err(|err| PasswordHashError::Worker {
                message: err.to_string(),
            })?
    }

    /// [`Self::verify_dummy`] on the blocking thread pool.
    pub async fn verify_dummy_blocking(&self, plaintext: &str) {
        let hasher = self.clone();
        let plaintext = Zeroizing::new(plaintext.to_owned());
        if let Err(err) = tokio::task::spawn_blocking(move || hasher.verify_dummy(&plaintext)).await
        {
            tracing::warn!(error = %err, "dummy password verification worker failed");
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl PasswordHasher {
    /// Cheap parameters for tests. Never use outside tests.
    #[must_use]
    pub fn for_tests() -> Self {
        let params = Params::new(Params::MIN_M_COST, 1, 1, None)
            .unwrap_or_else(|err| panic!("minimum argon2 params are valid: {err}"));
        Self::new(params).unwrap_or_else(|err| panic!("test hasher builds: {err}"))
    }
}

fn hash_with(argon2: &Argon2<'static>, plaintext: &str) -> Result<PasswordDigest, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| PasswordDigest(hash.to_string()))
        .map_err(|err| PasswordHashError::Hash {
            message: err.to_string(),
        })
}
