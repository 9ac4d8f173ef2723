//! Authentication primitives: registration and login credentials.
//!
//! Handlers convert request payloads into these types before calling the
//! account service, so shape validation never reaches storage.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{Email, UserValidationError};

/// Minimum accepted password length, counted in characters.
pub const PASSWORD_MIN: usize = 6;

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email was missing or malformed.
    Email(UserValidationError),
    /// Password was empty.
    EmptyPassword,
    /// Password is shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(inner) => inner.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated registration input.
///
/// # Examples
/// ```
/// use todo_backend::domain::RegistrationCredentials;
///
/// let creds = RegistrationCredentials::try_from_parts("a@x.com", "secret1").unwrap();
/// assert_eq!(creds.email().as_ref(), "a@x.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl RegistrationCredentials {
    /// Validate raw email and password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = Email::new(email).map_err(CredentialsValidationError::Email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email to register.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Plaintext password; zeroed on drop.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated login input.
///
/// Password length rules are not applied here so accounts created under an
/// older policy can still log in.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw email and password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = Email::new(email).map_err(CredentialsValidationError::Email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the account lookup.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Plaintext password; zeroed on drop.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

macro_rules! redacted_debug {
    ($name:ident) => {
        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("email", &self.email)
                    .field("password", &"<redacted>")
                    .finish()
            }
        }
    };
}

redacted_debug!(RegistrationCredentials);
redacted_debug!(LoginCredentials);
