//! Per-resource access control.
//!
//! Every single-item read and every mutation passes through [`authorize`]
//! before storage is touched again. A missing resource and a resource owned
//! by someone else are distinct outcomes.

use crate::domain::{Error, UserId};

/// Message returned when the requester does not own the resource.
pub const FORBIDDEN_MESSAGE: &str = "user does not have permission to access this resource";

/// A resource with exactly one owning user.
pub trait OwnedResource {
    /// The owning user. Immutable after creation.
    fn owner(&self) -> UserId;
}

/// Outcome of an ownership check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision<T> {
    Allow(T),
    Deny,
    NotFound,
}

impl<T> AccessDecision<T> {
    /// Convert into the domain error taxonomy. `kind` names the resource in
    /// the not-found message, e.g. `"todo"`.
    pub fn into_result(self, kind: &str) -> Result<T, Error> {
        match self {
            Self::Allow(resource) => Ok(resource),
            Self::Deny => Err(Error::forbidden(FORBIDDEN_MESSAGE)),
            Self::NotFound => Err(Error::not_found(format!("{kind} not found"))),
        }
    }
}

/// Decide whether `requester` may act on `resource`.
///
/// # Examples
/// ```
/// use todo_backend::domain::{authorize, AccessDecision, OwnedResource, UserId};
///
/// struct Note(UserId);
/// impl OwnedResource for Note {
///     fn owner(&self) -> UserId { self.0 }
/// }
///
/// let alice = UserId::new(1).unwrap();
/// let bob = UserId::new(2).unwrap();
/// assert!(matches!(authorize(bob, Some(Note(alice))), AccessDecision::Deny));
/// assert!(matches!(authorize::<Note>(bob, None), AccessDecision::NotFound));
/// ```
pub fn authorize<T: OwnedResource>(requester: UserId, resource: Option<T>) -> AccessDecision<T> {
    match resource {
        None => AccessDecision::NotFound,
        Some(resource) if resource.owner() == requester => AccessDecision::Allow(resource),
        Some(_) => AccessDecision::Deny,
    }
}
