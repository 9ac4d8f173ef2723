//! Todo items and their field rules.
//!
//! Field newtypes validate on construction, so a [`Todo`] that exists is
//! always well formed. [`Patch`] carries the tri-state semantics of partial
//! updates: absent, explicit null, or a new value.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;
use utoipa::ToSchema;

use crate::domain::{OwnedResource, UserId};

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 255;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX: usize = 1000;

/// Validation errors for todo fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    NonPositiveId,
    EmptyTitle,
    TitleTooLong { max: usize },
    DescriptionTooLong { max: usize },
    InvalidImageUrl,
    UnknownStatus { value: String },
}

impl fmt::Display for TodoValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "todo id must be a positive integer"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::DescriptionTooLong { max } => {
                write!(f, "description must be at most {max} characters")
            }
            Self::InvalidImageUrl => write!(f, "imageUrl must be an absolute http or https URL"),
            Self::UnknownStatus { value } => write!(
                f,
                "invalid status {value:?}; expected one of: Pending, In Progress, Done"
            ),
        }
    }
}

impl std::error::Error for TodoValidationError {}

/// Storage-assigned todo identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct TodoId(i64);

impl TodoId {
    /// Validate and wrap a raw identifier.
    pub fn new(id: i64) -> Result<Self, TodoValidationError> {
        if id <= 0 {
            return Err(TodoValidationError::NonPositiveId);
        }
        Ok(Self(id))
    }

    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TodoId> for i64 {
    fn from(value: TodoId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for TodoId {
    type Error = TodoValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Lifecycle state of a todo. The wire form of `InProgress` is `"In Progress"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum TodoStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl TodoStatus {
    /// Wire and storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoStatus {
    type Err = TodoValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "In Progress" => Ok(Self::InProgress),
            "Done" => Ok(Self::Done),
            other => Err(TodoValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Todo title: 1 to [`TITLE_MAX`] characters, not blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TodoTitle(String);

impl TodoTitle {
    pub fn new(value: impl Into<String>) -> Result<Self, TodoValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(TodoValidationError::EmptyTitle);
        }
        if value.chars().count() > TITLE_MAX {
            return Err(TodoValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<TodoTitle> for String {
    fn from(value: TodoTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for TodoTitle {
    type Error = TodoValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Free-text description, at most [`DESCRIPTION_MAX`] characters. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TodoDescription(String);

impl TodoDescription {
    pub fn new(value: impl Into<String>) -> Result<Self, TodoValidationError> {
        let value = value.into();
        if value.chars().count() > DESCRIPTION_MAX {
            return Err(TodoValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<TodoDescription> for String {
    fn from(value: TodoDescription) -> Self {
        value.0
    }
}

impl TryFrom<String> for TodoDescription {
    type Error = TodoValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Absolute `http`/`https` URL of an attached image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageUrl(String);

impl ImageUrl {
    pub fn new(value: impl Into<String>) -> Result<Self, TodoValidationError> {
        let value = value.into();
        let parsed = Url::parse(&value).map_err(|_| TodoValidationError::InvalidImageUrl)?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host().is_none() {
            return Err(TodoValidationError::InvalidImageUrl);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<ImageUrl> for String {
    fn from(value: ImageUrl) -> Self {
        value.0
    }
}

impl TryFrom<String> for ImageUrl {
    type Error = TodoValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A todo item owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[schema(value_type = i64, example = 1)]
    pub id: TodoId,
    #[schema(value_type = i64, example = 1)]
    pub user_id: UserId,
    #[schema(value_type = String, example = "buy milk")]
    pub title: TodoTitle,
    #[schema(value_type = String, example = "")]
    pub description: TodoDescription,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "https://cdn.example.com/uploads/1/a.png")]
    pub image_url: Option<ImageUrl>,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedResource for Todo {
    fn owner(&self) -> UserId {
        self.user_id
    }
}

/// Caller-supplied content for a new todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub title: TodoTitle,
    pub description: TodoDescription,
    pub image_url: Option<ImageUrl>,
}

/// A todo ready for insertion; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub user_id: UserId,
    pub title: TodoTitle,
    pub description: TodoDescription,
    pub image_url: Option<ImageUrl>,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tri-state field of a partial update.
///
/// Deserialises from an optional JSON field: a missing key (with
/// `#[serde(default)]`) is `Unchanged`, `null` is `Clear`, and a value is
/// `Set`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Unchanged,
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// Convert the carried value, keeping the tri-state shape.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Patch<U>, E> {
        Ok(match self {
            Self::Unchanged => Patch::Unchanged,
            Self::Clear => Patch::Clear,
            Self::Set(value) => Patch::Set(f(value)?),
        })
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(inner) => Self::Set(inner),
            None => Self::Clear,
        })
    }
}

/// Partial update of a todo's content.
///
/// The title can be replaced but never cleared. Clearing the description
/// empties it; clearing the image URL removes the attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<TodoTitle>,
    pub description: Patch<TodoDescription>,
    pub image_url: Patch<ImageUrl>,
}

impl TodoPatch {
    /// True when no field was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_unchanged() && self.image_url.is_unchanged()
    }

    /// Apply the patch to `todo`, returning whether any field changed.
    pub fn apply_to(self, todo: &mut Todo) -> bool {
        let mut changed = false;
        if let Some(title) = self.title {
            if todo.title != title {
                todo.title = title;
                changed = true;
            }
        }
        let description = match self.description {
            Patch::Unchanged => None,
            Patch::Clear => Some(TodoDescription::default()),
            Patch::Set(value) => Some(value),
        };
        if let Some(description) = description {
            if todo.description != description {
                todo.description = description;
                changed = true;
            }
        }
        let image_url = match self.image_url {
            Patch::Unchanged => None,
            Patch::Clear => Some(None),
            Patch::Set(value) => Some(Some(value)),
        };
        if let Some(image_url) = image_url {
            if todo.image_url != image_url {
                todo.image_url = image_url;
                changed = true;
            }
        }
        changed
    }
}
