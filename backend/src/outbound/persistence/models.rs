//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer. Conversions into domain
//! types re-run domain validation so a corrupt row surfaces as a query error
//! instead of an invalid aggregate.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{todos, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new accounts. Timestamps come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for reading from the todos table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = todos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TodoRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new todos.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = todos)]
pub(crate) struct NewTodoRow<'a> {
    pub user_id: i64,
    pub title: &'a str,
    pub description: &'a str,
    pub image_url: Option<&'a str>,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for the mutable columns of a todo.
///
/// `image_url: None` writes `NULL` so a cleared attachment is persisted.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = todos)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct TodoUpdate<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub image_url: Option<&'a str>,
    pub status: &'a str,
    pub updated_at: DateTime<Utc>,
}
