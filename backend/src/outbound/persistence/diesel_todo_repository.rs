//! PostgreSQL-backed `TodoRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{TodoPersistenceError, TodoRepository};
use crate::domain::{
    ImageUrl, NewTodo, Todo, TodoDescription, TodoId, TodoStatus, TodoTitle, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewTodoRow, TodoRow, TodoUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::todos;

/// Diesel-backed implementation of the [`TodoRepository`] port.
#[derive(Clone)]
pub struct DieselTodoRepository {
    pool: DbPool,
}

impl DieselTodoRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TodoPersistenceError {
    map_basic_pool_error(error, TodoPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TodoPersistenceError {
    map_basic_diesel_error(
        error,
        TodoPersistenceError::query,
        TodoPersistenceError::connection,
    )
}

fn corrupt_row(id: i64, error: &dyn std::fmt::Display) -> TodoPersistenceError {
    warn!(id, error = %error, "stored todo row is invalid");
    TodoPersistenceError::query("stored todo row is invalid")
}

/// Convert a database row to a domain todo, re-validating every field.
fn row_to_todo(row: TodoRow) -> Result<Todo, TodoPersistenceError> {
    let id = row.id;
    Ok(Todo {
        id: TodoId::new(id).map_err(|err| corrupt_row(id, &err))?,
        user_id: UserId::new(row.user_id).map_err(|err| corrupt_row(id, &err))?,
        title: TodoTitle::new(row.title).map_err(|err| corrupt_row(id, &err))?,
        description: TodoDescription::new(row.description).map_err(|err| corrupt_row(id, &err))?,
        image_url: row
            .image_url
            .map(ImageUrl::new)
            .transpose()
            .map_err(|err| corrupt_row(id, &err))?,
        status: row
            .status
            .parse::<TodoStatus>()
            .map_err(|err| corrupt_row(id, &err))?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl TodoRepository for DieselTodoRepository {
    async fn create(&self, todo: &NewTodo) -> Result<Todo, TodoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewTodoRow {
            user_id: todo.user_id.get(),
            title: todo.title.as_str(),
            description: todo.description.as_str(),
            image_url: todo.image_url.as_ref().map(ImageUrl::as_str),
            status: todo.status.as_str(),
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        };
        let row = diesel::insert_into(todos::table)
            .values(&new_row)
            .returning(TodoRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_todo(row)
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Todo>, TodoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TodoRow> = todos::table
            .filter(todos::user_id.eq(owner.get()))
            .order((todos::created_at.desc(), todos::id.desc()))
            .select(TodoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_todo).collect()
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, TodoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TodoRow> = todos::table
            .find(id.get())
            .select(TodoRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_todo).transpose()
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, TodoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = TodoUpdate {
            title: todo.title.as_str(),
            description: todo.description.as_str(),
            image_url: todo.image_url.as_ref().map(ImageUrl::as_str),
            status: todo.status.as_str(),
            updated_at: todo.updated_at,
        };
        let row: Option<TodoRow> = diesel::update(todos::table.find(todo.id.get()))
            .set(&changes)
            .returning(TodoRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map_or_else(|| Err(TodoPersistenceError::not_found()), row_to_todo)
    }

    async fn delete(&self, id: TodoId) -> Result<(), TodoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(todos::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if deleted == 0 {
            return Err(TodoPersistenceError::not_found());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::{fixture, rstest};

    #[fixture]
    fn row() -> TodoRow {
        TodoRow {
            id: 9,
            user_id: 2,
            title: "buy milk".to_owned(),
            description: String::new(),
            image_url: Some("https://cdn.example.com/a.png".to_owned()),
            status: "In Progress".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    fn row_converts_with_spaced_status(row: TodoRow) {
        let todo = row_to_todo(row).expect("valid row");
        assert_eq!(todo.status, TodoStatus::InProgress);
        assert_eq!(todo.user_id.get(), 2);
        assert!(todo.image_url.is_some());
    }

    #[rstest]
    fn unknown_status_is_a_query_error(mut row: TodoRow) {
        row.status = "Archived".to_owned();
        let err = row_to_todo(row).expect_err("corrupt row");
        assert!(matches!(err, TodoPersistenceError::Query { .. }));
    }
}
