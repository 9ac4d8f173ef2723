//! Todo use-cases behind the [`TodoCommand`] and [`TodoQuery`] driving ports.
//!
//! Single-item reads and all mutations load the record, run the ownership
//! guard, and only then touch storage again. Listing is scoped by owner at
//! the repository, so no per-item check is needed.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, info};

use crate::domain::ports::{TodoCommand, TodoPersistenceError, TodoQuery, TodoRepository};
use crate::domain::{
    Error, NewTodo, Todo, TodoDraft, TodoId, TodoPatch, TodoStatus, UserId, authorize,
};

const RESOURCE: &str = "todo";

/// Todo service generic over its repository.
#[derive(Clone)]
pub struct TodoService<R> {
    todos: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> TodoService<R> {
    pub fn new(todos: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { todos, clock }
    }
}

fn map_todo_persistence_error(error: TodoPersistenceError) -> Error {
    match error {
        TodoPersistenceError::Connection { message } => {
            error!(%message, "todo repository connection failed");
            Error::service_unavailable("todo repository unavailable")
        }
        TodoPersistenceError::Query { message } => {
            error!(%message, "todo repository query failed");
            Error::internal("todo repository error")
        }
        TodoPersistenceError::NotFound => Error::not_found(format!("{RESOURCE} not found")),
    }
}

impl<R> TodoService<R>
where
    R: TodoRepository,
{
    async fn load_owned(&self, owner: UserId, id: TodoId) -> Result<Todo, Error> {
        let found = self
            .todos
            .find_by_id(id)
            .await
            .map_err(map_todo_persistence_error)?;
        authorize(owner, found).into_result(RESOURCE).inspect_err(|err| {
            debug!(user_id = %owner, todo_id = %id, code = ?err.code(), "todo access rejected");
        })
    }

    async fn persist(&self, mut todo: Todo) -> Result<Todo, Error> {
        todo.updated_at = self.clock.utc();
        self.todos
            .update(&todo)
            .await
            .map_err(map_todo_persistence_error)
    }
}

#[async_trait]
impl<R> TodoCommand for TodoService<R>
where
    R: TodoRepository,
{
    async fn create(&self, owner: UserId, draft: TodoDraft) -> Result<Todo, Error> {
        let now = self.clock.utc();
        let todo = NewTodo {
            user_id: owner,
            title: draft.title,
            description: draft.description,
            image_url: draft.image_url,
            status: TodoStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let created = self
            .todos
            .create(&todo)
            .await
            .map_err(map_todo_persistence_error)?;
        info!(user_id = %owner, todo_id = %created.id, "todo created");
        Ok(created)
    }

    async fn update(&self, owner: UserId, id: TodoId, patch: TodoPatch) -> Result<Todo, Error> {
        if patch.is_empty() {
            return Err(Error::no_fields_provided("no update fields provided"));
        }
        let mut todo = self.load_owned(owner, id).await?;
        if !patch.apply_to(&mut todo) {
            return Ok(todo);
        }
        let updated = self.persist(todo).await?;
        info!(user_id = %owner, todo_id = %id, "todo updated");
        Ok(updated)
    }

    async fn update_status(
        &self,
        owner: UserId,
        id: TodoId,
        status: TodoStatus,
    ) -> Result<Todo, Error> {
        let mut todo = self.load_owned(owner, id).await?;
        if todo.status == status {
            return Ok(todo);
        }
        todo.status = status;
        let updated = self.persist(todo).await?;
        info!(user_id = %owner, todo_id = %id, status = %status, "todo status changed");
        Ok(updated)
    }

    async fn delete(&self, owner: UserId, id: TodoId) -> Result<(), Error> {
        self.load_owned(owner, id).await?;
        self.todos
            .delete(id)
            .await
            .map_err(map_todo_persistence_error)?;
        info!(user_id = %owner, todo_id = %id, "todo deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> TodoQuery for TodoService<R>
where
    R: TodoRepository,
{
    async fn list(&self, owner: UserId) -> Result<Vec<Todo>, Error> {
        self.todos
            .list_by_owner(owner)
            .await
            .map_err(map_todo_persistence_error)
    }

    async fn get(&self, owner: UserId, id: TodoId) -> Result<Todo, Error> {
        self.load_owned(owner, id).await
    }
}

#[cfg(test)]
#[path = "todo_service_tests.rs"]
mod tests;
