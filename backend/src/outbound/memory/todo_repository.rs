//! In-memory `TodoRepository`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{TodoPersistenceError, TodoRepository};
use crate::domain::{NewTodo, Todo, TodoId, UserId};

#[derive(Default)]
struct Todos {
    next_id: i64,
    rows: BTreeMap<i64, Todo>,
}

/// Todo storage held in process memory.
#[derive(Default)]
pub struct InMemoryTodoRepository {
    todos: Mutex<Todos>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, todo: &NewTodo) -> Result<Todo, TodoPersistenceError> {
        let mut todos = self.todos.lock().await;
        todos.next_id += 1;
        let id = TodoId::new(todos.next_id)
            .map_err(|err| TodoPersistenceError::query(err.to_string()))?;
        let created = Todo {
            id,
            user_id: todo.user_id,
            title: todo.title.clone(),
            description: todo.description.clone(),
            image_url: todo.image_url.clone(),
            status: todo.status,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        };
        todos.rows.insert(id.get(), created.clone());
        Ok(created)
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Todo>, TodoPersistenceError> {
        let todos = self.todos.lock().await;
        // Reverse id order breaks ties between equal creation timestamps.
        let mut owned: Vec<Todo> = todos
            .rows
            .values()
            .rev()
            .filter(|todo| todo.user_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, TodoPersistenceError> {
        let todos = self.todos.lock().await;
        Ok(todos.rows.get(&id.get()).cloned())
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, TodoPersistenceError> {
        let mut todos = self.todos.lock().await;
        let stored = todos
            .rows
            .get_mut(&todo.id.get())
            .ok_or_else(TodoPersistenceError::not_found)?;
        stored.title = todo.title.clone();
        stored.description = todo.description.clone();
        stored.image_url = todo.image_url.clone();
        stored.status = todo.status;
        stored.updated_at = todo.updated_at;
        Ok(stored.clone())
    }

    async fn delete(&self, id: TodoId) -> Result<(), TodoPersistenceError> {
        let mut todos = self.todos.lock().await;
        todos
            .rows
            .remove(&id.get())
            .map(|_| ())
            .ok_or_else(TodoPersistenceError::not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TodoDescription, TodoStatus, TodoTitle};
    use chrono::{TimeDelta, Utc};

    fn new_todo(owner: i64, title: &str, offset_secs: i64) -> NewTodo {
        let at = Utc::now() + TimeDelta::seconds(offset_secs);
        NewTodo {
            user_id: UserId::new(owner).expect("valid id"),
            title: TodoTitle::new(title).expect("valid title"),
            description: TodoDescription::default(),
            image_url: None,
            status: TodoStatus::Pending,
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn lists_only_owner_items_newest_first() {
        let repo = InMemoryTodoRepository::new();
        repo.create(&new_todo(1, "older", 0)).await.expect("created");
        repo.create(&new_todo(2, "someone else", 5)).await.expect("created");
        repo.create(&new_todo(1, "newer", 10)).await.expect("created");

        let titles: Vec<String> = repo
            .list_by_owner(UserId::new(1).expect("valid id"))
            .await
            .expect("listed")
            .into_iter()
            .map(|todo| todo.title.as_str().to_owned())
            .collect();

        assert_eq!(titles, ["newer", "older"]);
    }

    #[tokio::test]
    async fn second_delete_reports_not_found() {
        let repo = InMemoryTodoRepository::new();
        let created = repo.create(&new_todo(1, "once", 0)).await.expect("created");

        repo.delete(created.id).await.expect("first delete");
        assert_eq!(
            repo.delete(created.id).await,
            Err(TodoPersistenceError::NotFound)
        );
    }
}
