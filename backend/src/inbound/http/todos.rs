//! Todo API handlers.
//!
//! Every route requires a bearer token; the authenticated user is the owner
//! for creation and the subject of the ownership check everywhere else.
//!
//! ```text
//! POST   /api/todos              {"title":"buy milk"}
//! GET    /api/todos
//! GET    /api/todos/{id}
//! PATCH  /api/todos/{id}         {"description":null}
//! PUT    /api/todos/{id}/status  {"status":"In Progress"}
//! DELETE /api/todos/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{
    Error, ImageUrl, Patch, Todo, TodoDescription, TodoDraft, TodoPatch, TodoStatus, TodoTitle,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_todo_id, title_not_clearable_error, todo_field_error};

/// Body of `POST /api/todos`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    #[schema(example = "buy milk")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "two litres")]
    pub description: Option<String>,
    /// An empty string is treated as absent.
    #[serde(default)]
    #[schema(example = "https://cdn.example.com/uploads/1/a.png")]
    pub image_url: Option<String>,
}

impl TryFrom<CreateTodoRequest> for TodoDraft {
    type Error = Error;

    fn try_from(value: CreateTodoRequest) -> Result<Self, Self::Error> {
        let title = TodoTitle::new(value.title).map_err(todo_field_error)?;
        let description = value
            .description
            .map(TodoDescription::new)
            .transpose()
            .map_err(todo_field_error)?
            .unwrap_or_default();
        let image_url = value
            .image_url
            .filter(|url| !url.is_empty())
            .map(ImageUrl::new)
            .transpose()
            .map_err(todo_field_error)?;
        Ok(Self {
            title,
            description,
            image_url,
        })
    }
}

/// Body of `PATCH /api/todos/{id}`.
///
/// Omitted keys are left alone. `null` clears `description` and `imageUrl`;
/// `title` may be replaced but not cleared.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "buy oat milk")]
    pub title: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,
    /// An empty string clears the attachment like `null` does.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub image_url: Patch<String>,
}

impl TryFrom<UpdateTodoRequest> for TodoPatch {
    type Error = Error;

    fn try_from(value: UpdateTodoRequest) -> Result<Self, Self::Error> {
        let title = match value.title {
            Patch::Unchanged => None,
            Patch::Clear => return Err(title_not_clearable_error()),
            Patch::Set(raw) => Some(TodoTitle::new(raw).map_err(todo_field_error)?),
        };
        let description = value
            .description
            .try_map(TodoDescription::new)
            .map_err(todo_field_error)?;
        let image_url = match value.image_url {
            Patch::Set(raw) if raw.is_empty() => Patch::Clear,
            other => other.try_map(ImageUrl::new).map_err(todo_field_error)?,
        };
        Ok(Self {
            title,
            description,
            image_url,
        })
    }
}

/// Body of `PUT /api/todos/{id}/status`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    #[schema(example = "In Progress")]
    pub status: String,
}

/// Create a todo owned by the caller.
#[utoipa::path(
    post,
    path = "/api/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = Todo),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["todos"],
    operation_id = "createTodo"
)]
#[post("")]
pub async fn create_todo(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<CreateTodoRequest>,
) -> ApiResult<HttpResponse> {
    let draft = TodoDraft::try_from(payload.into_inner())?;
    let todo = state.todos.create(user.user_id(), draft).await?;
    Ok(HttpResponse::Created().json(todo))
}

/// List the caller's todos, newest first.
#[utoipa::path(
    get,
    path = "/api/todos",
    responses(
        (status = 200, description = "Todos owned by the caller", body = [Todo]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["todos"],
    operation_id = "listTodos"
)]
#[get("")]
pub async fn list_todos(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<Todo>>> {
    let todos = state.todos_query.list(user.user_id()).await?;
    Ok(web::Json(todos))
}

/// Fetch one todo.
#[utoipa::path(
    get,
    path = "/api/todos/{id}",
    params(("id" = i64, Path, description = "Todo identifier")),
    responses(
        (status = 200, description = "Todo", body = Todo),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owned by another user", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["todos"],
    operation_id = "getTodo"
)]
#[get("/{id}")]
pub async fn get_todo(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Todo>> {
    let id = parse_todo_id(path.into_inner())?;
    let todo = state.todos_query.get(user.user_id(), id).await?;
    Ok(web::Json(todo))
}

/// Partially update a todo's content.
#[utoipa::path(
    patch,
    path = "/api/todos/{id}",
    params(("id" = i64, Path, description = "Todo identifier")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Updated todo", body = Todo),
        (status = 400, description = "Invalid request or no fields provided", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owned by another user", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["todos"],
    operation_id = "updateTodo"
)]
#[patch("/{id}")]
pub async fn update_todo(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<UpdateTodoRequest>,
) -> ApiResult<web::Json<Todo>> {
    let id = parse_todo_id(path.into_inner())?;
    let patch = TodoPatch::try_from(payload.into_inner())?;
    let todo = state.todos.update(user.user_id(), id, patch).await?;
    Ok(web::Json(todo))
}

/// Move a todo to another lifecycle state.
#[utoipa::path(
    put,
    path = "/api/todos/{id}/status",
    params(("id" = i64, Path, description = "Todo identifier")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated todo", body = Todo),
        (status = 400, description = "Unknown status", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owned by another user", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["todos"],
    operation_id = "updateTodoStatus"
)]
#[put("/{id}/status")]
pub async fn update_todo_status(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<UpdateStatusRequest>,
) -> ApiResult<web::Json<Todo>> {
    let id = parse_todo_id(path.into_inner())?;
    let status: TodoStatus = payload.status.parse().map_err(todo_field_error)?;
    let todo = state.todos.update_status(user.user_id(), id, status).await?;
    Ok(web::Json(todo))
}

/// Delete a todo.
#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    params(("id" = i64, Path, description = "Todo identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owned by another user", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["todos"],
    operation_id = "deleteTodo"
)]
#[delete("/{id}")]
pub async fn delete_todo(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = parse_todo_id(path.into_inner())?;
    state.todos.delete(user.user_id(), id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::ports::{MockTodoCommand, MockTodoQuery};
    use crate::domain::{TodoId, UserId};
    use crate::inbound::http::error::{json_error_handler, path_error_handler};
    use crate::inbound::http::test_utils::{accepting_tokens, state_with_tokens};
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::{App, test};
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn sample_todo(id: i64, status: TodoStatus) -> Todo {
        let now = Utc::now();
        Todo {
            id: TodoId::new(id).expect("valid id"),
            user_id: UserId::new(5).expect("valid id"),
            title: TodoTitle::new("buy milk").expect("valid title"),
            description: TodoDescription::default(),
            image_url: None,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    async fn send(
        commands: MockTodoCommand,
        queries: MockTodoQuery,
        req: test::TestRequest,
    ) -> (StatusCode, Value) {
        let mut state = state_with_tokens(accepting_tokens());
        state.todos = Arc::new(commands);
        state.todos_query = Arc::new(queries);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::PathConfig::default().error_handler(path_error_handler))
                .service(
                    web::scope("/api/todos")
                        .service(create_todo)
                        .service(list_todos)
                        .service(get_todo)
                        .service(update_todo)
                        .service(update_todo_status)
                        .service(delete_todo),
                ),
        )
        .await;
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        let body = test::read_body(res).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    fn authed(req: test::TestRequest) -> test::TestRequest {
        req.insert_header((AUTHORIZATION, "Bearer good"))
    }

    #[actix_web::test]
    async fn create_returns_201_with_pending_todo() {
        let mut commands = MockTodoCommand::new();
        commands
            .expect_create()
            .withf(|owner, draft| {
                owner.get() == 5
                    && draft.title.as_str() == "buy milk"
                    && draft.description.as_str().is_empty()
                    && draft.image_url.is_none()
            })
            .times(1)
            .return_once(|_, _| Ok(sample_todo(1, TodoStatus::Pending)));

        let (status, body) = send(
            commands,
            MockTodoQuery::new(),
            authed(test::TestRequest::post().uri("/api/todos"))
                .set_json(json!({ "title": "buy milk", "imageUrl": "" })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "Pending");
        assert_eq!(body["userId"], 5);
    }

    #[rstest]
    #[case(json!({ "title": "   " }), "title", "empty_title")]
    #[case(json!({ "title": "a".repeat(256) }), "title", "title_too_long")]
    #[case(json!({ "title": "ok", "imageUrl": "ftp://x/a.png" }), "imageUrl", "invalid_image_url")]
    #[actix_web::test]
    async fn create_rejects_invalid_fields(
        #[case] payload: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mut commands = MockTodoCommand::new();
        commands.expect_create().never();

        let (status, body) = send(
            commands,
            MockTodoQuery::new(),
            authed(test::TestRequest::post().uri("/api/todos")).set_json(payload),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["code"], code);
    }

    #[actix_web::test]
    async fn routes_require_a_bearer_token() {
        let (status, body) = send(
            MockTodoCommand::new(),
            MockTodoQuery::new(),
            test::TestRequest::get().uri("/api/todos"),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["details"]["code"], "missing_authorization_header");
    }

    #[actix_web::test]
    async fn list_returns_array() {
        let mut queries = MockTodoQuery::new();
        queries
            .expect_list()
            .times(1)
            .return_once(|_| Ok(vec![sample_todo(2, TodoStatus::Done), sample_todo(1, TodoStatus::Pending)]));

        let (status, body) = send(
            MockTodoCommand::new(),
            queries,
            authed(test::TestRequest::get().uri("/api/todos")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(2));
        assert_eq!(body[0]["id"], 2);
    }

    #[rstest]
    #[case("/api/todos/0", "invalid_id")]
    #[case("/api/todos/abc", "invalid_id")]
    #[actix_web::test]
    async fn get_rejects_bad_ids(#[case] uri: &str, #[case] code: &str) {
        let mut queries = MockTodoQuery::new();
        queries.expect_get().never();

        let (status, body) = send(
            MockTodoCommand::new(),
            queries,
            authed(test::TestRequest::get().uri(uri)),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["code"], code);
    }

    #[actix_web::test]
    async fn get_surfaces_forbidden() {
        let mut queries = MockTodoQuery::new();
        queries
            .expect_get()
            .times(1)
            .return_once(|_, _| Err(Error::forbidden("you do not have access to this todo")));

        let (status, body) = send(
            MockTodoCommand::new(),
            queries,
            authed(test::TestRequest::get().uri("/api/todos/9")),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "forbidden");
    }

    #[actix_web::test]
    async fn patch_passes_tri_state_fields_through() {
        let mut commands = MockTodoCommand::new();
        commands
            .expect_update()
            .withf(|_, id, patch| {
                id.get() == 1
                    && patch.title.is_none()
                    && patch.description == Patch::Clear
                    && matches!(&patch.image_url, Patch::Set(url) if url.as_str() == "https://x.io/a.png")
            })
            .times(1)
            .return_once(|_, _, _| Ok(sample_todo(1, TodoStatus::Pending)));

        let (status, _) = send(
            commands,
            MockTodoQuery::new(),
            authed(test::TestRequest::patch().uri("/api/todos/1"))
                .set_json(json!({ "description": null, "imageUrl": "https://x.io/a.png" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[actix_web::test]
    async fn patch_with_empty_object_reaches_service_as_empty_patch() {
        let mut commands = MockTodoCommand::new();
        commands
            .expect_update()
            .withf(|_, _, patch| patch.is_empty())
            .times(1)
            .return_once(|_, _, _| Err(Error::no_fields_provided("no update fields provided")));

        let (status, body) = send(
            commands,
            MockTodoQuery::new(),
            authed(test::TestRequest::patch().uri("/api/todos/1")).set_json(json!({})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "no_fields_provided");
    }

    #[actix_web::test]
    async fn patch_cannot_clear_title() {
        let mut commands = MockTodoCommand::new();
        commands.expect_update().never();

        let (status, body) = send(
            commands,
            MockTodoQuery::new(),
            authed(test::TestRequest::patch().uri("/api/todos/1")).set_json(json!({ "title": null })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["code"], "title_not_clearable");
    }

    #[rstest]
    #[case("In Progress", StatusCode::OK)]
    #[case("Done", StatusCode::OK)]
    #[case("in progress", StatusCode::BAD_REQUEST)]
    #[case("Archived", StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn status_accepts_only_known_values(#[case] raw: &str, #[case] expected: StatusCode) {
        let mut commands = MockTodoCommand::new();
        commands
            .expect_update_status()
            .returning(|_, id, status| Ok(sample_todo(id.get(), status)));

        let (status, body) = send(
            commands,
            MockTodoQuery::new(),
            authed(test::TestRequest::put().uri("/api/todos/1/status"))
                .set_json(json!({ "status": raw })),
        )
        .await;

        assert_eq!(status, expected);
        if expected == StatusCode::OK {
            assert_eq!(body["status"], raw);
        } else {
            assert_eq!(body["details"]["code"], "invalid_status");
        }
    }

    #[actix_web::test]
    async fn delete_returns_204() {
        let mut commands = MockTodoCommand::new();
        commands
            .expect_delete()
            .withf(|owner, id| owner.get() == 5 && id.get() == 3)
            .times(1)
            .return_once(|_, _| Ok(()));

        let (status, body) = send(
            commands,
            MockTodoQuery::new(),
            authed(test::TestRequest::delete().uri("/api/todos/3")),
        )
        .await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);
    }
}
