//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint from the inbound layer, the
//! request and response schemas they exchange, and the bearer token security
//! scheme applied to the todo and upload routes. The document is served by
//! Swagger UI in debug builds and exported via `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::{LoginSession, UploadedImage};
use crate::domain::{Error, ErrorCode, Todo, TodoStatus, User};
use crate::inbound::http::accounts::CredentialsRequest;
use crate::inbound::http::todos::{CreateTodoRequest, UpdateStatusRequest, UpdateTodoRequest};

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Todo backend API",
        description = "Account registration, bearer-token login, and per-user todo lists."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::todos::create_todo,
        crate::inbound::http::todos::list_todos,
        crate::inbound::http::todos::get_todo,
        crate::inbound::http::todos::update_todo,
        crate::inbound::http::todos::update_todo_status,
        crate::inbound::http::todos::delete_todo,
        crate::inbound::http::uploads::upload_image,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        LoginSession,
        Todo,
        TodoStatus,
        UploadedImage,
        CredentialsRequest,
        CreateTodoRequest,
        UpdateTodoRequest,
        UpdateStatusRequest,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "todos", description = "Todo items owned by the caller"),
        (name = "uploads", description = "Image attachments"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
