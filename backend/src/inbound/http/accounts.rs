//! Account API handlers.
//!
//! ```text
//! POST /api/auth/register {"email":"a@x.com","password":"secret1"}
//! POST /api/auth/login    {"email":"a@x.com","password":"secret1"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::LoginSession;
use crate::domain::{
    CredentialsValidationError, Error, LoginCredentials, RegistrationCredentials, User,
    UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Credentials body shared by register and login.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "secret1")]
    pub password: String,
}

fn map_credentials_error(err: CredentialsValidationError) -> Error {
    let (field, code) = match &err {
        CredentialsValidationError::Email(UserValidationError::EmptyEmail) => ("email", "empty_email"),
        CredentialsValidationError::Email(UserValidationError::EmailTooLong { .. }) => {
            ("email", "email_too_long")
        }
        CredentialsValidationError::Email(_) => ("email", "invalid_email"),
        CredentialsValidationError::EmptyPassword => ("password", "empty_password"),
        CredentialsValidationError::PasswordTooShort { .. } => ("password", "password_too_short"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid email or password", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let CredentialsRequest { email, password } = payload.into_inner();
    let credentials =
        RegistrationCredentials::try_from_parts(&email, &password).map_err(map_credentials_error)?;
    let user = state.accounts.register(credentials).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", body = LoginSession),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<LoginSession>> {
    let CredentialsRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(map_credentials_error)?;
    let session = state.accounts.login(credentials).await?;
    Ok(web::Json(session))
}
