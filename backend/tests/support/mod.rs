//! Shared harness for HTTP integration tests over in-memory adapters.

use std::sync::Arc;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde_json::{Value, json};
use zeroize::Zeroizing;

use todo_backend::Trace;
use todo_backend::domain::ports::DisabledImageStore;
use todo_backend::domain::{AccountService, ImageUploadService, PasswordHasher, TodoService};
use todo_backend::inbound::http::configure_api;
use todo_backend::inbound::http::state::HttpState;
use todo_backend::outbound::memory::{InMemoryTodoRepository, InMemoryUserRepository};
use todo_backend::outbound::token::{JwtTokenService, TokenSettings};
use todo_backend::test_support::MutableClock;

pub const TOKEN_TTL_MINUTES: i64 = 60;

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0)
        .single()
        .expect("valid time")
}

/// Fully wired state plus the clock driving it.
pub struct Harness {
    pub clock: Arc<MutableClock>,
    pub state: HttpState,
}

pub fn harness() -> Harness {
    let clock = Arc::new(MutableClock::new(epoch()));
    let settings = TokenSettings::new(
        Zeroizing::new(b"integration-test-secret-0123456789".to_vec()),
        TimeDelta::minutes(TOKEN_TTL_MINUTES),
    );
    let tokens = Arc::new(JwtTokenService::new(&settings, clock.clone()));
    let accounts = AccountService::new(
        Arc::new(InMemoryUserRepository::new(clock.clone())),
        PasswordHasher::for_tests(),
        tokens.clone(),
    );
    let todos = Arc::new(TodoService::new(
        Arc::new(InMemoryTodoRepository::new()),
        clock.clone(),
    ));
    let state = HttpState {
        accounts: Arc::new(accounts),
        todos: todos.clone(),
        todos_query: todos,
        uploads: Arc::new(ImageUploadService::new(Arc::new(DisabledImageStore))),
        tokens,
    };
    Harness { clock, state }
}

pub async fn init_app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .configure(configure_api),
    )
    .await
}

/// Send `req` and decode the body as JSON (`Null` when empty).
pub async fn send<S>(app: &S, req: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

pub fn bearer(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.insert_header((AUTHORIZATION, format!("Bearer {token}")))
}

pub async fn register<S>(app: &S, email: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    send(
        app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "email": email, "password": password })),
    )
    .await
}

pub async fn login<S>(app: &S, email: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    send(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": email, "password": password })),
    )
    .await
}

/// Register and log in, returning the bearer token.
pub async fn signed_in<S>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, _) = register(app, email, "secret1").await;
    assert_eq!(status, StatusCode::CREATED, "registration of {email}");
    let (status, body) = login(app, email, "secret1").await;
    assert_eq!(status, StatusCode::OK, "login of {email}");
    body["token"].as_str().expect("token string").to_owned()
}
