//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, UploadConfig};

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::Clock;

use todo_backend::Trace;
#[cfg(debug_assertions)]
use todo_backend::doc::ApiDoc;
use todo_backend::inbound::http::configure_api;
use todo_backend::inbound::http::health::{HealthState, live, ready};
use todo_backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure_api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] with the bind address, token settings,
///   and optional database pool and upload directory.
/// - `clock`: time source for token issuance and record timestamps.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when state construction, binding the socket,
/// or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
    clock: Arc<dyn Clock>,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config, clock)?);

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::TimeDelta;
    use mockable::DefaultClock;
    use serde_json::{Value, json};
    use todo_backend::outbound::token::TokenSettings;
    use zeroize::Zeroizing;

    fn config() -> ServerConfig {
        let tokens = TokenSettings::new(
            Zeroizing::new(b"0123456789abcdef0123456789abcdef".to_vec()),
            TimeDelta::minutes(5),
        );
        ServerConfig::new("127.0.0.1:0".parse().expect("valid address"), tokens)
    }

    #[actix_web::test]
    async fn create_server_marks_ready() {
        let health_state = web::Data::new(HealthState::new());
        let _server = create_server(health_state.clone(), config(), Arc::new(DefaultClock))
            .expect("server builds");
        assert!(health_state.is_ready());
    }

    #[actix_web::test]
    async fn app_serves_api_and_health_routes() {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        let http_state = web::Data::new(
            build_http_state(&config(), Arc::new(DefaultClock)).expect("state builds"),
        );
        let app = test::init_service(build_app(health_state, http_state)).await;

        let probe = test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request()).await;
        assert_eq!(probe.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "email": "a@x.com", "password": "secret1" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert!(res.headers().contains_key("trace-id"));

        let req = test::TestRequest::get().uri("/api/todos").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert!(body["traceId"].is_string());
    }
}
