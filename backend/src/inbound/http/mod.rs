//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod auth;
pub mod error;
pub mod health;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod todos;
pub mod uploads;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register the `/api` routes together with the JSON and path extractor
/// configuration that keeps their rejections in the error envelope.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use todo_backend::inbound::http::configure_api;
///
/// let app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .service(accounts::register)
                        .service(accounts::login),
                )
                .service(
                    web::scope("/todos")
                        .service(todos::create_todo)
                        .service(todos::list_todos)
                        .service(todos::update_todo_status)
                        .service(todos::get_todo)
                        .service(todos::update_todo)
                        .service(todos::delete_todo),
                )
                .service(web::scope("/uploads").service(uploads::upload_image)),
        );
}
