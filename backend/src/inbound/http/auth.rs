//! Bearer-token authentication extractor.
//!
//! Handlers that take an [`AuthenticatedUser`] argument only run for requests
//! carrying `Authorization: Bearer <token>` with a token the configured
//! [`TokenService`](crate::domain::ports::TokenService) accepts. The three
//! failure modes share status 401 and differ only in `details.code`.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use serde_json::json;
use tracing::{debug, error};

use crate::domain::{Error, UserId};
use crate::inbound::http::state::HttpState;

const BEARER_SCHEME: &str = "Bearer";

/// Identity attached to an authenticated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    user_id: UserId,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}

fn rejection(message: &str, code: &str) -> Error {
    Error::unauthorized(message).with_details(json!({ "code": code }))
}

/// Split `Bearer <token>`; the scheme is matched case-insensitively.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !token.is_empty() && !token.contains(' '))
        .then_some(token)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        return Err(rejection(
            "missing authorization header",
            "missing_authorization_header",
        ));
    };
    let token = header
        .to_str()
        .ok()
        .and_then(bearer_token)
        .ok_or_else(|| {
            rejection(
                "authorization header must be 'Bearer <token>'",
                "invalid_authorization_format",
            )
        })?;

    let state = req.app_data::<web::Data<HttpState>>().ok_or_else(|| {
        error!("HttpState missing from app data");
        Error::internal("authentication is not configured")
    })?;

    match state.tokens.verify(token) {
        Ok(session) => Ok(AuthenticatedUser {
            user_id: session.user_id,
        }),
        Err(cause) => {
            debug!(%cause, "bearer token rejected");
            Err(rejection("invalid or expired token", "invalid_token"))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(actix_web::Error::from))
    }
}
