//! Session token adapters.

mod jwt_token_service;

pub use jwt_token_service::{JwtTokenService, TokenSettings};
