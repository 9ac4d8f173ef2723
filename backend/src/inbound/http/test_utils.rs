//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use crate::domain::ports::{
    MockAccountCommand, MockImageUploadCommand, MockTodoCommand, MockTodoQuery, MockTokenService,
};
use crate::inbound::http::state::HttpState;

/// State whose driving ports are strict mocks with no expectations, so any
/// unexpected call fails the test.
pub fn state_with_tokens(tokens: MockTokenService) -> HttpState {
    HttpState {
        accounts: Arc::new(MockAccountCommand::new()),
        todos: Arc::new(MockTodoCommand::new()),
        todos_query: Arc::new(MockTodoQuery::new()),
        uploads: Arc::new(MockImageUploadCommand::new()),
        tokens: Arc::new(tokens),
    }
}

/// Token mock accepting the bearer token `good` as user 5.
pub fn accepting_tokens() -> MockTokenService {
    use crate::domain::UserId;
    use crate::domain::ports::{TokenError, VerifiedSession};
    use chrono::Utc;

    let mut tokens = MockTokenService::new();
    tokens.expect_verify().returning(|token| match token {
        "good" => Ok(VerifiedSession {
            user_id: UserId::new(5).expect("valid id"),
            issued_at: Utc::now(),
            expires_at: Utc::now(),
        }),
        _ => Err(TokenError::bad_signature()),
    });
    tokens
}
