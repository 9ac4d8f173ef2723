//! Builders wiring repositories and adapters into the HTTP state.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use todo_backend::domain::ports::{
    AccountCommand, DisabledImageStore, ImageUploadCommand, TodoCommand, TodoQuery,
    TodoRepository, TokenService, UserRepository,
};
use todo_backend::domain::{AccountService, ImageUploadService, PasswordHasher, TodoService};
use todo_backend::inbound::http::state::HttpState;
use todo_backend::outbound::memory::{InMemoryTodoRepository, InMemoryUserRepository};
use todo_backend::outbound::persistence::{DieselTodoRepository, DieselUserRepository};
use todo_backend::outbound::storage::CapStdImageStore;
use todo_backend::outbound::token::JwtTokenService;

use super::{ServerConfig, UploadConfig};

/// Shared collaborators every service pair needs.
struct ServiceDeps {
    hasher: PasswordHasher,
    tokens: Arc<dyn TokenService>,
    clock: Arc<dyn Clock>,
}

type TodoPorts = (Arc<dyn TodoCommand>, Arc<dyn TodoQuery>);

fn build_services<U, T>(users: U, todos: T, deps: &ServiceDeps) -> (Arc<dyn AccountCommand>, TodoPorts)
where
    U: UserRepository + 'static,
    T: TodoRepository + 'static,
{
    let accounts = Arc::new(AccountService::new(
        Arc::new(users),
        deps.hasher.clone(),
        deps.tokens.clone(),
    ));
    let todo_service = Arc::new(TodoService::new(Arc::new(todos), deps.clock.clone()));
    let todos: Arc<dyn TodoCommand> = todo_service.clone();
    let todos_query: Arc<dyn TodoQuery> = todo_service;
    (accounts, (todos, todos_query))
}

fn build_upload_command(uploads: Option<&UploadConfig>) -> std::io::Result<Arc<dyn ImageUploadCommand>> {
    match uploads {
        Some(config) => {
            let store = CapStdImageStore::open(&config.dir, config.public_base.clone())
                .map_err(|err| std::io::Error::other(format!("image store setup failed: {err}")))?;
            info!(dir = %config.dir.display(), base = %config.public_base, "image uploads enabled");
            Ok(Arc::new(ImageUploadService::new(Arc::new(store))))
        }
        None => {
            warn!("no upload directory configured; image uploads are disabled");
            Ok(Arc::new(ImageUploadService::new(Arc::new(DisabledImageStore))))
        }
    }
}

/// Assemble the HTTP state, choosing PostgreSQL or in-memory repositories
/// depending on whether a pool is configured.
///
/// # Errors
/// Returns [`std::io::Error`] when the password hasher or image store cannot
/// be initialised.
pub(super) fn build_http_state(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> std::io::Result<HttpState> {
    let hasher = PasswordHasher::with_default_params()
        .map_err(|err| std::io::Error::other(format!("password hasher setup failed: {err}")))?;
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(&config.tokens, clock.clone()));
    let deps = ServiceDeps {
        hasher,
        tokens: tokens.clone(),
        clock: clock.clone(),
    };

    let (accounts, (todos, todos_query)) = match &config.db_pool {
        Some(pool) => build_services(
            DieselUserRepository::new(pool.clone()),
            DieselTodoRepository::new(pool.clone()),
            &deps,
        ),
        None => {
            warn!("no database configured; using in-memory stores, data is lost on restart");
            build_services(
                InMemoryUserRepository::new(clock),
                InMemoryTodoRepository::new(),
                &deps,
            )
        }
    };

    Ok(HttpState {
        accounts,
        todos,
        todos_query,
        uploads: build_upload_command(config.uploads.as_ref())?,
        tokens,
    })
}
