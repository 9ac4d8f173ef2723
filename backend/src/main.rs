//! Backend entry-point: loads configuration, prepares storage, and serves the
//! REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, UploadConfig, create_server};
use todo_backend::config::{
    AppSettings, BuildMode, secret_fingerprint, token_secret_from_env,
};
use todo_backend::inbound::http::health::HealthState;
use todo_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations_blocking};
use todo_backend::outbound::token::TokenSettings;

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {err}"))
}

async fn build_server_config(settings: &AppSettings) -> std::io::Result<ServerConfig> {
    let secret = token_secret_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|err| startup_error("signing secret", err))?;
    info!(fingerprint = %secret_fingerprint(&secret), "token signing secret loaded");
    let tokens = TokenSettings::new(
        secret,
        settings.token_ttl().map_err(|err| startup_error("settings", err))?,
    )
    .with_leeway(settings.token_leeway().map_err(|err| startup_error("settings", err))?);

    let bind_addr = settings
        .bind_addr()
        .map_err(|err| startup_error("settings", err))?;
    let mut config = ServerConfig::new(bind_addr, tokens);

    match settings.database_url.as_deref() {
        Some(url) => {
            if settings.run_migrations() {
                let applied = run_pending_migrations_blocking(url.to_owned())
                    .await
                    .map_err(|err| startup_error("database migrations", err))?;
                info!(applied, "database migrations complete");
            }
            let max_size = settings
                .pool_max_size()
                .map_err(|err| startup_error("settings", err))?;
            let pool = DbPool::new(PoolConfig::new(url).with_max_size(max_size))
                .await
                .map_err(|err| startup_error("database pool", err))?;
            config = config.with_db_pool(pool);
        }
        None => warn!("TODO_DATABASE_URL not set; records are kept in memory only"),
    }

    if let Some(dir) = settings.upload_dir.clone() {
        let public_base = settings
            .upload_public_base_url()
            .map_err(|err| startup_error("settings", err))?;
        config = config.with_uploads(UploadConfig::new(dir, public_base));
    }

    Ok(config)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| startup_error("configuration", err))?;
    let config = build_server_config(&settings).await?;
    let bind_addr = config.bind_addr;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config, Arc::new(DefaultClock))?;
    info!(%bind_addr, "todo backend listening");
    server.await
}
