use std::net::SocketAddr;
use std::path::Path;

use axum::Router;
use configs::{AppConfig, ServerConfig};
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// `config.toml` (or `CONFIG_PATH`) when present, otherwise environment and
/// the development database.
pub fn load_config() -> Result<AppConfig, StartupError> {
    load_config_from(&configs::config_path())
}

/// A file that exists must parse and validate; only a missing file falls
/// back to the environment.
pub fn load_config_from(path: &str) -> Result<AppConfig, StartupError> {
    if Path::new(path).exists() {
        return AppConfig::load_and_validate_from(path)
            .map_err(|e| StartupError::InvalidConfig(format!("{path}: {e}")));
    }
    warn!(path, "config file not found; falling back to environment");
    let mut cfg = AppConfig::default();
    cfg.server.apply_env();
    cfg.database = models::db::load_config();
    cfg.normalize_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    Ok(cfg)
}

fn bind_addr(server: &ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}:{}: {e}", server.host, server.port)))
}

/// Connect the pool and apply migrations when configured.
pub async fn connect_database(config: &AppConfig) -> Result<DatabaseConnection, StartupError> {
    let db = models::db::connect_with_config(&config.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    if config.database.run_migrations {
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Migration(e.to_string()))?;
        info!("schema migrations applied");
    }
    Ok(db)
}

pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    let config = load_config()?;
    let db = connect_database(&config).await?;
    let app = build_app(ServerState::new(db, &config));

    let addr = bind_addr(&config.server)?;
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
