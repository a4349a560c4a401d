use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;
use service::{runtime, storage::FlatFileStore, user_service};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Build handler state from configuration. Performs no I/O.
pub fn build_state(cfg: &AppConfig) -> AppState {
    let store = FlatFileStore::new(&cfg.storage.data_dir).with_pretty(cfg.storage.pretty);
    AppState::new(store, cfg.server.require_session)
}

pub fn build_app(cfg: &AppConfig) -> Router {
    routes::build_router(build_state(cfg), build_cors())
}

/// Create the first admin account from `ADMIN_PASSWORD` when no user exists yet.
async fn seed_admin_from_env(state: &AppState) -> anyhow::Result<()> {
    let Ok(password) = std::env::var("ADMIN_PASSWORD") else { return Ok(()) };
    let repo = state.store.doc::<Vec<models::user::User>>();
    if user_service::seed_admin(&repo, &password).await? {
        info!("seeded admin account");
    }
    Ok(())
}

/// Prepare the data directory, seed the first account and serve until the
/// listener fails. Expects logging to be initialized by the caller.
pub async fn run_with(cfg: AppConfig) -> anyhow::Result<()> {
    runtime::ensure_env(&cfg.storage.data_dir)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let state = build_state(&cfg);
    seed_admin_from_env(&state).await?;
    if cfg.server.require_session && state.store.get_users().await?.is_empty() {
        warn!("sessions are required but no user exists; set ADMIN_PASSWORD to seed one");
    }

    let app = routes::build_router(state, build_cors());

    let addr: SocketAddr = cfg
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}: {e}", cfg.bind_addr())))?;
    info!(%addr, data_dir = %cfg.storage.data_dir, require_session = cfg.server.require_session, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
