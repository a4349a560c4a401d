use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Health;

use crate::state::AppState;

pub mod data;
pub mod session;
pub mod users;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router: health, session routes, and the
/// entity pass-through (guarded by the session token when configured).
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/api/session", get(session::current))
        .route("/api/session/login", post(session::login))
        .route("/api/session/logout", post(session::logout));

    let mut api = Router::new()
        .route("/api/data/:entity", get(data::get_entity).post(data::save_entity))
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/users/:id/password", post(users::set_password))
        .route("/api/users/:id/deactivate", post(users::deactivate_user));
    if state.require_session {
        api = api.route_layer(middleware::from_fn_with_state(state.clone(), session::require_session));
    }

    public
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
