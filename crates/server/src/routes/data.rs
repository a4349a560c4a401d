use axum::{extract::{Path, State}, http::StatusCode, Json};
use common::types::Ack;
use models::EntityKind;
use serde_json::Value;

use crate::errors::JsonApiError;
use crate::state::AppState;

/// Strip `passwordHash` from every record of a users document.
fn redact_users(doc: &mut Value) {
    if let Value::Array(users) = doc {
        for u in users.iter_mut() {
            if let Value::Object(map) = u {
                map.remove("passwordHash");
            }
        }
    }
}

/// The bearer token is only handed out by the login route.
fn redact_session(doc: &mut Value) {
    if let Value::Object(map) = doc {
        map.remove("token");
    }
}

/// Return the stored document of an entity, creating the default on first read.
pub async fn get_entity(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> Result<Json<Value>, JsonApiError> {
    let kind = state.raw.resolve(&entity)?;
    let mut doc = state.raw.get(kind.name()).await?;
    match kind {
        EntityKind::Users => redact_users(&mut doc),
        EntityKind::Session => redact_session(&mut doc),
        _ => {}
    }
    Ok(Json(doc))
}

/// Replace the stored document of an entity with the request body.
pub async fn save_entity(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Ack>, JsonApiError> {
    let kind = state.raw.resolve(&entity)?;
    if matches!(kind, EntityKind::Users | EntityKind::Session) {
        return Err(JsonApiError::new(
            StatusCode::FORBIDDEN,
            "Forbidden",
            Some(format!("{kind} is managed through /api/users and /api/session")),
        ));
    }
    state.raw.save(kind.name(), body).await?;
    Ok(Json(Ack { ok: true }))
}
