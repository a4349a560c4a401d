use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use models::session::{Session, UserRef};
use serde::{Deserialize, Serialize};

use crate::errors::JsonApiError;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSession {
    pub logged_in: bool,
    pub user: Option<UserRef>,
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<Session>, JsonApiError> {
    let session = state.sessions.login(&input.username, &input.password).await?;
    Ok(Json(session))
}

/// Current session without the token.
pub async fn current(State(state): State<AppState>) -> Result<Json<CurrentSession>, JsonApiError> {
    let session = state.sessions.current().await?;
    Ok(Json(CurrentSession { logged_in: session.is_logged_in(), user: session.user }))
}

pub async fn logout(State(state): State<AppState>) -> Result<StatusCode, JsonApiError> {
    state.sessions.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

fn bearer_token(req: &Request) -> Option<String> {
    let from_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string());

    from_header.or_else(|| {
        // fallback to query param
        req.uri().query().and_then(|q| {
            q.split('&').find_map(|pair| {
                let mut it = pair.splitn(2, '=');
                match (it.next(), it.next()) {
                    (Some("token"), Some(v)) => Some(v.to_string()),
                    _ => None,
                }
            })
        })
    })
}

/// Middleware: require the stored session token (Authorization: Bearer, or
/// query `token`). The resolved [`UserRef`] is added to request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let token = match bearer_token(&req) {
        Some(t) if !t.is_empty() => t,
        _ => return Err(JsonApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some("missing session token".into()))),
    };

    let user = state
        .sessions
        .verify_token(&token)
        .await?
        .ok_or_else(|| JsonApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some("invalid session token".into())))?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
