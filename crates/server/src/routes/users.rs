use axum::{extract::{Path, State}, http::StatusCode, Extension, Json};
use models::{session::UserRef, user::Role};
use serde::{Deserialize, Serialize};
use service::user_service::{self, NewUser};

use crate::errors::JsonApiError;
use crate::state::AppState;

/// With sessions enforced, account changes need an admin caller.
fn require_admin(state: &AppState, caller: &Option<Extension<UserRef>>) -> Result<(), JsonApiError> {
    if state.require_session && !matches!(caller, Some(Extension(UserRef { role: Role::Admin, .. }))) {
        return Err(JsonApiError::new(StatusCode::FORBIDDEN, "Forbidden", Some("admin role required".into())));
    }
    Ok(())
}

/// A user without the password hash.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(flatten)]
    pub user: UserRef,
    pub active: bool,
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserView>>, JsonApiError> {
    let users = state.store.get_users().await?;
    Ok(Json(users.iter().map(|u| UserView { user: UserRef::from(u), active: u.active }).collect()))
}

/// Create a user. With sessions enforced only admins may do this.
pub async fn create_user(
    State(state): State<AppState>,
    caller: Option<Extension<UserRef>>,
    Json(input): Json<NewUser>,
) -> Result<(StatusCode, Json<UserView>), JsonApiError> {
    require_admin(&state, &caller)?;
    let repo = state.store.doc::<Vec<models::user::User>>();
    let created = user_service::create_user(&repo, input).await?;
    Ok((StatusCode::CREATED, Json(UserView { user: UserRef::from(&created), active: created.active })))
}

#[derive(Deserialize, Debug)]
pub struct PasswordInput {
    pub password: String,
}

pub async fn set_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    caller: Option<Extension<UserRef>>,
    Json(input): Json<PasswordInput>,
) -> Result<StatusCode, JsonApiError> {
    require_admin(&state, &caller)?;
    let repo = state.store.doc::<Vec<models::user::User>>();
    user_service::set_password(&repo, &id, &input.password).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deactivated users keep their record but can no longer log in.
pub async fn deactivate_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    caller: Option<Extension<UserRef>>,
) -> Result<StatusCode, JsonApiError> {
    require_admin(&state, &caller)?;
    let repo = state.store.doc::<Vec<models::user::User>>();
    user_service::deactivate_user(&repo, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
