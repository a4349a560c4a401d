use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Admin,
    Technician,
    #[default]
    Attendant,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Role,
    /// Argon2 PHC string.
    #[serde(default)]
    pub password_hash: String,
    #[serde(default = "active")]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn active() -> bool { true }

pub fn validate_username(username: &str) -> Result<(), ModelError> {
    let trimmed = username.trim();
    if trimmed.is_empty() { return Err(ModelError::Validation("username required".into())); }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(ModelError::Validation("username must not contain spaces".into()));
    }
    Ok(())
}
