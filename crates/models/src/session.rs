use serde::{Deserialize, Serialize};

use crate::user::{Role, User};

/// The part of a [`User`] kept in the session file. Never carries the hash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Role,
}

impl From<&User> for UserRef {
    fn from(u: &User) -> Self {
        Self { id: u.id.clone(), username: u.username.clone(), name: u.name.clone(), role: u.role }
    }
}

/// Singleton. Both fields serialize as `null` when logged out.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    pub user: Option<UserRef>,
    pub token: Option<String>,
}

impl Session {
    pub fn is_logged_in(&self) -> bool { self.user.is_some() && self.token.is_some() }
}
