//! Login state kept in the `session` entity file.
//!
//! The session document holds the logged-in user reference and a bearer
//! token. It has no expiry and no rotation; logout overwrites both fields
//! with `null`.

use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use models::session::{Session, UserRef};
use models::user::User;
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::storage::{FlatFileStore, Repository};

const TOKEN_LEN: usize = 48;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Hash a password into an argon2 PHC string.
pub fn hash_password(plain: &str) -> Result<String, ServiceError> {
    if plain.len() < MIN_PASSWORD_LEN {
        return Err(ServiceError::Validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ServiceError::Validation(e.to_string()))
}

fn verify_password(plain: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default().verify_password(plain.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

fn new_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Session workflows independent of the web framework.
#[derive(Clone)]
pub struct SessionService {
    users: Arc<dyn Repository<Vec<User>>>,
    session: Arc<dyn Repository<Session>>,
}

impl SessionService {
    pub fn new(users: Arc<dyn Repository<Vec<User>>>, session: Arc<dyn Repository<Session>>) -> Self {
        Self { users, session }
    }

    pub fn from_store(store: &FlatFileStore) -> Self {
        Self::new(store.repository::<Vec<User>>(), store.repository::<Session>())
    }

    /// Check credentials against the users document and persist a new session.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ServiceError> {
        let users = self.users.get().await?;
        let user = users
            .iter()
            .find(|u| u.active && u.username.eq_ignore_ascii_case(username.trim()))
            .ok_or(ServiceError::Unauthorized)?;

        if !verify_password(password, &user.password_hash) {
            debug!(user_id = %user.id, "password mismatch");
            return Err(ServiceError::Unauthorized);
        }

        let session = Session { user: Some(UserRef::from(user)), token: Some(new_token()) };
        self.session.save(session.clone()).await?;
        info!(user_id = %user.id, "session_started");
        Ok(session)
    }

    pub async fn current(&self) -> Result<Session, ServiceError> {
        self.session.get().await
    }

    /// Resolve a bearer token to the logged-in user, if it matches.
    pub async fn verify_token(&self, token: &str) -> Result<Option<UserRef>, ServiceError> {
        let session = self.session.get().await?;
        match (session.user, session.token) {
            (Some(user), Some(stored)) if !token.is_empty() && stored == token => Ok(Some(user)),
            _ => Ok(None),
        }
    }

    pub async fn logout(&self) -> Result<(), ServiceError> {
        self.session.save(Session::default()).await?;
        info!("session_cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryRepository;
    use models::user::Role;

    fn user(username: &str, password: &str, active: bool) -> User {
        User {
            id: format!("u-{username}"),
            username: username.into(),
            name: username.to_uppercase(),
            role: Role::Technician,
            password_hash: hash_password(password).unwrap(),
            active,
            created_at: None,
        }
    }

    fn service(users: Vec<User>) -> SessionService {
        SessionService::new(
            Arc::new(InMemoryRepository::new(users)),
            Arc::new(InMemoryRepository::<Session>::default()),
        )
    }

    #[tokio::test]
    async fn login_persists_session_and_logout_nulls_it() -> Result<(), ServiceError> {
        let svc = service(vec![user("joao", "secret1", true)]);

        let session = svc.login("JOAO", "secret1").await?;
        assert!(session.is_logged_in());
        assert_eq!(session.user.as_ref().map(|u| u.id.as_str()), Some("u-joao"));
        assert_eq!(svc.current().await?, session);

        let token = session.token.clone().unwrap();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(svc.verify_token(&token).await?.is_some());
        assert!(svc.verify_token("nope").await?.is_none());

        svc.logout().await?;
        let cleared = svc.current().await?;
        assert_eq!(cleared, Session { user: None, token: None });
        assert!(svc.verify_token(&token).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn bad_credentials_and_inactive_users_are_rejected() {
        let svc = service(vec![user("ana", "secret1", true), user("old", "secret1", false)]);

        assert!(matches!(svc.login("ana", "wrong-pass").await, Err(ServiceError::Unauthorized)));
        assert!(matches!(svc.login("ghost", "secret1").await, Err(ServiceError::Unauthorized)));
        assert!(matches!(svc.login("old", "secret1").await, Err(ServiceError::Unauthorized)));
        assert!(!svc.current().await.unwrap().is_logged_in());
    }

    #[tokio::test]
    async fn corrupt_hash_never_authenticates() {
        let mut u = user("rui", "secret1", true);
        u.password_hash = "not-a-phc-string".into();
        let svc = service(vec![u]);
        assert!(matches!(svc.login("rui", "secret1").await, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn short_password_rejected() {
        assert!(matches!(hash_password("abc"), Err(ServiceError::Validation(_))));
        let h = hash_password("abcdef").unwrap();
        assert!(h.starts_with("$argon2"));
        assert!(verify_password("abcdef", &h));
    }

    #[tokio::test]
    async fn session_file_round_trip_through_store() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("session_svc_{}", uuid::Uuid::new_v4()));
        let store = FlatFileStore::new(&dir);
        store.save_users(&vec![user("bia", "secret1", true)]).await?;

        let svc = SessionService::from_store(&store);
        let session = svc.login("bia", "secret1").await?;
        assert_eq!(store.get_session().await?, session);

        svc.logout().await?;
        let on_disk: serde_json::Value = serde_json::from_slice(&tokio::fs::read(dir.join("session.json")).await?)?;
        assert_eq!(on_disk, serde_json::json!({"user": null, "token": null}));

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
