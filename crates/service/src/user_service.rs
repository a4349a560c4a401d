use chrono::Utc;
use tracing::info;

use models::user::{self, Role, User};
use crate::{errors::ServiceError, session::hash_password, storage::Repository};

/// Input for creating a user. The password is hashed before it is stored.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Role,
    pub password: String,
}

/// Append a user to the users document.
/// Usernames are compared case-insensitively.
pub async fn create_user(repo: &dyn Repository<Vec<User>>, input: NewUser) -> Result<User, ServiceError> {
    user::validate_username(&input.username)?;
    let password_hash = hash_password(&input.password)?;

    let mut users = repo.get().await?;
    let username = input.username.trim().to_string();
    if users.iter().any(|u| u.username.eq_ignore_ascii_case(&username)) {
        return Err(ServiceError::Validation(format!("username {username} already taken")));
    }

    let created = User {
        id: models::new_id(),
        username,
        name: input.name,
        role: input.role,
        password_hash,
        active: true,
        created_at: Some(Utc::now()),
    };
    users.push(created.clone());
    repo.save(users).await?;
    info!(user_id = %created.id, username = %created.username, "user_created");
    Ok(created)
}

/// Replace a user's password.
pub async fn set_password(repo: &dyn Repository<Vec<User>>, id: &str, password: &str) -> Result<(), ServiceError> {
    let hash = hash_password(password)?;
    let mut users = repo.get().await?;
    let found = users.iter_mut().find(|u| u.id == id).ok_or_else(|| ServiceError::not_found("user"))?;
    found.password_hash = hash;
    repo.save(users).await
}

/// Mark a user inactive; inactive users cannot log in.
pub async fn deactivate_user(repo: &dyn Repository<Vec<User>>, id: &str) -> Result<(), ServiceError> {
    let mut users = repo.get().await?;
    let found = users.iter_mut().find(|u| u.id == id).ok_or_else(|| ServiceError::not_found("user"))?;
    found.active = false;
    repo.save(users).await
}

/// Create an `admin` account when the users document is empty.
/// Returns whether an account was created.
pub async fn seed_admin(repo: &dyn Repository<Vec<User>>, password: &str) -> Result<bool, ServiceError> {
    if !repo.get().await?.is_empty() {
        return Ok(false);
    }
    create_user(
        repo,
        NewUser { username: "admin".into(), name: "Administrator".into(), role: Role::Admin, password: password.into() },
    )
    .await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryRepository;

    fn input(username: &str) -> NewUser {
        NewUser { username: username.into(), name: "Tester".into(), role: Role::Attendant, password: "secret1".into() }
    }

    #[tokio::test]
    async fn user_crud_service() -> Result<(), ServiceError> {
        let repo = InMemoryRepository::<Vec<User>>::default();

        let u = create_user(&repo, input("carla")).await?;
        assert!(u.password_hash.starts_with("$argon2"));
        assert!(matches!(create_user(&repo, input("CARLA")).await, Err(ServiceError::Validation(_))));
        assert!(matches!(create_user(&repo, input("with space")).await, Err(ServiceError::Validation(_))));

        let old_hash = u.password_hash.clone();
        set_password(&repo, &u.id, "another1").await?;
        let users = repo.get().await?;
        assert_ne!(users[0].password_hash, old_hash);

        deactivate_user(&repo, &u.id).await?;
        assert!(!repo.get().await?[0].active);
        assert!(matches!(deactivate_user(&repo, "missing").await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn seed_admin_only_on_empty_document() -> Result<(), ServiceError> {
        let repo = InMemoryRepository::<Vec<User>>::default();
        assert!(seed_admin(&repo, "admin123").await?);
        assert!(!seed_admin(&repo, "admin123").await?);
        let users = repo.get().await?;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, Role::Admin);
        Ok(())
    }
}
