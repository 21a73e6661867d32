use anyhow::Result;
use chrono::Utc;
use contracts::system::users::{CreateUserDto, User};
use sea_orm::DatabaseConnection;

use super::repository;
use crate::system::auth::password;

/// Create a new user
pub async fn create(db: &DatabaseConnection, dto: CreateUserDto) -> Result<String> {
    let username = dto.username.trim().to_string();
    if username.is_empty() {
        return Err(anyhow::anyhow!("Username cannot be empty"));
    }

    if repository::get_by_username(db, &username).await?.is_some() {
        return Err(anyhow::anyhow!("Username already exists"));
    }

    password::validate_password_strength(&dto.password)?;
    let password_hash = password::hash_password(&dto.password)?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let user = User {
        id: user_id.clone(),
        username,
        full_name: dto.full_name,
        is_active: true,
        is_admin: dto.is_admin,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
    };

    repository::create_with_password(db, &user, &password_hash).await?;

    Ok(user_id)
}

pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<User>> {
    repository::get_by_id(db, id).await
}

/// Verify user credentials; `None` для неизвестного, отключённого или неверного пароля
pub async fn verify_credentials(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<Option<User>> {
    let Some(user) = repository::get_by_username(db, username.trim()).await? else {
        return Ok(None);
    };

    if !user.is_active {
        return Ok(None);
    }

    let Some(hash) = repository::get_password_hash(db, &user.id).await? else {
        return Ok(None);
    };

    if !password::verify_password(password, &hash)? {
        return Ok(None);
    }

    repository::update_last_login(db, &user.id).await?;
    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_database;

    fn dto(username: &str, password: &str) -> CreateUserDto {
        CreateUserDto {
            username: username.to_string(),
            password: password.to_string(),
            full_name: Some("Ops".to_string()),
            is_admin: true,
        }
    }

    #[tokio::test]
    async fn test_create_and_login() {
        let (_dir, db) = test_database().await;
        let id = create(&db, dto("ops", "secret1")).await.unwrap();

        let user = verify_credentials(&db, "ops", "secret1").await.unwrap().unwrap();
        assert_eq!(user.id, id);
        assert!(user.is_admin);

        assert!(verify_credentials(&db, "ops", "nope").await.unwrap().is_none());
        assert!(verify_credentials(&db, "ghost", "secret1").await.unwrap().is_none());

        let reloaded = get_by_id(&db, &id).await.unwrap().unwrap();
        assert!(reloaded.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let (_dir, db) = test_database().await;
        create(&db, dto("ops", "secret1")).await.unwrap();
        assert!(create(&db, dto("ops", "secret2")).await.is_err());
        assert!(create(&db, dto("  ", "secret2")).await.is_err());
        assert_eq!(repository::count(&db).await.unwrap(), 1);
    }
}
