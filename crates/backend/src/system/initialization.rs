use anyhow::Result;
use contracts::system::users::CreateUserDto;
use sea_orm::DatabaseConnection;

use crate::projections::p900_weekly_accounting::repository as weekly_reports;
use crate::shared::config::AdminConfig;
use crate::system::users::{repository, service};

/// Ensure admin user exists (create if table is empty)
pub async fn ensure_admin_user_exists(db: &DatabaseConnection, admin: &AdminConfig) -> Result<()> {
    let count = repository::count(db).await?;
    if count > 0 {
        tracing::debug!("Users present: {}", count);
        return Ok(());
    }

    tracing::info!("No users found. Creating default admin user...");

    let admin_dto = CreateUserDto {
        username: admin.username.clone(),
        password: admin.password.clone(),
        full_name: admin.full_name.clone(),
        is_admin: true,
    };
    service::create(db, admin_dto).await?;

    tracing::warn!("========================================");
    tracing::warn!("  Admin user created: {}", admin.username);
    tracing::warn!("  Change the password in config.toml");
    tracing::warn!("========================================");

    Ok(())
}

/// Расчёты, оборванные остановкой сервера, помечаются ошибкой,
/// иначе неделю нельзя было бы пересчитать
pub async fn recover_interrupted_reports(db: &DatabaseConnection) -> Result<()> {
    let failed = weekly_reports::fail_interrupted(db).await?;
    if failed > 0 {
        tracing::warn!("Marked {} interrupted weekly report(s) as failed", failed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_database;

    #[tokio::test]
    async fn test_admin_created_once() {
        let (_dir, db) = test_database().await;
        let admin = AdminConfig::default();
        ensure_admin_user_exists(&db, &admin).await.unwrap();
        ensure_admin_user_exists(&db, &admin).await.unwrap();
        assert_eq!(repository::count(&db).await.unwrap(), 1);
        let user = service::verify_credentials(&db, "admin", "admin").await.unwrap();
        assert!(user.unwrap().is_admin);
    }
}
