use anyhow::{Context, Result};
use contracts::system::users::User;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, QueryResult, Statement};

const USER_COLUMNS: &str =
    "id, username, full_name, is_active, is_admin, created_at, updated_at, last_login_at";

fn user_from_row(row: &QueryResult) -> Result<User> {
    Ok(User {
        id: row.try_get("", "id")?,
        username: row.try_get("", "username")?,
        full_name: row.try_get("", "full_name")?,
        is_active: row.try_get::<i32>("", "is_active")? != 0,
        is_admin: row.try_get::<i32>("", "is_admin")? != 0,
        created_at: row.try_get("", "created_at")?,
        updated_at: row.try_get("", "updated_at")?,
        last_login_at: row.try_get("", "last_login_at")?,
    })
}

/// Create user with password hash
pub async fn create_with_password(
    db: &DatabaseConnection,
    user: &User,
    password_hash: &str,
) -> Result<()> {
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_users (id, username, password_hash, full_name, is_active, is_admin, created_at, updated_at, last_login_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        [
            user.id.clone().into(),
            user.username.clone().into(),
            password_hash.to_string().into(),
            user.full_name.clone().into(),
            (if user.is_active { 1 } else { 0 }).into(),
            (if user.is_admin { 1 } else { 0 }).into(),
            user.created_at.clone().into(),
            user.updated_at.clone().into(),
            user.last_login_at.clone().into(),
        ],
    ))
    .await
    .context("Failed to insert user")?;

    Ok(())
}

pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<User>> {
    let row = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            format!("SELECT {} FROM sys_users WHERE id = ?", USER_COLUMNS),
            [id.into()],
        ))
        .await?;
    row.as_ref().map(user_from_row).transpose()
}

pub async fn get_by_username(db: &DatabaseConnection, username: &str) -> Result<Option<User>> {
    let row = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            format!("SELECT {} FROM sys_users WHERE username = ?", USER_COLUMNS),
            [username.into()],
        ))
        .await?;
    row.as_ref().map(user_from_row).transpose()
}

pub async fn get_password_hash(db: &DatabaseConnection, user_id: &str) -> Result<Option<String>> {
    let row = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT password_hash FROM sys_users WHERE id = ?",
            [user_id.into()],
        ))
        .await?;
    match row {
        Some(row) => Ok(Some(row.try_get("", "password_hash")?)),
        None => Ok(None),
    }
}

pub async fn update_last_login(db: &DatabaseConnection, user_id: &str) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_users SET last_login_at = ? WHERE id = ?",
        [now.into(), user_id.into()],
    ))
    .await?;
    Ok(())
}

pub async fn count(db: &DatabaseConnection) -> Result<i64> {
    let row = db
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) AS cnt FROM sys_users".to_string(),
        ))
        .await?;
    match row {
        Some(row) => Ok(row.try_get("", "cnt")?),
        None => Ok(0),
    }
}
