use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};

const ACCESS_TOKEN_LIFETIME_HOURS: i64 = 24;
const REFRESH_TOKEN_LIFETIME_DAYS: i64 = 90;

const JWT_SECRET_KEY: &str = "jwt_secret";

/// Generate JWT access token with 24 hours lifetime
pub fn generate_access_token(
    secret: &str,
    user_id: &str,
    username: &str,
    is_admin: bool,
) -> Result<String> {
    let now = Utc::now();
    let exp = (now + chrono::Duration::hours(ACCESS_TOKEN_LIFETIME_HOURS)).timestamp() as usize;
    let iat = now.timestamp() as usize;

    let claims = TokenClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        is_admin,
        exp,
        iat,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT token")
}

/// Validate JWT token and extract claims
pub fn validate_token(secret: &str, token: &str) -> Result<TokenClaims> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;

    Ok(token_data.claims)
}

/// Generate refresh token (UUID-based)
pub fn generate_refresh_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Refresh token expiration moment
pub fn refresh_token_expiration(now: DateTime<Utc>) -> DateTime<Utc> {
    now + chrono::Duration::days(REFRESH_TOKEN_LIFETIME_DAYS)
}

/// Секрет подписи из sys_settings; создаётся при первом запуске
pub async fn load_or_create_secret(db: &DatabaseConnection) -> Result<String> {
    let row = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value FROM sys_settings WHERE key = ?",
            [JWT_SECRET_KEY.into()],
        ))
        .await?;

    if let Some(row) = row {
        let secret: String = row.try_get("", "value")?;
        return Ok(secret);
    }

    let secret = generate_jwt_secret();
    let now = Utc::now().to_rfc3339();
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_settings (key, value, description, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)",
        [
            JWT_SECRET_KEY.into(),
            secret.clone().into(),
            "Auto-generated JWT secret for authentication".into(),
            now.clone().into(),
            now.into(),
        ],
    ))
    .await
    .context("Failed to save JWT secret")?;

    tracing::info!("Generated new JWT secret");
    Ok(secret)
}

/// Generate a cryptographically secure JWT secret (256 bits)
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_database;

    #[test]
    fn test_token_roundtrip() {
        let token = generate_access_token("secret", "u-1", "admin", true).unwrap();
        let claims = validate_token("secret", &token).unwrap();
        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.username, "admin");
        assert!(claims.is_admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = generate_access_token("secret", "u-1", "admin", false).unwrap();
        assert!(validate_token("other", &token).is_err());
        assert!(validate_token("secret", "garbage").is_err());
    }

    #[tokio::test]
    async fn test_secret_is_persisted() {
        let (_dir, db) = test_database().await;
        let first = load_or_create_secret(&db).await.unwrap();
        let second = load_or_create_secret(&db).await.unwrap();
        assert_eq!(first, second);
        assert!(first.len() >= 40);
    }
}
