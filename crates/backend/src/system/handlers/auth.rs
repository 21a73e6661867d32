use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use chrono::Utc;
use contracts::system::auth::{
    LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, RefreshResponse, UserInfo,
};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};

use crate::shared::error::ApiError;
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;
use crate::system::{auth::jwt, users::service as user_service};

/// Login handler
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = user_service::verify_credentials(&state.db, &request.username, &request.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("invalid username or password".to_string()))?;

    let access_token =
        jwt::generate_access_token(&state.jwt_secret, &user.id, &user.username, user.is_admin)?;
    let refresh_token = jwt::generate_refresh_token();
    store_refresh_token(&state.db, &user.id, &refresh_token).await?;

    tracing::info!("User {} logged in", user.username);

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        user: user.to_info(),
    }))
}

/// Refresh token handler
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let user_id = validate_refresh_token(&state.db, &request.refresh_token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("invalid or expired refresh token".to_string()))?;

    let user = user_service::get_by_id(&state.db, &user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::Unauthorized("user is not active".to_string()))?;

    let access_token =
        jwt::generate_access_token(&state.jwt_secret, &user.id, &user.username, user.is_admin)?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Logout handler
pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<LogoutRequest>,
) -> Result<StatusCode, ApiError> {
    revoke_refresh_token(&state.db, &request.refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get current user handler (protected by middleware)
pub async fn current_user(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<UserInfo>, ApiError> {
    let user = user_service::get_by_id(&state.db, &claims.sub)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(user.to_info()))
}

// Helper functions for refresh tokens

async fn store_refresh_token(
    db: &DatabaseConnection,
    user_id: &str,
    token: &str,
) -> anyhow::Result<()> {
    let now = Utc::now();
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_refresh_tokens (id, user_id, token_hash, expires_at, created_at)
         VALUES (?, ?, ?, ?, ?)",
        [
            uuid::Uuid::new_v4().to_string().into(),
            user_id.to_string().into(),
            hash_token(token).into(),
            jwt::refresh_token_expiration(now).to_rfc3339().into(),
            now.to_rfc3339().into(),
        ],
    ))
    .await?;

    Ok(())
}

/// Владелец действующего refresh-токена
async fn validate_refresh_token(
    db: &DatabaseConnection,
    token: &str,
) -> anyhow::Result<Option<String>> {
    let now = Utc::now().to_rfc3339();
    let row = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT user_id FROM sys_refresh_tokens
             WHERE token_hash = ? AND expires_at > ? AND revoked_at IS NULL",
            [hash_token(token).into(), now.into()],
        ))
        .await?;

    match row {
        Some(row) => Ok(Some(row.try_get("", "user_id")?)),
        None => Ok(None),
    }
}

async fn revoke_refresh_token(db: &DatabaseConnection, token: &str) -> anyhow::Result<()> {
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_refresh_tokens SET revoked_at = ? WHERE token_hash = ? AND revoked_at IS NULL",
        [Utc::now().to_rfc3339().into(), hash_token(token).into()],
    ))
    .await?;

    Ok(())
}

/// В базе хранится только sha256 от токена
fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::users::CreateUserDto;

    async fn state_with_user() -> (tempfile::TempDir, AppState) {
        let (dir, state) = AppState::for_tests().await;
        user_service::create(
            &state.db,
            CreateUserDto {
                username: "ops".into(),
                password: "secret1".into(),
                full_name: None,
                is_admin: false,
            },
        )
        .await
        .unwrap();
        (dir, state)
    }

    fn login_request(password: &str) -> Json<LoginRequest> {
        Json(LoginRequest {
            username: "ops".into(),
            password: password.into(),
        })
    }

    #[tokio::test]
    async fn test_login_refresh_logout() {
        let (_dir, state) = state_with_user().await;

        let Json(session) = login(State(state.clone()), login_request("secret1"))
            .await
            .unwrap();
        assert_eq!(session.user.username, "ops");
        let claims = jwt::validate_token(&state.jwt_secret, &session.access_token).unwrap();
        assert_eq!(claims.sub, session.user.id);

        let refresh_req = || {
            Json(RefreshRequest {
                refresh_token: session.refresh_token.clone(),
            })
        };
        assert!(refresh(State(state.clone()), refresh_req()).await.is_ok());

        logout(
            State(state.clone()),
            Json(LogoutRequest {
                refresh_token: session.refresh_token.clone(),
            }),
        )
        .await
        .unwrap();

        let err = refresh(State(state.clone()), refresh_req()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let (_dir, state) = state_with_user().await;
        let err = login(State(state), login_request("bad")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_hash_token_is_hex_sha256() {
        let h = hash_token("abc");
        assert_eq!(h.len(), 64);
        assert_eq!(
            h,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
