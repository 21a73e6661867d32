//! Ошибки сервисов и их отображение в HTTP-ответы.
//!
//! Сервисы возвращают `anyhow::Result`; предметные отказы кладутся туда как
//! [`DomainError`] и на границе HTTP превращаются в нужный статус.
//! Всё остальное становится 500 с текстом ошибки.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::shared::api_error::{codes, ApiErrorBody};

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> anyhow::Error {
        DomainError::Validation(msg.into()).into()
    }

    pub fn not_found(what: impl Into<String>) -> anyhow::Error {
        DomainError::NotFound(what.into()).into()
    }

    pub fn conflict(msg: impl Into<String>) -> anyhow::Error {
        DomainError::Conflict(msg.into()).into()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => codes::BAD_REQUEST,
            ApiError::NotFound => codes::NOT_FOUND,
            ApiError::Conflict(_) => codes::CONFLICT,
            ApiError::Unauthorized(_) => codes::UNAUTHORIZED,
            ApiError::Internal(_) => codes::INTERNAL,
        }
    }

    pub fn body(&self) -> ApiErrorBody {
        ApiErrorBody::new(self.to_string(), self.code())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(domain) = err.downcast_ref::<DomainError>() {
            return match domain {
                DomainError::Validation(msg) => ApiError::BadRequest(msg.clone()),
                DomainError::NotFound(what) => {
                    tracing::debug!("Not found: {}", what);
                    ApiError::NotFound
                }
                DomainError::Conflict(msg) => ApiError::Conflict(msg.clone()),
            };
        }
        tracing::error!("Request failed: {:#}", err);
        ApiError::Internal(err.to_string())
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        ApiError::from(anyhow::Error::from(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_statuses() {
        let e = ApiError::from(DomainError::validation("bad week"));
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
        assert_eq!(e.body().error, "bad week");

        let e = ApiError::from(DomainError::not_found("product p-1"));
        assert_eq!(e.status(), StatusCode::NOT_FOUND);
        let body = e.body();
        assert_eq!(body.error, "not found");
        assert_eq!(body.code.as_deref(), Some("not_found"));

        let e = ApiError::from(DomainError::conflict("calculation already in progress"));
        assert_eq!(e.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_context_does_not_hide_domain_error() {
        use anyhow::Context;
        let err: anyhow::Result<()> = Err(DomainError::not_found("x"));
        let e = ApiError::from(err.context("loading x").unwrap_err());
        assert_eq!(e.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_errors_are_internal() {
        let e = ApiError::from(anyhow::anyhow!("disk on fire"));
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.body().error, "disk on fire");
    }
}
