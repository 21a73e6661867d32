//! API utilities for frontend-backend communication
//!
//! Все бизнес-роуты требуют `Authorization: Bearer <token>`; токен берётся
//! из localStorage. Ошибки сервера приходят телом `ApiErrorBody`.

use contracts::shared::api_error::ApiErrorBody;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::system::auth::storage;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path (should start with "/api/")
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Ошибка на стороне клиента в том же виде, что и серверная
fn client_error(message: String) -> ApiErrorBody {
    ApiErrorBody {
        error: message,
        code: None,
    }
}

fn with_auth(builder: RequestBuilder) -> RequestBuilder {
    match storage::get_access_token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

/// Разбирает неуспешный ответ в `ApiErrorBody`
async fn error_from(response: Response) -> ApiErrorBody {
    let status = response.status();
    match response.json::<ApiErrorBody>().await {
        Ok(body) => body,
        Err(_) => client_error(format!("HTTP {}", status)),
    }
}

async fn send(request: Result<Request, gloo_net::Error>) -> Result<Response, ApiErrorBody> {
    let request = request.map_err(|e| client_error(format!("Failed to build request: {}", e)))?;
    let response = request
        .send()
        .await
        .map_err(|e| client_error(format!("Failed to send request: {}", e)))?;
    if !response.ok() {
        return Err(error_from(response).await);
    }
    Ok(response)
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ApiErrorBody> {
    response
        .json::<T>()
        .await
        .map_err(|e| client_error(format!("Failed to parse response: {}", e)))
}

/// GET с авторизацией
pub async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, ApiErrorBody> {
    let response = send(with_auth(Request::get(&api_url(path))).build()).await?;
    parse(response).await
}

/// POST JSON с авторизацией
pub async fn post_json<B: Serialize, T: DeserializeOwned>(
    path: &str,
    body: &B,
) -> Result<T, ApiErrorBody> {
    let response = send(with_auth(Request::post(&api_url(path))).json(body)).await?;
    parse(response).await
}

/// PUT JSON с авторизацией
pub async fn put_json<B: Serialize, T: DeserializeOwned>(
    path: &str,
    body: &B,
) -> Result<T, ApiErrorBody> {
    let response = send(with_auth(Request::put(&api_url(path))).json(body)).await?;
    parse(response).await
}

/// PATCH JSON с авторизацией
pub async fn patch_json<B: Serialize, T: DeserializeOwned>(
    path: &str,
    body: &B,
) -> Result<T, ApiErrorBody> {
    let response = send(with_auth(Request::patch(&api_url(path))).json(body)).await?;
    parse(response).await
}

/// DELETE с авторизацией, тело ответа не читается
pub async fn delete(path: &str) -> Result<(), ApiErrorBody> {
    send(with_auth(Request::delete(&api_url(path))).build()).await?;
    Ok(())
}

/// POST multipart/form-data; Content-Type с boundary ставит браузер
pub async fn post_form<T: DeserializeOwned>(
    path: &str,
    form: web_sys::FormData,
) -> Result<T, ApiErrorBody> {
    let response = send(with_auth(Request::post(&api_url(path))).body(form)).await?;
    parse(response).await
}

/// Сообщение ошибки для показа пользователю
pub fn message(error: ApiErrorBody) -> String {
    error.error
}
