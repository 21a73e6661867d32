use axum::body::Body;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use contracts::shared::format::format_number;

/// Middleware для логирования HTTP запросов
///
/// Выводит в консоль время (MSK), длительность, размер ответа, статус,
/// метод и путь. Тело не читается: SSE и файлы идут потоком, размер
/// берётся из `Content-Length`, если он известен.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let duration = start.elapsed();
    let timestamp = Utc::now() + chrono::Duration::hours(3);
    let status = response.status();
    let size = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .map(format_number)
        .unwrap_or_else(|| "stream".to_string());

    // Голубой для успешных, коричневый для остальных
    let color_code = if status.is_success() { "36" } else { "33" };

    println!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
        color_code,
        timestamp.format("%H:%M:%S"),
        duration.as_millis(),
        size,
        status.as_u16(),
        method,
        path
    );

    if status.is_server_error() {
        tracing::error!("{} {} -> {}", method, path, status);
    }

    response
}
