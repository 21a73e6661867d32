use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use contracts::shared::live::CHANGE_EVENT_NAME;
use serde::Deserialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::shared::error::ApiError;
use crate::shared::state::AppState;
use crate::system::auth::jwt;

#[derive(Debug, Deserialize)]
pub struct LiveQuery {
    /// Access-токен: EventSource не умеет передавать заголовки
    pub token: String,
}

/// GET /api/live?token=...
///
/// Поток SSE-событий `change` с изменениями коллекций.
pub async fn stream(
    State(state): State<AppState>,
    Query(query): Query<LiveQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let claims = jwt::validate_token(&state.jwt_secret, query.token.trim())
        .map_err(|_| ApiError::Unauthorized("invalid or expired token".to_string()))?;
    tracing::info!(
        "Live: {} subscribed ({} active)",
        claims.username,
        state.live.subscriber_count() + 1
    );

    let events = BroadcastStream::new(state.live.subscribe()).filter_map(|message| match message {
        Ok(change) => match Event::default().event(CHANGE_EVENT_NAME).json_data(&change) {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                tracing::warn!("Live: cannot serialize event: {}", e);
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!("Live: subscriber lagged, {} event(s) skipped", skipped);
            None
        }
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}
