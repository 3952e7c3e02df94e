//! SSE streaming chat endpoint.
//!
//! POST /api/chat
//!
//! SSE event types:
//! - `token` -- reply fragment: `{ "token": "..." }`
//! - `done` -- reply complete: `{ "ok": true }`
//! - `error` -- model call failed: `{ "error": "..." }`
//!
//! Exactly one of `done` or `error` ends the stream. Input problems are
//! answered with a plain 400 before any event is sent.

use std::convert::Infallible;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::StreamExt;
use serde::Deserialize;
use tokio_stream::Stream;

use lincode_types::chat::ChatEvent;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for the chat endpoint.
///
/// Missing or `null` fields count as empty and are reported by validation.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

fn to_sse_event(event: &ChatEvent) -> Event {
    Event::default()
        .event(event.name())
        .data(event.data().to_string())
}

/// POST /api/chat -- stream the model's reply to one message.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let Json(body) = payload?;
    let message = body.message.unwrap_or_default();
    let session_id = body.session_id.unwrap_or_default();

    let events = state.relay.send_message(&session_id, &message)?;
    let sse_stream = events.map(|event| Ok::<_, Infallible>(to_sse_event(&event)));

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}
