//! DELETE /api/session -- forget a conversation.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ClearSessionRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Clear the session named in the body.
///
/// Always answers `{"ok": true}`: a missing or unreadable body, or an
/// unknown session id, is not an error.
pub async fn clear_session(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    let request: ClearSessionRequest = serde_json::from_slice(&body).unwrap_or_default();
    if let Some(session_id) = request.session_id.filter(|id| !id.is_empty()) {
        state.relay.clear_session(&session_id);
    }
    Json(json!({ "ok": true }))
}
