//! GET /api/health

use axum::Json;
use serde_json::{Value, json};

/// Liveness probe used by the UI and by process supervisors.
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}
