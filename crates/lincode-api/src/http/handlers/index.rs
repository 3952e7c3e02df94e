//! GET / -- the single-page chat UI.

use axum::extract::State;
use axum::response::Html;

use crate::state::AppState;

/// Served when the configured index file cannot be read.
const FALLBACK_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>LinCode</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<main id="app">
  <h1>LinCode</h1>
  <p>The UI template was not found. The chat API is available at <code>POST /api/chat</code>.</p>
</main>
</body>
</html>
"#;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    match tokio::fs::read_to_string(&state.config.index_path).await {
        Ok(page) => Html(page),
        Err(e) => {
            tracing::warn!(path = %state.config.index_path, "Cannot read index page: {e}");
            Html(FALLBACK_PAGE.to_string())
        }
    }
}
