//! Axum router configuration with middleware.
//!
//! Routes:
//! - `GET /` -- chat UI
//! - `GET /api/health`
//! - `POST /api/chat` -- SSE reply stream
//! - `DELETE /api/session`
//! - `GET /static/*` -- files under the configured static directory
//!
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(handlers::index::index))
        .route("/api/health", get(handlers::health::health))
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/session", delete(handlers::session::clear_session))
        .nest_service("/static", static_files)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use lincode_core::llm::{LlmProvider, ProviderStream};
    use lincode_types::chat::Turn;
    use lincode_types::config::ServerConfig;
    use lincode_types::llm::{CompletionRequest, LlmError, StreamEvent};

    /// Replies with fixed chunks, optionally failing after them.
    struct FixedProvider {
        chunks: Vec<&'static str>,
        fail_with: Option<&'static str>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl FixedProvider {
        fn replying(chunks: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                chunks,
                fail_with: None,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing(chunks: Vec<&'static str>, message: &'static str) -> Arc<Self> {
            Arc::new(Self {
                chunks,
                fail_with: Some(message),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl LlmProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        fn stream(&self, request: CompletionRequest) -> ProviderStream {
            self.requests.lock().unwrap().push(request);

            let mut events: Vec<Result<StreamEvent, LlmError>> = vec![Ok(StreamEvent::Connected)];
            events.extend(self.chunks.iter().map(|chunk| {
                Ok(StreamEvent::TextDelta {
                    text: chunk.to_string(),
                })
            }));
            match self.fail_with {
                Some(message) => events.push(Err(LlmError::Provider {
                    message: message.to_string(),
                })),
                None => events.push(Ok(StreamEvent::Done)),
            }
            Box::pin(futures_util::stream::iter(events))
        }
    }

    fn app_with(provider: Arc<FixedProvider>, config: ServerConfig) -> (Router, AppState) {
        let state = AppState::new(provider, config);
        (build_router(state.clone()), state)
    }

    fn app(provider: Arc<FixedProvider>) -> (Router, AppState) {
        app_with(provider, ServerConfig::default())
    }

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn clear_request(body: Option<&str>) -> Request<Body> {
        let builder = Request::builder().method("DELETE").uri("/api/session");
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (router, _) = app(FixedProvider::replying(vec![]));
        let response = router
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn chat_streams_tokens_then_done() {
        let (router, state) = app(FixedProvider::replying(vec!["```bash\n", "free -h\n```"]));
        let response = router
            .oneshot(chat_request(r#"{"message":"memory usage?","session_id":"s1"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/event-stream"));

        let body = body_text(response).await;
        let first = body.find(r#"data: {"token":"```bash\n"}"#).unwrap();
        let second = body.find(r#"data: {"token":"free -h\n```"}"#).unwrap();
        let done = body.find("event: done").unwrap();
        assert!(first < second && second < done);
        assert!(body.contains(r#"data: {"ok":true}"#));
        assert!(!body.contains("event: error"));

        let turns = state.relay.store().snapshot("s1").await.unwrap();
        assert_eq!(
            turns,
            vec![
                Turn::user("memory usage?"),
                Turn::assistant("```bash\nfree -h\n```"),
            ]
        );
    }

    #[tokio::test]
    async fn chat_failure_emits_error_event_and_rolls_back() {
        let (router, state) = app(FixedProvider::failing(vec!["partial"], "upstream exploded"));
        let response = router
            .oneshot(chat_request(r#"{"message":"ls","session_id":"s1"}"#))
            .await
            .unwrap();

        let body = body_text(response).await;
        assert!(body.contains(r#"data: {"token":"partial"}"#));
        assert!(body.contains("event: error"));
        assert!(body.contains(r#"data: {"error":"provider error: upstream exploded"}"#));
        assert!(!body.contains("event: done"));

        assert_eq!(state.relay.store().snapshot("s1").await, Some(Vec::new()));
    }

    #[tokio::test]
    async fn chat_rejects_blank_message() {
        let provider = FixedProvider::replying(vec!["unused"]);
        let (router, state) = app(provider.clone());
        let response = router
            .oneshot(chat_request(r#"{"message":"   ","session_id":"s1"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "message required" }));
        assert!(provider.requests().is_empty());
        assert!(state.relay.store().is_empty());
    }

    #[tokio::test]
    async fn chat_rejects_missing_session_id() {
        let (router, _) = app(FixedProvider::replying(vec![]));
        let response = router
            .oneshot(chat_request(r#"{"message":"uname -a"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "session_id required" }));
    }

    #[tokio::test]
    async fn chat_rejects_malformed_json() {
        let (router, _) = app(FixedProvider::replying(vec![]));
        let response = router.oneshot(chat_request("{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().is_some_and(|msg| !msg.is_empty()));
    }

    #[tokio::test]
    async fn clear_session_always_succeeds() {
        let (router, state) = app(FixedProvider::replying(vec!["ok"]));

        for request in [
            clear_request(None),
            clear_request(Some("{}")),
            clear_request(Some(r#"{"session_id":"never-seen"}"#)),
            clear_request(Some("garbage")),
        ] {
            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_json(response).await, json!({ "ok": true }));
        }
        assert!(state.relay.store().is_empty());
    }

    #[tokio::test]
    async fn clear_then_send_starts_from_empty_history() {
        let provider = FixedProvider::replying(vec!["reply"]);
        let (router, state) = app(provider.clone());

        for message in ["first", "second"] {
            let body = format!(r#"{{"message":"{message}","session_id":"s1"}}"#);
            let response = router.clone().oneshot(chat_request(&body)).await.unwrap();
            body_text(response).await;
        }
        assert_eq!(state.relay.store().snapshot("s1").await.unwrap().len(), 4);

        let response = router
            .clone()
            .oneshot(clear_request(Some(r#"{"session_id":"s1"}"#)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.relay.store().snapshot("s1").await.is_none());

        let response = router
            .oneshot(chat_request(r#"{"message":"third","session_id":"s1"}"#))
            .await
            .unwrap();
        body_text(response).await;

        let requests = provider.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].messages.len(), 3);
        assert_eq!(requests[2].messages, vec![Turn::user("third")]);
    }

    #[tokio::test]
    async fn index_serves_template_or_fallback() {
        let tmp = tempfile::TempDir::new().unwrap();
        let index_path = tmp.path().join("index.html");
        std::fs::write(&index_path, "<h1>custom ui</h1>").unwrap();

        let config = ServerConfig {
            index_path: index_path.display().to_string(),
            ..ServerConfig::default()
        };
        let (router, _) = app_with(FixedProvider::replying(vec![]), config);
        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "<h1>custom ui</h1>");

        let config = ServerConfig {
            index_path: tmp.path().join("missing.html").display().to_string(),
            ..ServerConfig::default()
        };
        let (router, _) = app_with(FixedProvider::replying(vec![]), config);
        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("<title>LinCode</title>"));
    }

    #[tokio::test]
    async fn static_files_are_served() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("app.js"), "console.log('hi');").unwrap();

        let config = ServerConfig {
            static_dir: tmp.path().display().to_string(),
            ..ServerConfig::default()
        };
        let (router, _) = app_with(FixedProvider::replying(vec![]), config);

        let response = router
            .clone()
            .oneshot(Request::get("/static/app.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "console.log('hi');");

        let response = router
            .oneshot(Request::get("/static/nope.css").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
