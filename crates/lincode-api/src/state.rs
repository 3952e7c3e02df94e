//! Application state shared by all HTTP handlers.

use std::sync::Arc;

use lincode_core::llm::LlmProvider;
use lincode_core::relay::{ChatRelay, RelayConfig};
use lincode_types::config::ServerConfig;

/// Shared application state.
///
/// Cloned into every handler; both fields are read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<ChatRelay>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire the chat relay to `provider` using the model settings in `config`.
    pub fn new(provider: Arc<dyn LlmProvider>, config: ServerConfig) -> Self {
        let relay = ChatRelay::new(provider, RelayConfig::from(&config));
        Self {
            relay: Arc::new(relay),
            config: Arc::new(config),
        }
    }
}
