//! AnthropicProvider -- concrete [`LlmProvider`] implementation for Anthropic Claude.
//!
//! Sends streaming requests to the Anthropic Messages API (`/v1/messages`)
//! with the required authentication headers.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::SecretString;

use lincode_core::llm::{LlmProvider, ProviderStream};
use lincode_types::llm::{CompletionRequest, LlmError};

use super::streaming::create_anthropic_stream;
use super::types::{AnthropicMessage, AnthropicRequest};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Anthropic Claude LLM provider.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing HTTP request headers. It never appears in Debug output,
/// Display output, or tracing logs.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider pointed at the public API.
    pub fn new(api_key: SecretString) -> Result<Self, LlmError> {
        // Only the connect phase is bounded; a long reply may stream for minutes.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the base URL (proxies and tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a generic [`CompletionRequest`] into an [`AnthropicRequest`].
    fn to_anthropic_request(&self, request: CompletionRequest) -> AnthropicRequest {
        let messages = request
            .messages
            .into_iter()
            .map(|turn| AnthropicMessage {
                role: turn.role.to_string(),
                content: turn.content,
            })
            .collect();

        AnthropicRequest {
            model: request.model,
            max_tokens: request.max_tokens,
            messages,
            system: request.system,
            stream: true,
        }
    }
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn stream(&self, request: CompletionRequest) -> ProviderStream {
        let body = self.to_anthropic_request(request);
        create_anthropic_stream(
            self.client.clone(),
            self.url("/v1/messages"),
            body,
            self.api_key.clone(),
        )
    }
}
