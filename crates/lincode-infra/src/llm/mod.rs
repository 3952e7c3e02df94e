//! LLM provider implementations.
//!
//! Contains concrete implementations of the [`LlmProvider`] trait
//! defined in `lincode-core`, plus a factory ([`create_provider`]) that
//! builds the configured provider.

pub mod anthropic;

use std::sync::Arc;

use secrecy::SecretString;

use lincode_core::llm::LlmProvider;
use lincode_types::config::ServerConfig;
use lincode_types::llm::LlmError;

use self::anthropic::AnthropicProvider;

/// Create the provider described by `config`, authenticated with `api_key`.
pub fn create_provider(
    config: &ServerConfig,
    api_key: SecretString,
) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let provider = AnthropicProvider::new(api_key)?.with_base_url(config.api_base_url.as_str());
    tracing::debug!(base_url = provider.base_url(), "Anthropic provider ready");
    Ok(Arc::new(provider))
}
