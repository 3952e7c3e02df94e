//! LlmProvider trait definition.
//!
//! The relay only ever streams, so the trait is a single object-safe
//! `stream` method plus a name for logging. Providers are shared as
//! `Arc<dyn LlmProvider>`.

use std::pin::Pin;

use futures_util::Stream;

use lincode_types::llm::{CompletionRequest, LlmError, StreamEvent};

/// Boxed stream of provider events.
pub type ProviderStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

/// Trait for LLM provider backends.
///
/// Implementations live in lincode-infra (e.g., `AnthropicProvider`).
/// Failures, including a connection that closes before the provider's
/// end-of-message marker, must surface as an `Err` item on the stream.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Send a streaming completion request. Returns a stream of events.
    fn stream(&self, request: CompletionRequest) -> ProviderStream;
}
