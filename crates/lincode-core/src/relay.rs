//! Chat relay: forwards one user message to the model and streams the reply.
//!
//! `send_message` validates its input synchronously, then spawns a task that
//! owns the session lock for the rest of the request:
//!
//! 1. append the user turn
//! 2. stream the model reply, emitting a `Token` event per text fragment
//! 3. on success append the assistant turn and emit `Done`
//! 4. on failure remove the user turn and emit `Error`; on client
//!    disconnect remove it silently
//!
//! Events travel over a bounded channel; dropping the receiver is how the
//! HTTP layer signals a closed connection.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::{FutureExt, StreamExt};
use tokio::sync::{OwnedMutexGuard, mpsc};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{Instrument, debug, field, info, info_span, warn};

use lincode_types::chat::{ChatEvent, Turn};
use lincode_types::config::ServerConfig;
use lincode_types::error::ChatError;
use lincode_types::llm::{CompletionRequest, LlmError, StreamEvent};

use crate::llm::LlmProvider;
use crate::prompt::SYSTEM_PROMPT;
use crate::session::{Session, SessionStore};

/// Capacity of the per-request event channel.
const EVENT_BUFFER: usize = 64;

/// Stream of events for one chat request.
pub type ChatStream = ReceiverStream<ChatEvent>;

/// Model parameters applied to every request.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub model: String,
    pub max_tokens: u32,
    pub system_prompt: String,
}

impl From<&ServerConfig> for RelayConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Lifecycle of a single relay request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RelayState {
    AwaitingFirstChunk,
    Streaming,
    Completed,
    Failed,
}

impl RelayState {
    fn transition(&mut self, next: RelayState) {
        if *self != next {
            debug!(from = ?*self, to = ?next, "relay state transition");
            *self = next;
        }
    }
}

/// Relays chat messages between callers and an LLM provider.
///
/// Owns the session store; nothing else mutates it.
pub struct ChatRelay {
    store: SessionStore,
    provider: Arc<dyn LlmProvider>,
    config: RelayConfig,
}

impl ChatRelay {
    pub fn new(provider: Arc<dyn LlmProvider>, config: RelayConfig) -> Self {
        Self {
            store: SessionStore::new(),
            provider,
            config,
        }
    }

    /// Read access to the session store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Send one user message and stream the model's reply.
    ///
    /// Fails synchronously with [`ChatError::Validation`] when the trimmed
    /// message or the session id is empty; nothing is mutated in that case.
    /// Otherwise the returned stream yields zero or more `Token` events and
    /// then exactly one `Done` or `Error`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn send_message(&self, session_id: &str, message: &str) -> Result<ChatStream, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::Validation("message required".to_string()));
        }
        if session_id.is_empty() {
            return Err(ChatError::Validation("session_id required".to_string()));
        }

        let handle = self.store.get_or_create(session_id);
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);

        let span = info_span!(
            "gen_ai.chat",
            session_id = %session_id,
            gen_ai.provider.name = self.provider.name(),
            gen_ai.request.model = %self.config.model,
            gen_ai.request.max_tokens = self.config.max_tokens,
            gen_ai.usage.input_tokens = field::Empty,
            gen_ai.usage.output_tokens = field::Empty,
            gen_ai.response.finish_reasons = field::Empty,
        );

        let provider = Arc::clone(&self.provider);
        let config = self.config.clone();
        let message = message.to_string();

        tokio::spawn(
            async move {
                let session = handle.lock_owned().await;
                relay(session, provider.as_ref(), &config, message, tx).await;
            }
            .instrument(span),
        );

        Ok(ReceiverStream::new(rx))
    }

    /// Forget a session's history. Unknown ids are accepted.
    pub fn clear_session(&self, session_id: &str) {
        if self.store.clear(session_id) {
            info!(session_id = %session_id, "Session cleared");
        } else {
            debug!(session_id = %session_id, "Clear requested for unknown session");
        }
    }
}

/// Drive one request to its terminal event while holding the session lock.
async fn relay(
    mut session: OwnedMutexGuard<Session>,
    provider: &dyn LlmProvider,
    config: &RelayConfig,
    message: String,
    tx: mpsc::Sender<ChatEvent>,
) {
    // The caller may have gone away while we queued behind another request.
    if tx.is_closed() {
        debug!("Client disconnected before relay started");
        return;
    }

    session.push(Turn::user(message));

    let request = CompletionRequest {
        model: config.model.clone(),
        messages: session.turns().to_vec(),
        system: Some(config.system_prompt.clone()),
        max_tokens: config.max_tokens,
        stream: true,
    };

    let mut state = RelayState::AwaitingFirstChunk;
    let mut reply = String::new();

    // A panicking provider must still end in rollback and an `error` event.
    let outcome = AssertUnwindSafe(stream_reply(provider, request, &tx, &mut state, &mut reply))
        .catch_unwind()
        .await
        .unwrap_or_else(|_| {
            Err(LlmError::Provider {
                message: "model stream panicked".to_string(),
            })
        });

    match outcome {
        Ok(()) => {
            state.transition(RelayState::Completed);
            let reply_bytes = reply.len();
            session.push(Turn::assistant(reply));
            info!(turns = session.len(), reply_bytes, "Reply recorded");
            finish(&tx, ChatEvent::Done).await;
        }
        Err(e) => {
            state.transition(RelayState::Failed);
            if session.pop_trailing_user().is_some() {
                debug!(turns = session.len(), "Rolled back unanswered user turn");
            }
            if matches!(e, LlmError::Cancelled(_)) {
                info!("Client disconnected mid-stream; reply discarded");
            } else {
                warn!(error = %e, "Model call failed");
                finish(&tx, ChatEvent::Error(e.to_string())).await;
            }
        }
    }
}

/// Forward upstream text to `tx` until the provider finishes, fails, or
/// the client goes away. The provider stream is dropped before returning.
async fn stream_reply(
    provider: &dyn LlmProvider,
    request: CompletionRequest,
    tx: &mpsc::Sender<ChatEvent>,
    state: &mut RelayState,
    reply: &mut String,
) -> Result<(), LlmError> {
    let mut upstream = provider.stream(request);

    loop {
        let next = tokio::select! {
            biased;
            _ = tx.closed() => return Err(LlmError::Cancelled("client disconnected".to_string())),
            next = upstream.next() => next,
        };

        match next {
            Some(Ok(StreamEvent::TextDelta { text })) => {
                if text.is_empty() {
                    continue;
                }
                state.transition(RelayState::Streaming);
                reply.push_str(&text);
                if tx.send(ChatEvent::Token(text)).await.is_err() {
                    return Err(LlmError::Cancelled("client disconnected".to_string()));
                }
            }
            Some(Ok(StreamEvent::Usage(usage))) => {
                let span = tracing::Span::current();
                span.record("gen_ai.usage.input_tokens", usage.input_tokens);
                span.record("gen_ai.usage.output_tokens", usage.output_tokens);
            }
            Some(Ok(StreamEvent::MessageDelta { stop_reason })) => {
                tracing::Span::current()
                    .record("gen_ai.response.finish_reasons", field::display(&stop_reason));
            }
            Some(Ok(StreamEvent::Connected)) => {}
            Some(Ok(StreamEvent::Done)) | None => return Ok(()),
            Some(Err(e)) => return Err(e),
        }
    }
}

/// Send the single event that ends a stream.
async fn finish(tx: &mpsc::Sender<ChatEvent>, event: ChatEvent) {
    debug_assert!(event.is_terminal());
    debug!(event = event.name(), "Sending terminal event");
    let _ = tx.send(event).await;
}
