//! SSE stream creation and event decoding for the Anthropic Messages API.
//!
//! Streaming protocol:
//! 1. `message_start` -- message object with initial usage
//! 2. per block: `content_block_start` -> N x `content_block_delta` -> `content_block_stop`
//! 3. `message_delta` -- stop_reason and cumulative usage
//! 4. `message_stop` -- final event
//! 5. `ping` events may appear anywhere (keepalive)
//! 6. `error` events may appear mid-stream
//!
//! A body that ends before `message_stop` is reported as a stream error so
//! the relay never mistakes a truncated reply for a complete one.

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};

use lincode_core::llm::ProviderStream;
use lincode_types::llm::{LlmError, StopReason, StreamEvent, Usage};

use super::types::{
    AnthropicDelta, AnthropicRequest, ContentBlockDeltaPayload, ErrorPayload, MessageDeltaPayload,
    MessageStartPayload,
};

/// The Anthropic API version header value.
pub const API_VERSION: &str = "2023-06-01";

/// Create a streaming SSE connection to the Anthropic Messages API.
///
/// Returns a stream of provider-agnostic [`StreamEvent`]s. HTTP failures
/// surface as the first (and only) item of the stream.
pub fn create_anthropic_stream(
    client: reqwest::Client,
    url: String,
    body: AnthropicRequest,
    api_key: SecretString,
) -> ProviderStream {
    Box::pin(async_stream::try_stream! {
        let response = send_request(&client, &url, &body, &api_key).await?;

        let mut decoder = SseDecoder::default();
        let mut events = response.bytes_stream().eventsource();

        while let Some(event) = events.next().await {
            let event = event.map_err(|e| LlmError::Stream(e.to_string()))?;
            for stream_event in decoder.decode(&event.event, &event.data)? {
                yield stream_event;
            }
            if decoder.is_finished() {
                break;
            }
        }

        decoder.finish()?;
    })
}

/// POST the request and turn a non-2xx status into an error.
async fn send_request(
    client: &reqwest::Client,
    url: &str,
    body: &AnthropicRequest,
    api_key: &SecretString,
) -> Result<reqwest::Response, LlmError> {
    let response = client
        .post(url)
        .header("x-api-key", api_key.expose_secret())
        .header("anthropic-version", API_VERSION)
        .header("content-type", "application/json")
        .header("accept", "text/event-stream")
        .json(body)
        .send()
        .await
        .map_err(|e| LlmError::Provider {
            message: format!("HTTP request failed: {e}"),
        })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after_ms = retry_after_ms(response.headers());
    let error_body = response.text().await.unwrap_or_default();
    Err(map_http_error(status, error_body, retry_after_ms))
}

/// Map a non-2xx response to an [`LlmError`].
pub fn map_http_error(status: StatusCode, body: String, retry_after_ms: Option<u64>) -> LlmError {
    match status.as_u16() {
        401 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited { retry_after_ms },
        529 => LlmError::Overloaded(error_message(&body)),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {}", error_message(&body)),
        },
    }
}

/// Prefer the API's own error message over the raw JSON body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorPayload>(body)
        .map(|payload| payload.error.message)
        .unwrap_or_else(|_| body.to_string())
}

/// `retry-after` is given in whole seconds.
fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

/// Stateful translator from Anthropic SSE events to [`StreamEvent`]s.
#[derive(Debug, Default)]
pub struct SseDecoder {
    input_tokens: u32,
    finished: bool,
}

impl SseDecoder {
    /// Whether `message_stop` has been seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Error unless `message_stop` has been seen.
    pub fn finish(&self) -> Result<(), LlmError> {
        if self.finished {
            Ok(())
        } else {
            Err(LlmError::Stream("stream ended before message_stop".to_string()))
        }
    }

    /// Decode one SSE event. Unknown event names produce no output.
    pub fn decode(&mut self, event: &str, data: &str) -> Result<Vec<StreamEvent>, LlmError> {
        trace!(event, "anthropic sse event");
        match event {
            "message_start" => {
                let payload: MessageStartPayload = parse(event, data)?;
                debug!(id = %payload.message.id, model = %payload.message.model, "Message started");
                self.input_tokens = payload.message.usage.map(|u| u.input_tokens).unwrap_or(0);
                Ok(vec![StreamEvent::Connected])
            }
            "content_block_delta" => {
                let payload: ContentBlockDeltaPayload = parse(event, data)?;
                match payload.delta {
                    AnthropicDelta::TextDelta { text } => Ok(vec![StreamEvent::TextDelta { text }]),
                    AnthropicDelta::Other => Ok(Vec::new()),
                }
            }
            "message_delta" => {
                let payload: MessageDeltaPayload = parse(event, data)?;
                let mut out = Vec::with_capacity(2);
                if let Some(reason) = payload.delta.stop_reason {
                    // Unknown stop reasons are not worth failing a reply over.
                    if let Ok(stop_reason) = reason.parse::<StopReason>() {
                        out.push(StreamEvent::MessageDelta { stop_reason });
                    }
                }
                if let Some(usage) = payload.usage {
                    out.push(StreamEvent::Usage(Usage {
                        input_tokens: self.input_tokens.max(usage.input_tokens),
                        output_tokens: usage.output_tokens,
                    }));
                }
                Ok(out)
            }
            "message_stop" => {
                self.finished = true;
                Ok(vec![StreamEvent::Done])
            }
            "error" => {
                let payload: ErrorPayload = parse(event, data)?;
                Err(match payload.error.error_type.as_str() {
                    "overloaded_error" => LlmError::Overloaded(payload.error.message),
                    "rate_limit_error" => LlmError::RateLimited {
                        retry_after_ms: None,
                    },
                    _ => LlmError::Provider {
                        message: payload.error.message,
                    },
                })
            }
            // ping, content_block_start, content_block_stop, and future additions
            _ => Ok(Vec::new()),
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(event: &str, data: &str) -> Result<T, LlmError> {
    serde_json::from_str(data)
        .map_err(|e| LlmError::Deserialization(format!("invalid {event} payload: {e}")))
}
