//! Conversation turn and chat event types for LinCode.
//!
//! A session's history is an ordered list of [`Turn`]s. While a reply is
//! being generated the relay emits [`ChatEvent`]s, which the HTTP layer
//! frames as named Server-Sent Events.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

/// Originator of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message in a conversation.
///
/// Turns are never edited after they are appended to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// An event on the outbound chat stream.
///
/// Every stream ends with exactly one terminal event ([`ChatEvent::Done`]
/// or [`ChatEvent::Error`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// One incremental fragment of model output.
    Token(String),
    /// The reply completed and was recorded in the session.
    Done,
    /// The reply failed; the user turn was rolled back.
    Error(String),
}

impl ChatEvent {
    /// SSE event name.
    pub fn name(&self) -> &'static str {
        match self {
            ChatEvent::Token(_) => "token",
            ChatEvent::Done => "done",
            ChatEvent::Error(_) => "error",
        }
    }

    /// JSON payload carried in the SSE `data:` field.
    pub fn data(&self) -> serde_json::Value {
        match self {
            ChatEvent::Token(token) => json!({ "token": token }),
            ChatEvent::Done => json!({ "ok": true }),
            ChatEvent::Error(error) => json!({ "error": error }),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ChatEvent::Token(_))
    }
}
