//! Shared domain types for LinCode.
//!
//! Conversation turns, outbound chat events, LLM request/stream shapes,
//! server configuration and the error enums used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
