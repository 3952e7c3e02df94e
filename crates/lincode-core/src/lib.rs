//! Conversation state and model relay for LinCode.
//!
//! This crate owns the in-memory session store and the chat relay that
//! streams model output back to callers. It defines the `LlmProvider` port
//! that `lincode-infra` implements and never depends on any HTTP client.

pub mod llm;
pub mod prompt;
pub mod relay;
pub mod session;
