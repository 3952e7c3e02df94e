//! Infrastructure implementations for LinCode.
//!
//! - `llm`: the Anthropic Messages API provider
//! - `config`: `lincode.toml` loading and command-line overrides
//! - `credentials`: API key lookup from the environment

pub mod config;
pub mod credentials;
pub mod llm;
