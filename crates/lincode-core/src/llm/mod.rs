//! LLM provider abstraction for LinCode.
//!
//! - `LlmProvider`: object-safe trait implemented by concrete providers
//! - `ProviderStream`: the boxed stream of events a provider returns

pub mod provider;

pub use provider::{LlmProvider, ProviderStream};
