//! Server configuration types for LinCode.
//!
//! `ServerConfig` is the optional `lincode.toml` file. Every field has a
//! default, so an empty or missing file yields a working configuration.

use std::net::Ipv6Addr;

use serde::{Deserialize, Serialize};

/// Process-wide configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Model identifier sent to the Messages API.
    #[serde(default = "default_model")]
    pub model: String,

    /// Address to bind the HTTP listener to.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on generated tokens per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Base URL of the Anthropic API (override for proxies and tests).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Directory served under `/static`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// HTML file served at `/`.
    #[serde(default = "default_index_path")]
    pub index_path: String,
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    7777
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_api_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_index_path() -> String {
    "templates/index.html".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            host: default_host(),
            port: default_port(),
            max_tokens: default_max_tokens(),
            api_base_url: default_api_base_url(),
            static_dir: default_static_dir(),
            index_path: default_index_path(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string for the listener. IPv6 literals are bracketed.
    pub fn bind_addr(&self) -> String {
        if self.host.parse::<Ipv6Addr>().is_ok() {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default_values() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 7777);
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.bind_addr(), "127.0.0.1:7777");
    }

    #[test]
    fn test_bind_addr_brackets_ipv6_hosts() {
        let mut config = ServerConfig {
            host: "::1".to_string(),
            ..ServerConfig::default()
        };
        assert_eq!(config.bind_addr(), "[::1]:7777");
        assert!(config.bind_addr().parse::<std::net::SocketAddr>().is_ok());

        config.host = "localhost".to_string();
        assert_eq!(config.bind_addr(), "localhost:7777");

        config.host = "0.0.0.0".to_string();
        assert_eq!(config.bind_addr(), "0.0.0.0:7777");
    }

    #[test]
    fn test_server_config_deserialize_empty() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_server_config_deserialize_partial() {
        let toml_str = r#"
model = "claude-haiku-4-5"
port = 8888
"#;
        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model, "claude-haiku-4-5");
        assert_eq!(config.port, 8888);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.static_dir, "static");
    }
}
