//! Server configuration loader for LinCode.
//!
//! Reads an optional TOML file (`lincode.toml` by default) and deserializes
//! it into [`ServerConfig`]. Falls back to defaults when the file is missing
//! or malformed. Command-line values are layered on top afterwards.

use std::path::Path;

use lincode_types::config::ServerConfig;
use lincode_types::error::StartupError;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "lincode.toml";

/// Load server configuration from `path`.
///
/// - If the file does not exist, returns [`ServerConfig::default()`].
/// - If the file exists but cannot be read or parsed, logs a warning and
///   returns the default.
pub async fn load_server_config(path: &Path) -> ServerConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return ServerConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return ServerConfig::default();
        }
    };

    match toml::from_str::<ServerConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            ServerConfig::default()
        }
    }
}

/// Values supplied on the command line or through `LINCODE_*` variables.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub model: Option<String>,
}

impl ConfigOverrides {
    /// Replace file values with any override that was given.
    pub fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        config
    }
}

/// Reject configurations the server cannot start with.
pub fn validate(config: &ServerConfig) -> Result<(), StartupError> {
    if config.model.trim().is_empty() {
        return Err(StartupError::InvalidConfig("model must not be empty".to_string()));
    }
    if config.host.trim().is_empty() {
        return Err(StartupError::InvalidConfig("host must not be empty".to_string()));
    }
    if config.max_tokens == 0 {
        return Err(StartupError::InvalidConfig(
            "max_tokens must be greater than zero".to_string(),
        ));
    }
    if !config.api_base_url.starts_with("http://") && !config.api_base_url.starts_with("https://")
    {
        return Err(StartupError::InvalidConfig(format!(
            "api_base_url must be an http(s) URL, got {:?}",
            config.api_base_url
        )));
    }
    Ok(())
}
