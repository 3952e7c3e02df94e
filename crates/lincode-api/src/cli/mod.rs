//! Command-line arguments for the `lincode` binary.

pub mod banner;

use std::path::PathBuf;

use clap::Parser;

use lincode_infra::config::ConfigOverrides;

/// Ubuntu command-line assistant served as a local web app.
#[derive(Debug, Parser)]
#[command(name = "lincode", version, about, long_about = None)]
pub struct Cli {
    /// Host to bind to.
    #[arg(long, env = "LINCODE_HOST")]
    pub host: Option<String>,

    /// Port to listen on.
    #[arg(short, long, env = "LINCODE_PORT")]
    pub port: Option<u16>,

    /// Model identifier sent to the Anthropic API.
    #[arg(short, long, env = "LINCODE_MODEL")]
    pub model: Option<String>,

    /// Path to a TOML config file (default: ./lincode.toml).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long)]
    pub otel: bool,
}

impl Cli {
    /// Values that take precedence over the config file.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            model: self.model.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags_into_overrides() {
        let cli = Cli::try_parse_from([
            "lincode",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--config",
            "/etc/lincode.toml",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert!(!cli.otel);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/lincode.toml")));

        let overrides = cli.overrides();
        assert_eq!(overrides.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(overrides.port, Some(8080));
    }

    #[test]
    fn rejects_invalid_port() {
        assert!(Cli::try_parse_from(["lincode", "--port", "http"]).is_err());
    }
}
