//! LinCode entry point.
//!
//! Binary name: `lincode`
//!
//! Loads `.env`, parses CLI arguments, checks the API key, then serves the
//! chat web app until Ctrl+C or SIGTERM.

mod cli;
mod http;
mod state;

use std::path::PathBuf;

use clap::Parser;

use lincode_infra::config::{DEFAULT_CONFIG_FILE, load_server_config, validate};
use lincode_infra::credentials::resolve_api_key;
use lincode_infra::llm::create_provider;
use lincode_types::error::StartupError;

use cli::Cli;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal.
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    lincode_observe::init_tracing(cli.otel, lincode_observe::default_filter(cli.verbose))
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let api_key = match resolve_api_key() {
        Ok(key) => key,
        Err(e) => {
            eprintln!("ERROR: {e}");
            lincode_observe::shutdown_tracing();
            std::process::exit(1);
        }
    };

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = cli.overrides().apply(load_server_config(&config_path).await);
    validate(&config)?;

    let provider = create_provider(&config, api_key)?;
    let state = AppState::new(provider, config);

    let addr = state.config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.clone(),
            source,
        })?;

    cli::banner::print_banner(&state.config);
    tracing::info!(%addr, model = %state.config.model, "LinCode listening");

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    lincode_observe::shutdown_tracing();

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
