use thiserror::Error;

/// Errors returned synchronously by chat operations, before any streaming.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),
}

/// Fatal errors raised while the process starts up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("{0} environment variable not set")]
    MissingCredential(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
