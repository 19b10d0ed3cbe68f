//! Error types for the client.

use std::path::PathBuf;

use taric_core::EncodingError;
use thiserror::Error;

/// Errors loading or validating a [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid device_id: {0}")]
    DeviceId(EncodingError),
}

/// Errors constructing a [`Client`](crate::Client).
///
/// Entry building and ack verification return the protocol errors
/// ([`EntryError`](taric_core::EntryError), [`AckError`](taric_core::AckError)) directly.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for client construction.
pub type Result<T> = std::result::Result<T, ClientError>;
