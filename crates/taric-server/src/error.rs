//! Error types for the ack issuer.

use taric_core::{DecodeError, EncodingError};
use thiserror::Error;

/// Why an entry was not acknowledged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueError {
    #[error("malformed entry: {0}")]
    Malformed(#[from] DecodeError),

    #[error("unknown device {device_id} key {key_id}")]
    DeviceUnknown { device_id: String, key_id: String },

    #[error("revoked key {key_id} for device {device_id}")]
    Revoked { device_id: String, key_id: String },

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgo(String),

    #[error("trusted key for device {device_id} is unusable: {reason}")]
    InvalidKey { device_id: String, reason: String },

    #[error("invalid device signature")]
    InvalidSignature,

    /// The configured signer produced an ack that cannot be encoded.
    #[error("ack signer misconfigured: {0}")]
    Signer(EncodingError),
}

impl IssueError {
    /// Stable identifier for logging and status mapping.
    pub fn code(&self) -> &'static str {
        match self {
            IssueError::Malformed(_) => "malformed_entry",
            IssueError::DeviceUnknown { .. } => "device_unknown",
            IssueError::Revoked { .. } => "revoked",
            IssueError::UnsupportedAlgo(_) => "unsupported_algo",
            IssueError::InvalidKey { .. } => "invalid_key",
            IssueError::InvalidSignature => "invalid_signature",
            IssueError::Signer(_) => "signer_error",
        }
    }
}
