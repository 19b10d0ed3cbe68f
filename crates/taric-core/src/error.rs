//! Error types for the TARIC core protocol.
//!
//! Every rejection is a distinct variant. Callers in audit contexts log
//! "wrong entry" differently from "bad signature" from "garbage input", so
//! nothing here collapses into a generic failure.

use thiserror::Error;

use crate::types::EntryRef;

/// A field violated its size or presence rule while encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("field {field} must not be empty")]
    FieldEmpty { field: &'static str },

    #[error("field {field} is {len} bytes, maximum is {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("field {field} must be exactly {expected} bytes, got {got}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        got: usize,
    },
}

/// Structural failure while parsing untrusted bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("truncated input while reading {field}")]
    Truncated { field: &'static str },

    #[error("field {field} must not be empty")]
    FieldEmpty { field: &'static str },

    #[error("field {field} declares {len} bytes, maximum is {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("field {field} must be exactly {expected} bytes, got {got}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("field {field} is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    #[error("unknown domain tag: {0}")]
    UnknownDomain(String),

    #[error("{0} trailing bytes after final field")]
    TrailingBytes(usize),
}

/// Failure reported by a host capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CapabilityError(pub String);

impl CapabilityError {
    /// Create from any message.
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Errors from building a signed entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("rng error: {0}")]
    Rng(String),

    #[error("signing error: {0}")]
    Signing(String),

    #[error("output buffer too small: need {needed} bytes, have {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },
}

impl EntryError {
    /// Stable identifier for logging and status mapping.
    pub fn code(&self) -> &'static str {
        match self {
            EntryError::Encoding(_) => "encoding_error",
            EntryError::Rng(_) => "rng_error",
            EntryError::Signing(_) => "signing_error",
            EntryError::BufferTooSmall { .. } => "buffer_too_small",
        }
    }
}

/// Rejection of an ack.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AckError {
    #[error("malformed ack: {0}")]
    Malformed(#[from] DecodeError),

    #[error("ack references a different entry: expected {expected}, got {got}")]
    EntryMismatch { expected: EntryRef, got: EntryRef },

    #[error("ack signature invalid: {0}")]
    SignatureInvalid(String),

    #[error(
        "stale ack: entry at {entry_timestamp} ms, ack at {ack_timestamp} ms, tolerance {tolerance_ms} ms"
    )]
    Stale {
        entry_timestamp: u64,
        ack_timestamp: u64,
        tolerance_ms: u64,
    },
}

impl AckError {
    /// Stable identifier for logging and status mapping.
    pub fn code(&self) -> &'static str {
        match self {
            AckError::Malformed(_) => "malformed_ack",
            AckError::EntryMismatch { .. } => "entry_mismatch",
            AckError::SignatureInvalid(_) => "signature_invalid",
            AckError::Stale { .. } => "stale_ack",
        }
    }
}
