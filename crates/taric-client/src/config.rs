//! Client configuration.
//!
//! Loaded from JSON. Every field has a default, so a file only names what it
//! changes:
//!
//! ```json
//! { "device_id": "dev-42", "ack_freshness_ms": 60000 }
//! ```
//!
//! `"ack_freshness_ms": null` disables the ack freshness check.

use std::path::Path;

use serde::{Deserialize, Serialize};
use taric_core::canonical::fields;
use taric_core::{FreshnessWindow, DEFAULT_ACK_TOLERANCE_MS};

use crate::error::ConfigError;

/// Configuration for a [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Identifier of this device, carried in every entry.
    pub device_id: String,
    /// Maximum drift between an entry and its ack, in milliseconds.
    pub ack_freshness_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            device_id: String::new(),
            ack_freshness_ms: Some(DEFAULT_ACK_TOLERANCE_MS),
        }
    }
}

impl ClientConfig {
    /// Default configuration for `device_id`.
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            ..Self::default()
        }
    }

    /// Check the device id against the entry field rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fields::DEVICE_ID
            .check(self.device_id.as_bytes())
            .map_err(ConfigError::DeviceId)
    }

    /// Freshness window for ack verification.
    pub fn freshness_window(&self) -> FreshnessWindow {
        FreshnessWindow {
            tolerance_ms: self.ack_freshness_ms,
        }
    }

    /// Parse and validate JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
