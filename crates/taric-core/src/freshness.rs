//! Freshness and replay binding.
//!
//! The same `(timestamp, nonce)` pair is produced once when an entry is built
//! and re-derived into an [`EntryRef`] when its ack is checked. No nonce
//! history is kept here; duplicate detection belongs to whoever stores
//! entries.

use serde::{Deserialize, Serialize};

use crate::canonical::{field_len, fields, CanonicalEncoder, ENTRY_REF_DOMAIN, U64_LEN};
use crate::capability::Capabilities;
use crate::error::{AckError, EncodingError, EntryError};
use crate::types::{EntryRef, Nonce, NONCE_LEN};

/// Default ack freshness tolerance: five minutes.
pub const DEFAULT_ACK_TOLERANCE_MS: u64 = 5 * 60 * 1000;

/// Timestamp and nonce sampled for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freshness {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Random bytes from the host RNG.
    pub nonce: Nonce,
}

impl Freshness {
    /// Sample the clock, then the RNG. Each is called exactly once.
    pub fn sample<C: Capabilities + ?Sized>(caps: &C) -> Result<Self, EntryError> {
        let timestamp = caps.now_unix_ms();

        let mut nonce = [0u8; NONCE_LEN];
        let written = caps
            .rng(&mut nonce)
            .map_err(|e| EntryError::Rng(e.to_string()))?;
        if written != NONCE_LEN {
            return Err(EntryError::Rng(format!(
                "rng reported {written} bytes, need {NONCE_LEN}"
            )));
        }

        Ok(Self {
            timestamp,
            nonce: Nonce(nonce),
        })
    }
}

/// The fields that identify an entry for acknowledgement.
///
/// Validated on construction, so deriving the reference cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryIdentity {
    device_id: String,
    timestamp: u64,
    nonce: Nonce,
}

impl EntryIdentity {
    /// Create an identity, checking the device id against its field rule.
    pub fn new(
        device_id: impl Into<String>,
        timestamp: u64,
        nonce: Nonce,
    ) -> Result<Self, EncodingError> {
        let device_id = device_id.into();
        fields::DEVICE_ID.check(device_id.as_bytes())?;
        Ok(Self {
            device_id,
            timestamp,
            nonce,
        })
    }

    /// Caller has already checked `device_id`.
    pub(crate) fn from_validated(device_id: String, timestamp: u64, nonce: Nonce) -> Self {
        Self {
            device_id,
            timestamp,
            nonce,
        }
    }

    /// The device that produced the entry.
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// The entry's timestamp.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// The entry's nonce.
    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    /// Canonical preimage of the entry reference.
    pub fn canonical_ref_bytes(&self) -> Vec<u8> {
        let body = field_len(self.device_id.len()) + U64_LEN + field_len(NONCE_LEN);
        let mut enc = CanonicalEncoder::with_capacity(ENTRY_REF_DOMAIN, body);
        enc.field(self.device_id.as_bytes())
            .u64(self.timestamp)
            .field(self.nonce.as_bytes());
        enc.finish()
    }

    /// `BLAKE3(canonical_ref_bytes)`.
    pub fn entry_ref(&self) -> EntryRef {
        EntryRef(*blake3::hash(&self.canonical_ref_bytes()).as_bytes())
    }
}

/// How far an ack's timestamp may drift from its entry's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessWindow {
    /// Maximum absolute difference in milliseconds; `None` disables the check.
    pub tolerance_ms: Option<u64>,
}

impl Default for FreshnessWindow {
    fn default() -> Self {
        Self {
            tolerance_ms: Some(DEFAULT_ACK_TOLERANCE_MS),
        }
    }
}

impl FreshnessWindow {
    /// A window that accepts any ack timestamp.
    pub const DISABLED: Self = Self { tolerance_ms: None };

    /// A window with the given tolerance.
    pub const fn new(tolerance_ms: u64) -> Self {
        Self {
            tolerance_ms: Some(tolerance_ms),
        }
    }

    /// Check an ack timestamp against the entry timestamp it acknowledges.
    pub fn check(&self, entry_timestamp: u64, ack_timestamp: u64) -> Result<(), AckError> {
        let Some(tolerance_ms) = self.tolerance_ms else {
            return Ok(());
        };
        if entry_timestamp.abs_diff(ack_timestamp) > tolerance_ms {
            return Err(AckError::Stale {
                entry_timestamp,
                ack_timestamp,
                tolerance_ms,
            });
        }
        Ok(())
    }
}
