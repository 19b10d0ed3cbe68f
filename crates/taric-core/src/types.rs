//! Strong type definitions for the TARIC protocol.
//!
//! Fixed-size byte strings are newtypes so a nonce can never be passed where
//! an entry reference is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of an entry nonce in bytes.
pub const NONCE_LEN: usize = 16;

/// Length of an entry reference in bytes.
pub const ENTRY_REF_LEN: usize = 32;

/// Random bytes sampled once per entry construction.
///
/// Uniqueness is the host RNG's responsibility. Nothing in this crate
/// remembers nonces it has seen.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nonce(pub [u8; NONCE_LEN]);

impl Nonce {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut arr = [0u8; NONCE_LEN];
        hex::decode_to_slice(s, &mut arr)?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce({})", self.to_hex())
    }
}

impl AsRef<[u8]> for Nonce {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; NONCE_LEN]> for Nonce {
    fn from(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Nonce {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; NONCE_LEN] = slice.try_into()?;
        Ok(Self(arr))
    }
}

/// A 32-byte entry reference: BLAKE3 over the canonical identity encoding.
///
/// Both client and server derive it independently from
/// `(device_id, timestamp, nonce)`; an ack is bound to the entry whose
/// reference it carries.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryRef(pub [u8; ENTRY_REF_LEN]);

impl EntryRef {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; ENTRY_REF_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; ENTRY_REF_LEN] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut arr = [0u8; ENTRY_REF_LEN];
        hex::decode_to_slice(s, &mut arr)?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryRef({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for EntryRef {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ENTRY_REF_LEN]> for EntryRef {
    fn from(bytes: [u8; ENTRY_REF_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for EntryRef {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; ENTRY_REF_LEN] = slice.try_into()?;
        Ok(Self(arr))
    }
}
