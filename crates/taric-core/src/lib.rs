//! # TARIC Core
//!
//! The device-side protocol for TARIC: building signed entries and verifying
//! the server's acknowledgement of them.
//!
//! This crate contains no I/O, no clock, no randomness and no signature
//! algorithm. Everything environmental is reached through the [`Capabilities`]
//! trait supplied by the host.
//!
//! ## Key Types
//!
//! - [`Entry`] - An immutable, signed record of a device event
//! - [`Ack`] - A server attestation that references exactly one entry
//! - [`EntryIdentity`] - `(device_id, timestamp, nonce)`, what an ack binds to
//! - [`EntryRef`] - BLAKE3 digest of the canonical identity encoding
//!
//! ## Operations
//!
//! - [`build_signed_entry`] - sample freshness, sign, write the wire entry
//! - [`verify_ack`] - parse, correlate, verify and freshness-check an ack
//!
//! ## Canonicalization
//!
//! Every signed byte string is length-prefixed and domain-tagged. See the
//! [`canonical`] module for the frozen layout.

pub mod ack;
pub mod canonical;
pub mod capability;
#[cfg(feature = "ed25519")]
pub mod crypto;
pub mod entry;
pub mod error;
pub mod freshness;
pub mod sign;
pub mod types;
pub mod verify;

#[cfg(test)]
pub(crate) mod test_support;

pub use ack::{Ack, AckFields};
pub use canonical::{CanonicalEncoder, CanonicalReader, FieldSpec};
pub use capability::Capabilities;
#[cfg(feature = "ed25519")]
pub use crypto::{Ed25519PublicKey, Keypair};
pub use entry::{Entry, EntryFields};
pub use error::{AckError, CapabilityError, DecodeError, EncodingError, EntryError};
pub use freshness::{EntryIdentity, Freshness, FreshnessWindow, DEFAULT_ACK_TOLERANCE_MS};
pub use sign::{build_entry, build_signed_entry};
pub use types::{EntryRef, Nonce, ENTRY_REF_LEN, NONCE_LEN};
pub use verify::verify_ack;

/// Maximum device identifier length in bytes.
pub const MAX_DEVICE_ID_LEN: usize = 128;

/// Maximum key identifier length in bytes.
pub const MAX_KEY_ID_LEN: usize = 128;

/// Maximum algorithm name length in bytes.
pub const MAX_ALGO_LEN: usize = 32;

/// Maximum payload length in bytes (64 KiB).
pub const MAX_PAYLOAD_LEN: usize = 64 * 1024;

/// Maximum signature length in bytes, for entries and acks alike.
pub const MAX_SIGNATURE_LEN: usize = 256;

/// Maximum server signer identifier length in bytes.
pub const MAX_SIGNER_ID_LEN: usize = 128;
