//! Ed25519 helpers for host capability implementations.
//!
//! Nothing in the protocol path calls into this module. Hosts that sign with
//! Ed25519 in software (the reference client and server, tests) use these
//! wrappers so that key handling looks the same on both sides.

use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::error::CapabilityError;

/// Algorithm name carried in entries signed with these keys.
pub const ED25519_ALGO: &str = "ed25519";

/// Length of an Ed25519 signature.
pub const ED25519_SIGNATURE_LEN: usize = 64;

/// A 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ed25519PublicKey(pub [u8; 32]);

impl Ed25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut arr = [0u8; 32];
        hex::decode_to_slice(s, &mut arr)?;
        Ok(Self(arr))
    }

    /// Verify `signature` over `message`.
    ///
    /// Signatures of the wrong length are rejected rather than padded.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CapabilityError> {
        let key = VerifyingKey::from_bytes(&self.0)
            .map_err(|_| CapabilityError::new("invalid ed25519 public key"))?;
        let sig = Signature::from_slice(signature).map_err(|_| {
            CapabilityError::new(format!(
                "ed25519 signature must be {ED25519_SIGNATURE_LEN} bytes, got {}",
                signature.len()
            ))
        })?;
        key.verify_strict(message, &sig)
            .map_err(|_| CapabilityError::new("ed25519 signature mismatch"))
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Pub({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Ed25519PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Ed25519PublicKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<VerifyingKey> for Ed25519PublicKey {
    fn from(key: VerifyingKey) -> Self {
        Self(key.to_bytes())
    }
}

/// An Ed25519 signing key.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Get the public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.signing_key.verifying_key().into()
    }

    /// Raw seed bytes (secret key material).
    pub fn seed(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Sign `message`, returning the 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> [u8; ED25519_SIGNATURE_LEN] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Sign `message` into caller storage, in the shape of
    /// [`Capabilities::sign`](crate::Capabilities::sign).
    pub fn sign_into(&self, message: &[u8], out: &mut [u8]) -> Result<usize, CapabilityError> {
        if out.len() < ED25519_SIGNATURE_LEN {
            return Err(CapabilityError::new(format!(
                "signature buffer holds {} bytes, need {ED25519_SIGNATURE_LEN}",
                out.len()
            )));
        }
        out[..ED25519_SIGNATURE_LEN].copy_from_slice(&self.sign(message));
        Ok(ED25519_SIGNATURE_LEN)
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.public_key())
    }
}
