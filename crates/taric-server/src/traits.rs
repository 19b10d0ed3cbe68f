//! Seams between the issuer and its deployment.

use bytes::Bytes;

/// A verifying key registered for one device key id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceKey {
    /// Algorithm the key belongs to, e.g. `ed25519`.
    pub algo: String,
    /// Raw public key bytes.
    pub key: Bytes,
}

impl DeviceKey {
    /// Create from an algorithm name and raw key bytes.
    pub fn new(algo: impl Into<String>, key: impl Into<Bytes>) -> Self {
        Self {
            algo: algo.into(),
            key: key.into(),
        }
    }
}

/// Maps `(device_id, key_id)` to a verifying key and its revocation state.
pub trait DeviceTrust: Send + Sync {
    /// The registered key, if any.
    fn get_key(&self, device_id: &str, key_id: &str) -> Option<DeviceKey>;

    /// Whether the key has been revoked. A revoked key never verifies.
    fn is_revoked(&self, _device_id: &str, _key_id: &str) -> bool {
        false
    }
}

/// Signs acks with the server key.
pub trait AckSigner: Send + Sync {
    /// Identifier devices use to select the verifying key, e.g. `server-key-1`.
    fn signer_id(&self) -> &str;

    /// Sign canonical ack bytes.
    fn sign(&self, message: &[u8]) -> Vec<u8>;
}
