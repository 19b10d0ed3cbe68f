//! Software host capabilities for std targets.
//!
//! Signs with an in-memory Ed25519 key, trusts a fixed set of server keys,
//! reads the system clock and draws from the OS RNG. Devices with a secure
//! element implement [`Capabilities`] themselves instead.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;
use rand::RngCore;
use taric_core::{Capabilities, CapabilityError, Ed25519PublicKey, Keypair};

/// [`Capabilities`] backed by an Ed25519 key, the system clock and `OsRng`.
#[derive(Debug, Clone)]
pub struct HostCapabilities {
    keypair: Keypair,
    trusted_servers: HashMap<String, Ed25519PublicKey>,
}

impl HostCapabilities {
    /// Capabilities signing with `keypair` and trusting no server yet.
    pub fn new(keypair: Keypair) -> Self {
        Self {
            keypair,
            trusted_servers: HashMap::new(),
        }
    }

    /// Trust acks signed by `key` under `signer_id`.
    pub fn trust_server(mut self, signer_id: impl Into<String>, key: Ed25519PublicKey) -> Self {
        self.add_trusted_server(signer_id, key);
        self
    }

    /// Trust `key` for acks signed as `signer_id`, replacing any previous key.
    pub fn add_trusted_server(&mut self, signer_id: impl Into<String>, key: Ed25519PublicKey) {
        self.trusted_servers.insert(signer_id.into(), key);
    }

    /// Stop trusting `signer_id`. Returns the key that was trusted, if any.
    pub fn remove_trusted_server(&mut self, signer_id: &str) -> Option<Ed25519PublicKey> {
        self.trusted_servers.remove(signer_id)
    }

    /// The device's public key, for registration with a server.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }
}

impl Capabilities for HostCapabilities {
    fn sign(&self, message: &[u8], sig_out: &mut [u8]) -> Result<usize, CapabilityError> {
        self.keypair.sign_into(message, sig_out)
    }

    fn verify_server_ack(
        &self,
        message: &[u8],
        signature: &[u8],
        signer_id: &str,
    ) -> Result<(), CapabilityError> {
        let key = self
            .trusted_servers
            .get(signer_id)
            .ok_or_else(|| CapabilityError::new(format!("untrusted signer {signer_id}")))?;
        key.verify(message, signature)
    }

    fn now_unix_ms(&self) -> u64 {
        // A clock set before 1970 reads as the epoch.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }

    fn rng(&self, out: &mut [u8]) -> Result<usize, CapabilityError> {
        OsRng
            .try_fill_bytes(out)
            .map_err(|e| CapabilityError::new(format!("os rng: {e}")))?;
        Ok(out.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_is_verifiable_with_public_key() {
        let caps = HostCapabilities::new(Keypair::from_seed(&[7; 32]));
        let mut sig = [0u8; 256];
        let n = caps.sign(b"m", &mut sig).unwrap();
        assert_eq!(n, 64);
        caps.public_key().verify(b"m", &sig[..n]).unwrap();
    }

    #[test]
    fn test_verify_requires_trusted_signer() {
        let server = Keypair::from_seed(&[9; 32]);
        let mut caps = HostCapabilities::new(Keypair::from_seed(&[7; 32]))
            .trust_server("server-key-1", server.public_key());
        let sig = server.sign(b"ack");

        caps.verify_server_ack(b"ack", &sig, "server-key-1").unwrap();
        let err = caps.verify_server_ack(b"ack", &sig, "server-key-2").unwrap_err();
        assert!(err.0.contains("untrusted"));

        caps.remove_trusted_server("server-key-1");
        assert!(caps.verify_server_ack(b"ack", &sig, "server-key-1").is_err());
    }

    #[test]
    fn test_clock_and_rng() {
        let caps = HostCapabilities::new(Keypair::from_seed(&[7; 32]));
        // 2020-01-01T00:00:00Z
        assert!(caps.now_unix_ms() > 1_577_836_800_000);

        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        assert_eq!(caps.rng(&mut a).unwrap(), 16);
        caps.rng(&mut b).unwrap();
        assert_ne!(a, b);
    }
}
