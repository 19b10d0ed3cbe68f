//! Ed25519 ack signer.

use taric_core::{Ed25519PublicKey, Keypair};

use crate::traits::AckSigner;

/// Signs acks with an Ed25519 key under a fixed signer id.
#[derive(Debug, Clone)]
pub struct Ed25519AckSigner {
    id: String,
    keypair: Keypair,
}

impl Ed25519AckSigner {
    /// Sign acks as `id` with `keypair`.
    pub fn new(id: impl Into<String>, keypair: Keypair) -> Self {
        Self {
            id: id.into(),
            keypair,
        }
    }

    /// Create from a 32-byte secret key seed.
    pub fn from_secret_key(id: impl Into<String>, secret_key: [u8; 32]) -> Self {
        Self::new(id, Keypair::from_seed(&secret_key))
    }

    /// The key devices must trust for this signer id.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }
}

impl AckSigner for Ed25519AckSigner {
    fn signer_id(&self) -> &str {
        &self.id
    }

    fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.keypair.sign(message).to_vec()
    }
}
