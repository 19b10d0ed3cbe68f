//! The ack issuer.
//!
//! Checks, in order, stopping at the first failure:
//! 1. Decode the wire entry
//! 2. Look up the device key
//! 3. Reject revoked keys
//! 4. Require the trusted key's algorithm to match the entry's
//! 5. Verify the device signature over the entry's signable bytes
//!
//! An accepted entry gets an ack bound to its [`EntryRef`](taric_core::EntryRef)
//! and stamped with the issuer's clock. No chain or nonce history is kept.

use std::sync::Arc;

use taric_core::crypto::ED25519_ALGO;
use taric_core::{Ack, AckFields, Ed25519PublicKey, Entry};

use crate::error::IssueError;
use crate::traits::{AckSigner, DeviceKey, DeviceTrust};

/// Verifies device entries and signs acks for the accepted ones.
pub struct AckIssuer {
    trust: Arc<dyn DeviceTrust>,
    signer: Arc<dyn AckSigner>,
}

impl AckIssuer {
    /// Create an issuer over a trust store and an ack signer.
    pub fn new(trust: Arc<dyn DeviceTrust>, signer: Arc<dyn AckSigner>) -> Self {
        Self { trust, signer }
    }

    /// Identifier of the key signing this issuer's acks.
    pub fn signer_id(&self) -> &str {
        self.signer.signer_id()
    }

    /// Verify a wire entry and return a signed ack for it.
    pub fn issue(&self, wire_entry: &[u8], now_ms: u64) -> Result<Ack, IssueError> {
        let result = Entry::decode(wire_entry)
            .map_err(IssueError::from)
            .and_then(|entry| self.issue_entry(&entry, now_ms));
        if let Err(e) = &result {
            tracing::warn!(code = e.code(), "entry rejected: {}", e);
        }
        result
    }

    /// Verify an already decoded entry and return a signed ack for it.
    pub fn issue_entry(&self, entry: &Entry, now_ms: u64) -> Result<Ack, IssueError> {
        let device_id = entry.device_id();
        let key_id = entry.key_id();

        let key = self
            .trust
            .get_key(device_id, key_id)
            .ok_or_else(|| IssueError::DeviceUnknown {
                device_id: device_id.to_owned(),
                key_id: key_id.to_owned(),
            })?;
        if self.trust.is_revoked(device_id, key_id) {
            return Err(IssueError::Revoked {
                device_id: device_id.to_owned(),
                key_id: key_id.to_owned(),
            });
        }
        if key.algo != entry.algo() {
            return Err(IssueError::UnsupportedAlgo(entry.algo().to_owned()));
        }
        verify_device_signature(entry, &key)?;

        let ack = self.sign_ack(entry, now_ms)?;
        tracing::debug!(
            device_id,
            entry_ref = %ack.entry_ref(),
            signer_id = ack.signer_id(),
            "entry acknowledged"
        );
        Ok(ack)
    }

    fn sign_ack(&self, entry: &Entry, now_ms: u64) -> Result<Ack, IssueError> {
        let fields = AckFields {
            signer_id: self.signer.signer_id().to_owned(),
            entry_ref: entry.entry_ref(),
            timestamp: now_ms,
        };
        let signable = fields.canonical_bytes().map_err(IssueError::Signer)?;
        let signature = self.signer.sign(&signable);
        Ack::assemble(fields, signature).map_err(IssueError::Signer)
    }
}

fn verify_device_signature(entry: &Entry, key: &DeviceKey) -> Result<(), IssueError> {
    match key.algo.as_str() {
        ED25519_ALGO => {
            let bytes: [u8; 32] =
                key.key
                    .as_ref()
                    .try_into()
                    .map_err(|_| IssueError::InvalidKey {
                        device_id: entry.device_id().to_owned(),
                        reason: format!("ed25519 key is {} bytes", key.key.len()),
                    })?;
            Ed25519PublicKey::from_bytes(bytes)
                .verify(&entry.signable_bytes(), entry.signature())
                .map_err(|_| IssueError::InvalidSignature)
        }
        other => Err(IssueError::UnsupportedAlgo(other.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::Ed25519AckSigner;
    use crate::trust::InMemoryTrust;
    use bytes::Bytes;
    use taric_core::{EntryFields, Keypair, Nonce};

    const NOW: u64 = 1_736_870_400_000;

    struct Setup {
        issuer: AckIssuer,
        trust: Arc<InMemoryTrust>,
        device: Keypair,
        server_key: Ed25519PublicKey,
    }

    fn setup() -> Setup {
        let device = Keypair::from_seed(&[0x42; 32]);
        let trust = Arc::new(InMemoryTrust::new());
        trust.insert_ed25519("dev-42", "k1", device.public_key());
        let signer = Ed25519AckSigner::from_secret_key("server-key-1", [0x53; 32]);
        let server_key = signer.public_key();
        let issuer = AckIssuer::new(trust.clone(), Arc::new(signer));
        Setup {
            issuer,
            trust,
            device,
            server_key,
        }
    }

    fn signed_entry(device: &Keypair, device_id: &str, algo: &str) -> Entry {
        let fields = EntryFields {
            device_id: device_id.into(),
            key_id: "k1".into(),
            algo: algo.into(),
            timestamp: NOW - 40,
            nonce: Nonce::from_bytes([3; 16]),
            payload: Bytes::from_static(b"temp=21.5"),
        };
        let sig = device.sign(&fields.canonical_bytes().unwrap());
        Entry::assemble(fields, sig.to_vec()).unwrap()
    }

    #[test]
    fn test_issue_accepts_and_signs() {
        let s = setup();
        let entry = signed_entry(&s.device, "dev-42", "ed25519");

        let ack = s.issuer.issue(&entry.encode(), NOW).unwrap();
        assert_eq!(ack.signer_id(), "server-key-1");
        assert_eq!(ack.entry_ref(), &entry.entry_ref());
        assert_eq!(ack.timestamp(), NOW);
        s.server_key
            .verify(&ack.signable_bytes(), ack.signature())
            .expect("ack signature should verify");
    }

    #[test]
    fn test_issue_rejects_garbage() {
        let s = setup();
        assert!(matches!(
            s.issuer.issue(b"not an entry", NOW),
            Err(IssueError::Malformed(_))
        ));
    }

    #[test]
    fn test_issue_rejects_unknown_device() {
        let s = setup();
        let entry = signed_entry(&s.device, "dev-99", "ed25519");
        let err = s.issuer.issue(&entry.encode(), NOW).unwrap_err();
        assert_eq!(err.code(), "device_unknown");
    }

    #[test]
    fn test_issue_rejects_revoked() {
        let s = setup();
        s.trust.revoke("dev-42", "k1");
        let entry = signed_entry(&s.device, "dev-42", "ed25519");
        assert!(matches!(
            s.issuer.issue(&entry.encode(), NOW),
            Err(IssueError::Revoked { .. })
        ));
    }

    #[test]
    fn test_issue_rejects_algo_mismatch() {
        let s = setup();
        let entry = signed_entry(&s.device, "dev-42", "ecdsa-p256");
        assert_eq!(
            s.issuer.issue(&entry.encode(), NOW),
            Err(IssueError::UnsupportedAlgo("ecdsa-p256".into()))
        );
    }

    #[test]
    fn test_issue_rejects_unverifiable_algo() {
        let s = setup();
        s.trust
            .insert("dev-42", "k1", DeviceKey::new("hmac-sha256", vec![0u8; 32]));
        let entry = signed_entry(&s.device, "dev-42", "hmac-sha256");
        assert_eq!(
            s.issuer.issue(&entry.encode(), NOW),
            Err(IssueError::UnsupportedAlgo("hmac-sha256".into()))
        );
    }

    #[test]
    fn test_issue_rejects_wrong_device_key() {
        let s = setup();
        let impostor = Keypair::from_seed(&[0x66; 32]);
        let entry = signed_entry(&impostor, "dev-42", "ed25519");
        assert_eq!(
            s.issuer.issue(&entry.encode(), NOW),
            Err(IssueError::InvalidSignature)
        );
    }

    #[test]
    fn test_issue_rejects_tampered_payload() {
        let s = setup();
        let entry = signed_entry(&s.device, "dev-42", "ed25519");
        let mut fields = entry.fields().clone();
        fields.payload = Bytes::from_static(b"temp=99.9");
        let tampered = Entry::assemble(fields, entry.signature().clone()).unwrap();
        assert_eq!(
            s.issuer.issue(&tampered.encode(), NOW),
            Err(IssueError::InvalidSignature)
        );
    }

    #[test]
    fn test_issue_rejects_short_trusted_key() {
        let s = setup();
        s.trust
            .insert("dev-42", "k1", DeviceKey::new("ed25519", vec![0u8; 31]));
        let entry = signed_entry(&s.device, "dev-42", "ed25519");
        assert!(matches!(
            s.issuer.issue(&entry.encode(), NOW),
            Err(IssueError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_misconfigured_signer_id() {
        struct Blank;
        impl AckSigner for Blank {
            fn signer_id(&self) -> &str {
                ""
            }
            fn sign(&self, _: &[u8]) -> Vec<u8> {
                vec![1]
            }
        }
        let s = setup();
        let issuer = AckIssuer::new(s.trust.clone(), Arc::new(Blank));
        let entry = signed_entry(&s.device, "dev-42", "ed25519");
        assert_eq!(
            issuer.issue(&entry.encode(), NOW).unwrap_err().code(),
            "signer_error"
        );
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_signed_entries_acked_for_their_ref(
                timestamp in any::<u64>(),
                nonce in any::<[u8; 16]>(),
                payload in proptest::collection::vec(any::<u8>(), 0..256),
            ) {
                let s = setup();
                let fields = EntryFields {
                    device_id: "dev-42".into(),
                    key_id: "k1".into(),
                    algo: "ed25519".into(),
                    timestamp,
                    nonce: Nonce::from_bytes(nonce),
                    payload: Bytes::from(payload),
                };
                let sig = s.device.sign(&fields.canonical_bytes().unwrap());
                let entry = Entry::assemble(fields, sig.to_vec()).unwrap();

                let ack = s.issuer.issue(&entry.encode(), NOW).unwrap();
                prop_assert_eq!(ack.entry_ref(), &entry.entry_ref());
                prop_assert!(s.server_key.verify(&ack.signable_bytes(), ack.signature()).is_ok());
            }

            #[test]
            fn test_any_bit_flip_is_rejected(pos in any::<prop::sample::Index>(), bit in 0u8..8) {
                let s = setup();
                let mut wire = signed_entry(&s.device, "dev-42", "ed25519").encode();
                let i = pos.index(wire.len());
                wire[i] ^= 1 << bit;
                prop_assert!(s.issuer.issue(&wire, NOW).is_err());
            }

            #[test]
            fn test_arbitrary_bytes_are_rejected(
                bytes in proptest::collection::vec(any::<u8>(), 0..512),
            ) {
                let s = setup();
                prop_assert!(s.issuer.issue(&bytes, NOW).is_err());
            }
        }
    }
}
