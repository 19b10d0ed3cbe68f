//! Golden test vectors for deterministic verification.
//!
//! These pin the canonical layout: any implementation that signs TARIC
//! entries must produce these exact signable bytes, and Ed25519 over them is
//! deterministic, so the signatures are pinned too. The entry references
//! pin the BLAKE3 preimage that acks bind to.

use bytes::Bytes;
use taric_core::{Ack, AckFields, Entry, EntryFields, EntryRef, Keypair, Nonce};

/// A golden entry vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Seed for the device key.
    pub seed: [u8; 32],
    pub device_id: &'static str,
    pub key_id: &'static str,
    pub algo: &'static str,
    pub timestamp: u64,
    pub nonce: [u8; 16],
    pub payload: &'static [u8],
    /// Expected signable bytes (hex).
    pub expected_signable: &'static str,
    /// Expected Ed25519 signature (hex).
    pub expected_signature: &'static str,
    /// Expected entry reference (hex).
    pub expected_entry_ref: &'static str,
}

/// A golden ack vector.
#[derive(Debug, Clone)]
pub struct AckVector {
    pub name: &'static str,
    /// Seed for the server key.
    pub seed: [u8; 32],
    pub signer_id: &'static str,
    pub entry_ref: [u8; 32],
    pub timestamp: u64,
    pub expected_signable: &'static str,
    pub expected_signature: &'static str,
}

/// Get all golden entry vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "temperature reading",
            seed: [0x42; 32],
            device_id: "dev-42",
            key_id: "k1",
            algo: "ed25519",
            timestamp: 1_736_870_400_000, // 2025-01-14T16:00:00Z
            nonce: [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
            payload: b"temp=21.5",
            expected_signable: "0000000e74617269632f656e7472792f7631000000066465762d3432000000026b31\
                                000000076564323535313900000194658b100000000010000102030405060708090a0b\
                                0c0d0e0f0000000974656d703d32312e35",
            expected_signature: "7ae314e6a544a1053602f976c2af7aff962d94c9368a6533ed13c6cf322615f8\
                                 9a558a73cdef359c2d41dfcc34f94a44467b27eb6938efabe335721e4d7b4b0b",
            expected_entry_ref:
                "0cabf2c2b7c1af4a1b8de0a74a7d3ba5b81cea9d7d72239aca4529a47aa6d4aa",
        },
        GoldenVector {
            name: "empty payload at epoch",
            seed: [0x00; 32],
            device_id: "d",
            key_id: "k",
            algo: "ed25519",
            timestamp: 0,
            nonce: [0; 16],
            payload: b"",
            expected_signable: "0000000e74617269632f656e7472792f76310000000164000000016b000000076564\
                                3235353139000000000000000000000010000000000000000000000000000000000000\
                                0000",
            expected_signature: "cb82c707bf44e88162eb1cecc152453ea7f8c750aa1771d5ea46d3829541ac54\
                                 cd400678922a926b5d9ab28550d28f26c33494a3bd0bdce36494b1d37929bd08",
            expected_entry_ref:
                "f8ab260375f304f9ecec3ffb554ea666cff8db5bd04b48dc9b07abcda8d51f00",
        },
        GoldenVector {
            name: "payload shaped like a length-prefixed field",
            seed: [0x07; 32],
            device_id: "dev-7",
            key_id: "k2",
            algo: "ed25519",
            timestamp: u64::MAX,
            nonce: [0xff; 16],
            payload: b"\x00\x00\x00\x02k2",
            expected_signable: "0000000e74617269632f656e7472792f7631000000056465762d37000000026b3200\
                                00000765643235353139ffffffffffffffff00000010ffffffffffffffffffffffffff\
                                ffffff00000006000000026b32",
            expected_signature: "c76989184d8c82cb45b7651653e2d606bbcbd2757865345bf141c13683404cf6\
                                 f79f6a5ea2689b7b9114d2c7353a7582124f2bfb7333629b0d5e6832fb2c0509",
            expected_entry_ref:
                "41f056abeb60f52a90d37ffa387b53cfd282761bad1c0ffb60df2d1dff3e832d",
        },
    ]
}

/// Get all golden ack vectors.
pub fn ack_vectors() -> Vec<AckVector> {
    vec![AckVector {
        name: "ack half a second after the reading",
        seed: [0x53; 32],
        signer_id: "server-key-1",
        entry_ref: [0xab; 32],
        timestamp: 1_736_870_400_500,
        expected_signable: "0000000c74617269632f61636b2f76310000000c7365727665722d6b65792d310000\
                            0020abababababababababababababababababababababababababababababababab00\
                            000194658b11f4",
        expected_signature: "9b93d4c8a811d231bd4a405b21d833f08cbc7c0dde2cf332e45c5c75f3375401\
                             e1f8e4f2ef1cf7c9b8de6df32a52100f3306e6cd1b5d53de84f2c9037037be01",
    }]
}

/// Build and sign the entry a vector describes.
pub fn entry_from_vector(vector: &GoldenVector) -> Entry {
    let fields = EntryFields {
        device_id: vector.device_id.into(),
        key_id: vector.key_id.into(),
        algo: vector.algo.into(),
        timestamp: vector.timestamp,
        nonce: Nonce::from_bytes(vector.nonce),
        payload: Bytes::from_static(vector.payload),
    };
    let signable = fields
        .canonical_bytes()
        .unwrap_or_else(|e| panic!("vector '{}' has invalid fields: {e}", vector.name));
    let signature = Keypair::from_seed(&vector.seed).sign(&signable);
    Entry::assemble(fields, signature.to_vec())
        .unwrap_or_else(|e| panic!("vector '{}' did not assemble: {e}", vector.name))
}

/// Build and sign the ack a vector describes.
pub fn ack_from_vector(vector: &AckVector) -> Ack {
    let fields = AckFields {
        signer_id: vector.signer_id.into(),
        entry_ref: EntryRef::from_bytes(vector.entry_ref),
        timestamp: vector.timestamp,
    };
    let signable = fields
        .canonical_bytes()
        .unwrap_or_else(|e| panic!("vector '{}' has invalid fields: {e}", vector.name));
    let signature = Keypair::from_seed(&vector.seed).sign(&signable);
    Ack::assemble(fields, signature.to_vec())
        .unwrap_or_else(|e| panic!("vector '{}' did not assemble: {e}", vector.name))
}

/// Check every entry vector, reporting `(name, matches, entry_ref hex)`.
///
/// Call this to verify an implementation matches the reference.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let entry = entry_from_vector(v);
            let entry_ref = entry.entry_ref().to_hex();

            let matches = hex::encode(entry.signable_bytes()) == v.expected_signable
                && hex::encode(entry.signature()) == v.expected_signature
                && entry_ref == v.expected_entry_ref;

            (v.name.to_string(), matches, entry_ref)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_vectors_match() {
        for (name, matches, entry_ref) in verify_all_vectors() {
            assert!(matches, "vector '{name}' diverged (entry_ref {entry_ref})");
        }
    }

    #[test]
    fn test_entry_refs_pinned() {
        for v in all_vectors() {
            assert_eq!(
                entry_from_vector(&v).entry_ref().to_hex(),
                v.expected_entry_ref,
                "vector '{}'",
                v.name
            );
        }
    }

    #[test]
    fn test_ack_vectors_match() {
        for v in ack_vectors() {
            let ack = ack_from_vector(&v);
            assert_eq!(hex::encode(ack.signable_bytes()), v.expected_signable, "{}", v.name);
            assert_eq!(hex::encode(ack.signature()), v.expected_signature, "{}", v.name);
        }
    }

    #[test]
    fn test_vectors_are_deterministic() {
        for v in all_vectors() {
            let e1 = entry_from_vector(&v);
            let e2 = entry_from_vector(&v);
            assert_eq!(e1.encode(), e2.encode(), "vector '{}'", v.name);
            assert_eq!(e1.entry_ref(), e2.entry_ref(), "vector '{}'", v.name);
        }
    }

    #[test]
    fn test_vectors_have_distinct_refs() {
        let refs: Vec<_> = all_vectors()
            .iter()
            .map(|v| entry_from_vector(v).entry_ref())
            .collect();
        for (i, a) in refs.iter().enumerate() {
            for b in &refs[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
