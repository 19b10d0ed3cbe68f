//! Proptest generators for property-based testing.

use bytes::Bytes;
use proptest::prelude::*;

use taric_core::{Entry, EntryFields, EntryIdentity, EntryRef, Keypair, Nonce, MAX_DEVICE_ID_LEN};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random nonce.
pub fn nonce() -> impl Strategy<Value = Nonce> {
    any::<[u8; 16]>().prop_map(Nonce::from_bytes)
}

/// Generate a random entry reference.
pub fn entry_ref() -> impl Strategy<Value = EntryRef> {
    any::<[u8; 32]>().prop_map(EntryRef::from_bytes)
}

/// Generate a device id, sometimes at the length limit.
pub fn device_id() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9-]{0,31}".prop_map(String::from),
        Just("d".repeat(MAX_DEVICE_ID_LEN)),
    ]
}

/// Generate a key id.
pub fn key_id() -> impl Strategy<Value = String> {
    "k[0-9]{1,3}".prop_map(String::from)
}

/// Generate an algorithm name.
pub fn algo() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("ed25519".to_string()),
        Just("ecdsa-p256".to_string()),
        "[a-z0-9-]{1,32}".prop_map(String::from),
    ]
}

/// Generate a timestamp in milliseconds.
pub fn timestamp() -> impl Strategy<Value = u64> {
    prop_oneof![Just(0u64), Just(u64::MAX), 0u64..=4_102_444_800_000]
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate an entry identity.
pub fn identity() -> impl Strategy<Value = EntryIdentity> {
    (device_id(), timestamp(), nonce()).prop_map(|(d, ts, n)| {
        EntryIdentity::new(d, ts, n).unwrap_or_else(|e| panic!("generated identity invalid: {e}"))
    })
}

/// Parameters for generating an entry.
#[derive(Debug, Clone)]
pub struct EntryParams {
    pub keypair: Keypair,
    pub device_id: String,
    pub key_id: String,
    pub algo: String,
    pub timestamp: u64,
    pub nonce: Nonce,
    pub payload: Vec<u8>,
}

impl EntryParams {
    pub fn fields(&self) -> EntryFields {
        EntryFields {
            device_id: self.device_id.clone(),
            key_id: self.key_id.clone(),
            algo: self.algo.clone(),
            timestamp: self.timestamp,
            nonce: self.nonce,
            payload: Bytes::from(self.payload.clone()),
        }
    }
}

impl Arbitrary for EntryParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            any::<[u8; 32]>(), // seed
            device_id(),
            key_id(),
            algo(),
            timestamp(),
            nonce(),
            payload(512),
        )
            .prop_map(
                |(seed, device_id, key_id, algo, timestamp, nonce, payload)| EntryParams {
                    keypair: Keypair::from_seed(&seed),
                    device_id,
                    key_id,
                    algo,
                    timestamp,
                    nonce,
                    payload,
                },
            )
            .boxed()
    }
}

/// A change to exactly one signed field of an entry.
#[derive(Debug, Clone)]
pub enum FieldChange {
    DeviceId(String),
    KeyId(String),
    Algo(String),
    Timestamp(u64),
    Nonce(Nonce),
    Payload(Vec<u8>),
}

impl FieldChange {
    /// Apply the change to a copy of `params`.
    pub fn apply(&self, params: &EntryParams) -> EntryParams {
        let mut changed = params.clone();
        match self {
            FieldChange::DeviceId(v) => changed.device_id = v.clone(),
            FieldChange::KeyId(v) => changed.key_id = v.clone(),
            FieldChange::Algo(v) => changed.algo = v.clone(),
            FieldChange::Timestamp(v) => changed.timestamp = *v,
            FieldChange::Nonce(v) => changed.nonce = *v,
            FieldChange::Payload(v) => changed.payload = v.clone(),
        }
        changed
    }
}

/// Generate a single-field change.
pub fn field_change() -> impl Strategy<Value = FieldChange> {
    prop_oneof![
        device_id().prop_map(FieldChange::DeviceId),
        key_id().prop_map(FieldChange::KeyId),
        algo().prop_map(FieldChange::Algo),
        timestamp().prop_map(FieldChange::Timestamp),
        nonce().prop_map(FieldChange::Nonce),
        payload(64).prop_map(FieldChange::Payload),
    ]
}

/// Sign and assemble an entry from parameters.
pub fn entry_from_params(params: &EntryParams) -> Entry {
    let fields = params.fields();
    let signable = fields
        .canonical_bytes()
        .unwrap_or_else(|e| panic!("generated fields invalid: {e}"));
    let signature = params.keypair.sign(&signable);
    Entry::assemble(fields, signature.to_vec())
        .unwrap_or_else(|e| panic!("generated entry invalid: {e}"))
}
