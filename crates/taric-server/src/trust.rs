//! In-memory device trust.
//!
//! Suitable for tests and single-process deployments. Thread-safe via RwLock.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use taric_core::crypto::ED25519_ALGO;
use taric_core::Ed25519PublicKey;

use crate::traits::{DeviceKey, DeviceTrust};

#[derive(Debug, Clone)]
struct TrustRecord {
    key: DeviceKey,
    revoked: bool,
}

/// Registered device keys keyed by `(device_id, key_id)`.
#[derive(Debug, Default)]
pub struct InMemoryTrust {
    records: RwLock<HashMap<(String, String), TrustRecord>>,
}

impl InMemoryTrust {
    /// Create an empty trust store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a key. A replaced key starts unrevoked.
    pub fn insert(&self, device_id: impl Into<String>, key_id: impl Into<String>, key: DeviceKey) {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.insert(
            (device_id.into(), key_id.into()),
            TrustRecord {
                key,
                revoked: false,
            },
        );
    }

    /// Register an Ed25519 device key.
    pub fn insert_ed25519(
        &self,
        device_id: impl Into<String>,
        key_id: impl Into<String>,
        public_key: Ed25519PublicKey,
    ) {
        let key = DeviceKey::new(ED25519_ALGO, public_key.as_bytes().to_vec());
        self.insert(device_id, key_id, key);
    }

    /// Mark a key revoked. Returns false if no such key is registered.
    pub fn revoke(&self, device_id: &str, key_id: &str) -> bool {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        match records.get_mut(&(device_id.to_owned(), key_id.to_owned())) {
            Some(record) => {
                record.revoked = true;
                true
            }
            None => false,
        }
    }

    /// Number of trusted keys, revoked ones included.
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no keys are trusted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn record(&self, device_id: &str, key_id: &str) -> Option<TrustRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(device_id.to_owned(), key_id.to_owned()))
            .cloned()
    }
}

impl DeviceTrust for InMemoryTrust {
    fn get_key(&self, device_id: &str, key_id: &str) -> Option<DeviceKey> {
        self.record(device_id, key_id).map(|r| r.key)
    }

    fn is_revoked(&self, device_id: &str, key_id: &str) -> bool {
        self.record(device_id, key_id).is_some_and(|r| r.revoked)
    }
}
