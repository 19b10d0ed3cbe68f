//! Test fixtures and helpers.
//!
//! Common setup for integration tests: devices with deterministic keys,
//! a reference server that trusts them, and scripted capabilities whose
//! clock, RNG and failures are under test control.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use taric_core::{
    build_signed_entry, Capabilities, CapabilityError, Ed25519PublicKey, EntryIdentity, Keypair,
};
use taric_server::{AckIssuer, Ed25519AckSigner, InMemoryTrust, IssueError};

/// Signer id used by [`ReferenceServer`].
pub const SERVER_ID: &str = "server-key-1";

/// A fixed instant: 2025-01-14T16:00:00Z.
pub const T0: u64 = 1_736_870_400_000;

/// A failure the scripted capabilities can inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// `rng` returns an error.
    RngFails,
    /// `rng` reports fewer bytes than requested.
    RngShort,
    /// `sign` returns an error.
    SignFails,
    /// `sign` reports zero bytes.
    SignEmpty,
    /// `sign` reports more bytes than the buffer holds.
    SignOverreports,
}

/// Number of calls made to each capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub sign: usize,
    pub verify: usize,
    pub clock: usize,
    pub rng: usize,
}

/// Ed25519 capabilities with a settable clock and a counting RNG.
#[derive(Debug)]
pub struct ScriptedCapabilities {
    keypair: Keypair,
    trusted: HashMap<String, Ed25519PublicKey>,
    fault: Option<Fault>,
    now: AtomicU64,
    next_nonce: AtomicU64,
    sign_calls: AtomicUsize,
    verify_calls: AtomicUsize,
    clock_calls: AtomicUsize,
    rng_calls: AtomicUsize,
}

impl ScriptedCapabilities {
    pub fn new(keypair: Keypair, now: u64) -> Self {
        Self {
            keypair,
            trusted: HashMap::new(),
            fault: None,
            now: AtomicU64::new(now),
            next_nonce: AtomicU64::new(1),
            sign_calls: AtomicUsize::new(0),
            verify_calls: AtomicUsize::new(0),
            clock_calls: AtomicUsize::new(0),
            rng_calls: AtomicUsize::new(0),
        }
    }

    pub fn trust_server(mut self, signer_id: impl Into<String>, key: Ed25519PublicKey) -> Self {
        self.trusted.insert(signer_id.into(), key);
        self
    }

    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.fault = Some(fault);
        self
    }

    pub fn set_now(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn calls(&self) -> CallCounts {
        CallCounts {
            sign: self.sign_calls.load(Ordering::SeqCst),
            verify: self.verify_calls.load(Ordering::SeqCst),
            clock: self.clock_calls.load(Ordering::SeqCst),
            rng: self.rng_calls.load(Ordering::SeqCst),
        }
    }
}

impl Capabilities for ScriptedCapabilities {
    fn sign(&self, message: &[u8], sig_out: &mut [u8]) -> Result<usize, CapabilityError> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        match self.fault {
            Some(Fault::SignFails) => Err(CapabilityError::new("signer unavailable")),
            Some(Fault::SignEmpty) => Ok(0),
            Some(Fault::SignOverreports) => Ok(sig_out.len() + 1),
            _ => self.keypair.sign_into(message, sig_out),
        }
    }

    fn verify_server_ack(
        &self,
        message: &[u8],
        signature: &[u8],
        signer_id: &str,
    ) -> Result<(), CapabilityError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.trusted
            .get(signer_id)
            .ok_or_else(|| CapabilityError::new(format!("untrusted signer {signer_id}")))?
            .verify(message, signature)
    }

    fn now_unix_ms(&self) -> u64 {
        self.clock_calls.fetch_add(1, Ordering::SeqCst);
        self.now.load(Ordering::SeqCst)
    }

    fn rng(&self, out: &mut [u8]) -> Result<usize, CapabilityError> {
        self.rng_calls.fetch_add(1, Ordering::SeqCst);
        match self.fault {
            Some(Fault::RngFails) => return Err(CapabilityError::new("entropy unavailable")),
            Some(Fault::RngShort) => return Ok(out.len() / 2),
            _ => {}
        }
        let counter = self.next_nonce.fetch_add(1, Ordering::SeqCst).to_be_bytes();
        for (i, b) in out.iter_mut().enumerate() {
            *b = counter[i % counter.len()];
        }
        Ok(out.len())
    }
}

/// A device with a deterministic key.
#[derive(Debug, Clone)]
pub struct TestDevice {
    pub device_id: String,
    pub key_id: String,
    pub keypair: Keypair,
}

impl TestDevice {
    pub fn new(device_id: impl Into<String>, seed: [u8; 32]) -> Self {
        Self {
            device_id: device_id.into(),
            key_id: "k1".into(),
            keypair: Keypair::from_seed(&seed),
        }
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }

    /// Capabilities for this device that trust `server`, with the clock at `now`.
    pub fn capabilities(&self, server: &ReferenceServer, now: u64) -> ScriptedCapabilities {
        ScriptedCapabilities::new(self.keypair.clone(), now)
            .trust_server(server.signer_id(), server.public_key())
    }

    /// Build a signed `ed25519` entry, returning its wire bytes and identity.
    pub fn build<C: Capabilities + ?Sized>(
        &self,
        caps: &C,
        payload: &[u8],
    ) -> (Vec<u8>, EntryIdentity) {
        let mut out = vec![0u8; 1024 + payload.len()];
        let n = build_signed_entry(caps, &self.device_id, payload, "ed25519", &self.key_id, &mut out)
            .unwrap_or_else(|e| panic!("building entry for {}: {e}", self.device_id));
        out.truncate(n);
        let identity = EntryIdentity::from_wire_entry(&out)
            .unwrap_or_else(|e| panic!("re-reading entry for {}: {e}", self.device_id));
        (out, identity)
    }
}

impl Default for TestDevice {
    fn default() -> Self {
        Self::new("dev-42", [0x42; 32])
    }
}

/// Create `count` devices named `dev-0`, `dev-1`, ... with distinct keys.
pub fn devices(count: usize) -> Vec<TestDevice> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[..8].copy_from_slice(&(i as u64).to_be_bytes());
            TestDevice::new(format!("dev-{i}"), seed)
        })
        .collect()
}

/// The reference ack issuer with an in-memory trust store.
pub struct ReferenceServer {
    pub issuer: AckIssuer,
    pub trust: Arc<InMemoryTrust>,
    public_key: Ed25519PublicKey,
}

impl ReferenceServer {
    /// A server signing as [`SERVER_ID`] with a key derived from `seed`.
    pub fn new(seed: [u8; 32]) -> Self {
        let signer = Ed25519AckSigner::from_secret_key(SERVER_ID, seed);
        let public_key = signer.public_key();
        let trust = Arc::new(InMemoryTrust::new());
        Self {
            issuer: AckIssuer::new(trust.clone(), Arc::new(signer)),
            trust,
            public_key,
        }
    }

    pub fn signer_id(&self) -> &str {
        self.issuer.signer_id()
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        self.public_key
    }

    /// Trust `device`'s key.
    pub fn register(&self, device: &TestDevice) {
        self.trust
            .insert_ed25519(device.device_id.clone(), device.key_id.clone(), device.public_key());
    }

    /// Issue an ack for `wire_entry` at `now`, returning its wire bytes.
    pub fn ack(&self, wire_entry: &[u8], now: u64) -> Result<Vec<u8>, IssueError> {
        self.issuer.issue(wire_entry, now).map(|ack| ack.encode())
    }
}

impl Default for ReferenceServer {
    fn default() -> Self {
        Self::new([0x53; 32])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_round_trip() {
        let server = ReferenceServer::default();
        let device = TestDevice::default();
        server.register(&device);

        let caps = device.capabilities(&server, T0);
        let (wire, identity) = device.build(&caps, b"temp=21.5");
        assert_eq!(identity.device_id(), "dev-42");
        assert_eq!(identity.timestamp(), T0);
        assert_eq!(caps.calls(), CallCounts { sign: 1, verify: 0, clock: 1, rng: 1 });

        let ack = server.ack(&wire, T0 + 10).unwrap();
        assert!(!ack.is_empty());
    }

    #[test]
    fn test_scripted_rng_never_repeats() {
        let caps = ScriptedCapabilities::new(Keypair::from_seed(&[0; 32]), T0);
        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        caps.rng(&mut a).unwrap();
        caps.rng(&mut b).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_devices_have_distinct_keys() {
        let devs = devices(3);
        assert_eq!(devs[2].device_id, "dev-2");
        assert_ne!(devs[0].public_key(), devs[1].public_key());
        assert_ne!(devs[1].public_key(), devs[2].public_key());
    }

    #[test]
    fn test_clock_control() {
        let caps = ScriptedCapabilities::new(Keypair::from_seed(&[0; 32]), T0);
        caps.advance(500);
        assert_eq!(caps.now_unix_ms(), T0 + 500);
        caps.set_now(7);
        assert_eq!(caps.now_unix_ms(), 7);
    }
}
