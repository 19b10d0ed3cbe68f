//! Deterministic capabilities for unit tests.
//!
//! Signatures are keyed BLAKE3 MACs: any algorithm behind the trait works, so
//! the core tests stay independent of Ed25519.

use std::cell::Cell;

use crate::capability::Capabilities;
use crate::error::CapabilityError;

pub const DEVICE_KEY: [u8; 32] = [0x11; 32];
pub const SERVER_KEY: [u8; 32] = [0x22; 32];
pub const SERVER_ID: &str = "server-key-1";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Calls {
    pub sign: usize,
    pub verify: usize,
    pub clock: usize,
    pub rng: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    RngFails,
    RngShort,
    SignFails,
    SignEmpty,
    SignOverreports,
}

pub struct MacCapabilities {
    now: u64,
    fault: Option<Fault>,
    next_nonce: Cell<u8>,
    calls: Cell<Calls>,
}

impl MacCapabilities {
    pub fn new(now: u64) -> Self {
        Self {
            now,
            fault: None,
            next_nonce: Cell::new(1),
            calls: Cell::new(Calls::default()),
        }
    }

    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.fault = Some(fault);
        self
    }

    pub fn calls(&self) -> Calls {
        self.calls.get()
    }

    fn bump(&self, f: impl FnOnce(&mut Calls)) {
        let mut c = self.calls.get();
        f(&mut c);
        self.calls.set(c);
    }

    /// What the server would send for `message`.
    pub fn server_sign(message: &[u8]) -> Vec<u8> {
        blake3::keyed_hash(&SERVER_KEY, message).as_bytes().to_vec()
    }

    /// Check a device signature the way a server would.
    pub fn device_signature_valid(message: &[u8], signature: &[u8]) -> bool {
        blake3::keyed_hash(&DEVICE_KEY, message).as_bytes()[..] == *signature
    }
}

impl Capabilities for MacCapabilities {
    fn sign(&self, message: &[u8], sig_out: &mut [u8]) -> Result<usize, CapabilityError> {
        self.bump(|c| c.sign += 1);
        match self.fault {
            Some(Fault::SignFails) => return Err(CapabilityError::new("secure element busy")),
            Some(Fault::SignEmpty) => return Ok(0),
            Some(Fault::SignOverreports) => return Ok(sig_out.len() + 1),
            _ => {}
        }
        let mac = blake3::keyed_hash(&DEVICE_KEY, message);
        sig_out[..32].copy_from_slice(mac.as_bytes());
        Ok(32)
    }

    fn verify_server_ack(
        &self,
        message: &[u8],
        signature: &[u8],
        signer_id: &str,
    ) -> Result<(), CapabilityError> {
        self.bump(|c| c.verify += 1);
        if signer_id != SERVER_ID {
            return Err(CapabilityError::new(format!("untrusted signer {signer_id}")));
        }
        if Self::server_sign(message) != signature {
            return Err(CapabilityError::new("mac mismatch"));
        }
        Ok(())
    }

    fn now_unix_ms(&self) -> u64 {
        self.bump(|c| c.clock += 1);
        self.now
    }

    fn rng(&self, out: &mut [u8]) -> Result<usize, CapabilityError> {
        self.bump(|c| c.rng += 1);
        match self.fault {
            Some(Fault::RngFails) => return Err(CapabilityError::new("entropy pool empty")),
            Some(Fault::RngShort) => return Ok(out.len() / 2),
            _ => {}
        }
        let n = self.next_nonce.get();
        self.next_nonce.set(n.wrapping_add(1));
        out.fill(n);
        Ok(out.len())
    }
}
