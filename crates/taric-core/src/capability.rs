//! The host capability set.
//!
//! The protocol never signs, verifies, reads a clock or draws randomness on
//! its own. A host supplies one [`Capabilities`] implementation and the
//! protocol calls it; any signer, clock and RNG that satisfies the trait works.

use std::sync::Arc;

use crate::error::CapabilityError;

/// Operations the protocol delegates to the host.
///
/// Concurrent protocol calls are safe exactly when the implementation is safe
/// to invoke concurrently; the protocol adds no locking of its own.
pub trait Capabilities {
    /// Sign `message` with the device key, writing into `sig_out`.
    ///
    /// Returns the number of bytes written. Reporting zero bytes, or more than
    /// `sig_out.len()`, is treated as a signing failure.
    fn sign(&self, message: &[u8], sig_out: &mut [u8]) -> Result<usize, CapabilityError>;

    /// Verify a server signature over `message` for the server `signer_id`.
    ///
    /// Deciding which signer identities are trusted is the host's concern.
    fn verify_server_ack(
        &self,
        message: &[u8],
        signature: &[u8],
        signer_id: &str,
    ) -> Result<(), CapabilityError>;

    /// Current time in milliseconds since the Unix epoch.
    fn now_unix_ms(&self) -> u64;

    /// Fill `out` with random bytes, returning how many were written.
    fn rng(&self, out: &mut [u8]) -> Result<usize, CapabilityError>;
}

impl<C: Capabilities + ?Sized> Capabilities for &C {
    fn sign(&self, message: &[u8], sig_out: &mut [u8]) -> Result<usize, CapabilityError> {
        (**self).sign(message, sig_out)
    }

    fn verify_server_ack(
        &self,
        message: &[u8],
        signature: &[u8],
        signer_id: &str,
    ) -> Result<(), CapabilityError> {
        (**self).verify_server_ack(message, signature, signer_id)
    }

    fn now_unix_ms(&self) -> u64 {
        (**self).now_unix_ms()
    }

    fn rng(&self, out: &mut [u8]) -> Result<usize, CapabilityError> {
        (**self).rng(out)
    }
}

impl<C: Capabilities + ?Sized> Capabilities for Box<C> {
    fn sign(&self, message: &[u8], sig_out: &mut [u8]) -> Result<usize, CapabilityError> {
        (**self).sign(message, sig_out)
    }

    fn verify_server_ack(
        &self,
        message: &[u8],
        signature: &[u8],
        signer_id: &str,
    ) -> Result<(), CapabilityError> {
        (**self).verify_server_ack(message, signature, signer_id)
    }

    fn now_unix_ms(&self) -> u64 {
        (**self).now_unix_ms()
    }

    fn rng(&self, out: &mut [u8]) -> Result<usize, CapabilityError> {
        (**self).rng(out)
    }
}

impl<C: Capabilities + ?Sized> Capabilities for Arc<C> {
    fn sign(&self, message: &[u8], sig_out: &mut [u8]) -> Result<usize, CapabilityError> {
        (**self).sign(message, sig_out)
    }

    fn verify_server_ack(
        &self,
        message: &[u8],
        signature: &[u8],
        signer_id: &str,
    ) -> Result<(), CapabilityError> {
        (**self).verify_server_ack(message, signature, signer_id)
    }

    fn now_unix_ms(&self) -> u64 {
        (**self).now_unix_ms()
    }

    fn rng(&self, out: &mut [u8]) -> Result<usize, CapabilityError> {
        (**self).rng(out)
    }
}
