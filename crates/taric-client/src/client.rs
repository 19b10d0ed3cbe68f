//! The Client: a configured device identity bound to its capabilities.

use taric_core::{
    Ack, AckError, Capabilities, Entry, EntryError, EntryIdentity, FreshnessWindow,
};

use crate::config::ClientConfig;
use crate::error::Result;

/// Builds entries for one device and verifies acks for them.
///
/// Holds no mutable state; a `Client` over thread-safe capabilities can be
/// shared across threads.
pub struct Client<C: Capabilities> {
    config: ClientConfig,
    window: FreshnessWindow,
    caps: C,
}

impl<C: Capabilities> Client<C> {
    /// Create a client. Fails if `config` does not validate.
    pub fn new(config: ClientConfig, caps: C) -> Result<Self> {
        config.validate()?;
        let window = config.freshness_window();
        Ok(Self {
            config,
            window,
            caps,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The device id carried in every entry.
    pub fn device_id(&self) -> &str {
        &self.config.device_id
    }

    /// Get the host capabilities.
    pub fn capabilities(&self) -> &C {
        &self.caps
    }

    /// Build, sign and encode an entry into `out`, returning bytes written.
    pub fn build_signed_entry(
        &self,
        payload: &[u8],
        algo: &str,
        key_id: &str,
        out: &mut [u8],
    ) -> std::result::Result<usize, EntryError> {
        let entry = self.build_entry(payload, algo, key_id)?;
        entry.write_to(out).map_err(|e| {
            tracing::warn!(code = e.code(), "entry not written: {}", e);
            e
        })
    }

    /// Build and sign an entry.
    pub fn build_entry(
        &self,
        payload: &[u8],
        algo: &str,
        key_id: &str,
    ) -> std::result::Result<Entry, EntryError> {
        match taric_core::build_entry(&self.caps, self.device_id(), payload, algo, key_id) {
            Ok(entry) => {
                tracing::debug!(
                    device_id = self.device_id(),
                    key_id,
                    entry_ref = %entry.entry_ref(),
                    "entry built"
                );
                Ok(entry)
            }
            Err(e) => {
                tracing::warn!(code = e.code(), "entry build failed: {}", e);
                Err(e)
            }
        }
    }

    /// Verify an ack against the entry it should acknowledge.
    pub fn verify_ack(
        &self,
        expected: &EntryIdentity,
        ack_bytes: &[u8],
    ) -> std::result::Result<Ack, AckError> {
        match taric_core::verify_ack(&self.caps, &self.window, expected, ack_bytes) {
            Ok(ack) => {
                tracing::debug!(
                    entry_ref = %ack.entry_ref(),
                    signer_id = ack.signer_id(),
                    "ack accepted"
                );
                Ok(ack)
            }
            Err(e) => {
                tracing::warn!(code = e.code(), "ack rejected: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClientError, ConfigError};
    use crate::HostCapabilities;
    use taric_core::Keypair;

    fn caps() -> HostCapabilities {
        HostCapabilities::new(Keypair::from_seed(&[1; 32]))
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = Client::new(ClientConfig::default(), caps());
        assert!(matches!(
            result,
            Err(ClientError::Config(ConfigError::DeviceId(_)))
        ));
    }

    #[test]
    fn test_build_entry_uses_configured_device() {
        let client = Client::new(ClientConfig::new("dev-42"), caps()).unwrap();
        let entry = client.build_entry(b"temp=21.5", "ed25519", "k1").unwrap();
        assert_eq!(entry.device_id(), "dev-42");
        client
            .capabilities()
            .public_key()
            .verify(&entry.signable_bytes(), entry.signature())
            .unwrap();
    }

    #[test]
    fn test_build_signed_entry_small_buffer() {
        let client = Client::new(ClientConfig::new("dev-42"), caps()).unwrap();
        let mut out = [0u8; 16];
        let err = client
            .build_signed_entry(b"temp=21.5", "ed25519", "k1", &mut out)
            .unwrap_err();
        assert_eq!(err.code(), "buffer_too_small");
        assert_eq!(out, [0u8; 16]);
    }
}
