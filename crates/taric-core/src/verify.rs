//! Ack verification.
//!
//! Checks run in a fixed order and stop at the first failure:
//! 1. Parse: structure, domain tag, field limits, no trailing bytes
//! 2. Correlate: the ack's entry reference must equal the expected entry's
//! 3. Signature: host verifies the re-encoded signable bytes for `signer_id`
//! 4. Freshness: ack timestamp within the window of the entry timestamp
//!
//! Correlation runs before signature verification: an ack for another entry
//! is rejected as a mismatch even when its signature is genuine.

use crate::ack::Ack;
use crate::capability::Capabilities;
use crate::error::AckError;
use crate::freshness::{EntryIdentity, FreshnessWindow};

/// Verify that `ack_bytes` is a genuine, fresh ack for the entry `expected`.
pub fn verify_ack<C: Capabilities + ?Sized>(
    caps: &C,
    window: &FreshnessWindow,
    expected: &EntryIdentity,
    ack_bytes: &[u8],
) -> Result<Ack, AckError> {
    let ack = Ack::decode(ack_bytes)?;

    let expected_ref = expected.entry_ref();
    if *ack.entry_ref() != expected_ref {
        return Err(AckError::EntryMismatch {
            expected: expected_ref,
            got: *ack.entry_ref(),
        });
    }

    caps.verify_server_ack(&ack.signable_bytes(), ack.signature(), ack.signer_id())
        .map_err(|e| AckError::SignatureInvalid(e.to_string()))?;

    window.check(expected.timestamp(), ack.timestamp())?;

    Ok(ack)
}
