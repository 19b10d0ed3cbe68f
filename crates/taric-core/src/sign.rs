//! Building signed entries.
//!
//! Order of operations, each capability invoked at most once:
//! 1. Check caller fields (no capability is touched on failure)
//! 2. Clock, then RNG
//! 3. Canonical encode
//! 4. Host sign
//! 5. Write the wire form, or report `BufferTooSmall` without writing

use bytes::Bytes;

use crate::capability::Capabilities;
use crate::entry::{check_inputs, Entry, EntryFields};
use crate::error::EntryError;
use crate::freshness::Freshness;
use crate::MAX_SIGNATURE_LEN;

/// Build and sign an entry, returning it as a value.
pub fn build_entry<C: Capabilities + ?Sized>(
    caps: &C,
    device_id: &str,
    payload: &[u8],
    algo: &str,
    key_id: &str,
) -> Result<Entry, EntryError> {
    check_inputs(device_id, key_id, algo, payload)?;

    let freshness = Freshness::sample(caps)?;
    let fields = EntryFields {
        device_id: device_id.to_owned(),
        key_id: key_id.to_owned(),
        algo: algo.to_owned(),
        timestamp: freshness.timestamp,
        nonce: freshness.nonce,
        payload: Bytes::copy_from_slice(payload),
    };
    let signable = fields.encode_unchecked();

    let mut scratch = [0u8; MAX_SIGNATURE_LEN];
    let written = caps
        .sign(&signable, &mut scratch)
        .map_err(|e| EntryError::Signing(e.to_string()))?;
    let signature = match written {
        0 => return Err(EntryError::Signing("signer produced no output".into())),
        n if n > scratch.len() => {
            return Err(EntryError::Signing(format!(
                "signer reported {n} bytes into a {}-byte buffer",
                scratch.len()
            )))
        }
        n => Bytes::copy_from_slice(&scratch[..n]),
    };

    Ok(Entry::from_validated(fields, signature))
}

/// Build, sign and encode an entry into `out`, returning bytes written.
///
/// `out` is untouched on every error.
pub fn build_signed_entry<C: Capabilities + ?Sized>(
    caps: &C,
    device_id: &str,
    payload: &[u8],
    algo: &str,
    key_id: &str,
    out: &mut [u8],
) -> Result<usize, EntryError> {
    let entry = build_entry(caps, device_id, payload, algo, key_id)?;
    entry.write_to(out)
}
