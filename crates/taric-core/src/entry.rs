//! Entry: a signed, immutable record of a device event.
//!
//! The signature covers the canonical encoding of every other field. Fields
//! are private and there are no setters; a changed entry is a new entry.

use bytes::Bytes;

use crate::canonical::{
    field_len, fields, CanonicalEncoder, CanonicalReader, ENTRY_DOMAIN, U64_LEN,
};
use crate::error::{DecodeError, EncodingError, EntryError};
use crate::freshness::EntryIdentity;
use crate::types::{EntryRef, Nonce, NONCE_LEN};

/// Check the caller-supplied entry fields.
pub(crate) fn check_inputs(
    device_id: &str,
    key_id: &str,
    algo: &str,
    payload: &[u8],
) -> Result<(), EncodingError> {
    fields::DEVICE_ID.check(device_id.as_bytes())?;
    fields::KEY_ID.check(key_id.as_bytes())?;
    fields::ALGO.check(algo.as_bytes())?;
    fields::PAYLOAD.check(payload)?;
    Ok(())
}

/// The logical fields of an entry: everything the signature covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFields {
    pub device_id: String,
    pub key_id: String,
    pub algo: String,
    pub timestamp: u64,
    pub nonce: Nonce,
    pub payload: Bytes,
}

impl EntryFields {
    /// Check every field against its rule.
    pub fn validate(&self) -> Result<(), EncodingError> {
        check_inputs(&self.device_id, &self.key_id, &self.algo, &self.payload)
    }

    /// Canonical signable bytes. Fails if any field breaks its rule.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, EncodingError> {
        self.validate()?;
        Ok(self.encode_unchecked())
    }

    fn body_len(&self) -> usize {
        field_len(self.device_id.len())
            + field_len(self.key_id.len())
            + field_len(self.algo.len())
            + U64_LEN
            + field_len(NONCE_LEN)
            + field_len(self.payload.len())
    }

    /// Encode without validating; callers have already validated.
    pub(crate) fn encode_unchecked(&self) -> Vec<u8> {
        let mut enc = CanonicalEncoder::with_capacity(ENTRY_DOMAIN, self.body_len());
        enc.field(self.device_id.as_bytes())
            .field(self.key_id.as_bytes())
            .field(self.algo.as_bytes())
            .u64(self.timestamp)
            .field(self.nonce.as_bytes())
            .field(&self.payload);
        enc.finish()
    }
}

/// A complete signed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    fields: EntryFields,
    signature: Bytes,
}

impl Entry {
    /// Assemble an entry from fields and a signature produced over them.
    ///
    /// Only structure is checked here; whether the signature is valid is for
    /// whoever holds the device's verifying key.
    pub fn assemble(fields: EntryFields, signature: impl Into<Bytes>) -> Result<Self, EncodingError> {
        let signature = signature.into();
        fields.validate()?;
        fields::SIGNATURE.check(&signature)?;
        Ok(Self { fields, signature })
    }

    /// Both parts have already been validated.
    pub(crate) fn from_validated(fields: EntryFields, signature: Bytes) -> Self {
        Self { fields, signature }
    }

    /// The device that produced the entry.
    pub fn device_id(&self) -> &str {
        &self.fields.device_id
    }

    /// Which of the device's keys signed the entry.
    pub fn key_id(&self) -> &str {
        &self.fields.key_id
    }

    /// Signature algorithm name.
    pub fn algo(&self) -> &str {
        &self.fields.algo
    }

    /// Device time at construction, milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> u64 {
        self.fields.timestamp
    }

    /// Get the nonce.
    pub fn nonce(&self) -> &Nonce {
        &self.fields.nonce
    }

    /// Get the opaque payload.
    pub fn payload(&self) -> &Bytes {
        &self.fields.payload
    }

    /// Get the raw signature bytes.
    pub fn signature(&self) -> &Bytes {
        &self.signature
    }

    /// All signed fields.
    pub fn fields(&self) -> &EntryFields {
        &self.fields
    }

    /// The exact bytes the signature covers.
    pub fn signable_bytes(&self) -> Vec<u8> {
        self.fields.encode_unchecked()
    }

    /// The identifying subset used to correlate acks.
    pub fn identity(&self) -> EntryIdentity {
        EntryIdentity::from_validated(
            self.fields.device_id.clone(),
            self.fields.timestamp,
            self.fields.nonce,
        )
    }

    /// Reference an ack for this entry must carry.
    pub fn entry_ref(&self) -> EntryRef {
        self.identity().entry_ref()
    }

    /// Size of the wire form in bytes.
    pub fn encoded_len(&self) -> usize {
        field_len(ENTRY_DOMAIN.len()) + self.fields.body_len() + field_len(self.signature.len())
    }

    /// Wire form: signable bytes followed by the length-prefixed signature.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = self.signable_bytes();
        let mut tail = CanonicalEncoder::default();
        tail.field(&self.signature);
        buf.extend_from_slice(&tail.finish());
        buf
    }

    /// Write the wire form into caller-owned storage.
    ///
    /// On `BufferTooSmall` nothing is written.
    pub fn write_to(&self, out: &mut [u8]) -> Result<usize, EntryError> {
        let needed = self.encoded_len();
        if out.len() < needed {
            return Err(EntryError::BufferTooSmall {
                needed,
                capacity: out.len(),
            });
        }
        out[..needed].copy_from_slice(&self.encode());
        Ok(needed)
    }

    /// Parse a wire entry from untrusted bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = CanonicalReader::new(bytes);
        r.expect_domain(ENTRY_DOMAIN)?;
        let device_id = r.text(&fields::DEVICE_ID)?.to_owned();
        let key_id = r.text(&fields::KEY_ID)?.to_owned();
        let algo = r.text(&fields::ALGO)?.to_owned();
        let timestamp = r.u64("timestamp")?;
        let nonce = read_nonce(&mut r)?;
        let payload = Bytes::copy_from_slice(r.bytes(&fields::PAYLOAD)?);
        let signature = Bytes::copy_from_slice(r.bytes(&fields::SIGNATURE)?);
        r.finish()?;

        Ok(Self::from_validated(
            EntryFields {
                device_id,
                key_id,
                algo,
                timestamp,
                nonce,
                payload,
            },
            signature,
        ))
    }
}

impl EntryIdentity {
    /// Read only the identifying fields out of a wire entry.
    ///
    /// The whole entry must still be well formed.
    pub fn from_wire_entry(bytes: &[u8]) -> Result<Self, DecodeError> {
        Entry::decode(bytes).map(|e| e.identity())
    }
}

fn read_nonce(r: &mut CanonicalReader<'_>) -> Result<Nonce, DecodeError> {
    let raw = r.bytes(&fields::NONCE)?;
    Nonce::try_from(raw).map_err(|_| DecodeError::InvalidLength {
        field: "nonce",
        expected: NONCE_LEN,
        got: raw.len(),
    })
}
