//! Ack: the server's signed acknowledgement of one entry.

use bytes::Bytes;

use crate::canonical::{field_len, fields, CanonicalEncoder, CanonicalReader, ACK_DOMAIN, U64_LEN};
use crate::error::{DecodeError, EncodingError};
use crate::types::{EntryRef, ENTRY_REF_LEN};

/// The signed fields of an ack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckFields {
    /// Identifies the server key that signed the ack.
    pub signer_id: String,
    /// Reference to the acknowledged entry.
    pub entry_ref: EntryRef,
    /// Server time of acknowledgement, milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl AckFields {
    /// Check the signer id against its field rule.
    pub fn validate(&self) -> Result<(), EncodingError> {
        fields::SIGNER_ID.check(self.signer_id.as_bytes())
    }

    /// Canonical signable bytes.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, EncodingError> {
        self.validate()?;
        Ok(self.encode_unchecked())
    }

    fn body_len(&self) -> usize {
        field_len(self.signer_id.len()) + field_len(ENTRY_REF_LEN) + U64_LEN
    }

    pub(crate) fn encode_unchecked(&self) -> Vec<u8> {
        let mut enc = CanonicalEncoder::with_capacity(ACK_DOMAIN, self.body_len());
        enc.field(self.signer_id.as_bytes())
            .field(self.entry_ref.as_bytes())
            .u64(self.timestamp);
        enc.finish()
    }
}

/// A signed ack as received from, or produced by, a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    fields: AckFields,
    signature: Bytes,
}

impl Ack {
    /// Assemble an ack from fields and the server's signature over them.
    pub fn assemble(fields: AckFields, signature: impl Into<Bytes>) -> Result<Self, EncodingError> {
        let signature = signature.into();
        fields.validate()?;
        fields::SIGNATURE.check(&signature)?;
        Ok(Self { fields, signature })
    }

    /// The server key that signed the ack.
    pub fn signer_id(&self) -> &str {
        &self.fields.signer_id
    }

    /// Reference of the acknowledged entry.
    pub fn entry_ref(&self) -> &EntryRef {
        &self.fields.entry_ref
    }

    /// Server time of acknowledgement.
    pub fn timestamp(&self) -> u64 {
        self.fields.timestamp
    }

    /// Get the raw signature bytes.
    pub fn signature(&self) -> &Bytes {
        &self.signature
    }

    /// All signed fields.
    pub fn fields(&self) -> &AckFields {
        &self.fields
    }

    /// The exact bytes the server signature covers.
    pub fn signable_bytes(&self) -> Vec<u8> {
        self.fields.encode_unchecked()
    }

    /// Size of the wire form in bytes.
    pub fn encoded_len(&self) -> usize {
        field_len(ACK_DOMAIN.len()) + self.fields.body_len() + field_len(self.signature.len())
    }

    /// Wire form: signable bytes followed by the length-prefixed signature.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.extend_from_slice(&self.signable_bytes());
        let mut tail = CanonicalEncoder::default();
        tail.field(&self.signature);
        buf.extend_from_slice(&tail.finish());
        buf
    }

    /// Parse a wire ack from untrusted bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = CanonicalReader::new(bytes);
        r.expect_domain(ACK_DOMAIN)?;
        let signer_id = r.text(&fields::SIGNER_ID)?.to_owned();
        let raw_ref = r.bytes(&fields::ENTRY_REF)?;
        let entry_ref = EntryRef::try_from(raw_ref).map_err(|_| DecodeError::InvalidLength {
            field: "entry_ref",
            expected: ENTRY_REF_LEN,
            got: raw_ref.len(),
        })?;
        let timestamp = r.u64("timestamp")?;
        let signature = Bytes::copy_from_slice(r.bytes(&fields::SIGNATURE)?);
        r.finish()?;

        Ok(Self {
            fields: AckFields {
                signer_id,
                entry_ref,
                timestamp,
            },
            signature,
        })
    }
}
