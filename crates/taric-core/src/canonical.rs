//! Canonical length-prefixed encoding.
//!
//! Every signed byte string in the protocol is produced by
//! [`CanonicalEncoder`] and parsed back by [`CanonicalReader`]:
//! - A domain tag opens every encoding, written as an ordinary field
//! - Byte and text fields: `u32` big-endian length, then the raw bytes
//! - Integers: `u64` big-endian, always 8 bytes, no prefix
//! - Field order is fixed per encoding; no field is delimited by its content
//!
//! Layouts:
//!
//! ```text
//! entry:      "taric/entry/v1"     device_id key_id algo timestamp nonce payload
//! entry-ref:  "taric/entry-ref/v1" device_id timestamp nonce
//! ack:        "taric/ack/v1"       signer_id entry_ref timestamp
//! ```
//!
//! Wire forms append `u32 length || signature` to the entry and ack encodings.
//!
//! **CRITICAL**: This layout is FROZEN. Changes break all existing signatures.

use crate::error::{DecodeError, EncodingError};

/// Domain tag for entry signable bytes.
pub const ENTRY_DOMAIN: &[u8] = b"taric/entry/v1";

/// Domain tag for the entry reference preimage.
pub const ENTRY_REF_DOMAIN: &[u8] = b"taric/entry-ref/v1";

/// Domain tag for ack signable bytes.
pub const ACK_DOMAIN: &[u8] = b"taric/ack/v1";

/// Width of a length prefix.
pub const LEN_PREFIX: usize = 4;

/// Width of an encoded integer.
pub const U64_LEN: usize = 8;

/// Encoded size of a length-prefixed field holding `value_len` bytes.
pub const fn field_len(value_len: usize) -> usize {
    LEN_PREFIX + value_len
}

/// Size and presence rule for one encoded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, used in errors.
    pub name: &'static str,
    /// Minimum length (0 or 1 for variable fields).
    pub min_len: usize,
    /// Maximum length.
    pub max_len: usize,
}

impl FieldSpec {
    const fn variable(name: &'static str, min_len: usize, max_len: usize) -> Self {
        Self {
            name,
            min_len,
            max_len,
        }
    }

    const fn fixed(name: &'static str, len: usize) -> Self {
        Self {
            name,
            min_len: len,
            max_len: len,
        }
    }

    /// Whether the field has exactly one permitted length.
    pub const fn is_fixed(&self) -> bool {
        self.min_len == self.max_len
    }

    /// Check a value against this field's rule.
    pub fn check(&self, value: &[u8]) -> Result<(), EncodingError> {
        let len = value.len();
        if self.is_fixed() && len != self.max_len {
            return Err(EncodingError::InvalidLength {
                field: self.name,
                expected: self.max_len,
                got: len,
            });
        }
        if len < self.min_len {
            return Err(EncodingError::FieldEmpty { field: self.name });
        }
        if len > self.max_len {
            return Err(EncodingError::FieldTooLong {
                field: self.name,
                len,
                max: self.max_len,
            });
        }
        Ok(())
    }
}

/// Field rules shared by the entry, entry-ref and ack encodings.
pub mod fields {
    use super::FieldSpec;
    use crate::types::{ENTRY_REF_LEN, NONCE_LEN};
    use crate::{
        MAX_ALGO_LEN, MAX_DEVICE_ID_LEN, MAX_KEY_ID_LEN, MAX_PAYLOAD_LEN, MAX_SIGNATURE_LEN,
        MAX_SIGNER_ID_LEN,
    };

    pub const DOMAIN: FieldSpec = FieldSpec::variable("domain", 1, 64);
    pub const DEVICE_ID: FieldSpec = FieldSpec::variable("device_id", 1, MAX_DEVICE_ID_LEN);
    pub const KEY_ID: FieldSpec = FieldSpec::variable("key_id", 1, MAX_KEY_ID_LEN);
    pub const ALGO: FieldSpec = FieldSpec::variable("algo", 1, MAX_ALGO_LEN);
    pub const NONCE: FieldSpec = FieldSpec::fixed("nonce", NONCE_LEN);
    pub const PAYLOAD: FieldSpec = FieldSpec::variable("payload", 0, MAX_PAYLOAD_LEN);
    pub const SIGNATURE: FieldSpec = FieldSpec::variable("signature", 1, MAX_SIGNATURE_LEN);
    pub const SIGNER_ID: FieldSpec = FieldSpec::variable("signer_id", 1, MAX_SIGNER_ID_LEN);
    pub const ENTRY_REF: FieldSpec = FieldSpec::fixed("entry_ref", ENTRY_REF_LEN);
}

/// Writes a canonical encoding.
///
/// Outside this crate fields go through [`checked_field`](Self::checked_field),
/// which enforces a [`FieldSpec`]. Inside, value types that validated on
/// construction encode themselves infallibly.
#[derive(Debug, Default)]
pub struct CanonicalEncoder {
    buf: Vec<u8>,
}

impl CanonicalEncoder {
    /// Start an encoding with the given domain tag.
    pub fn new(domain: &[u8]) -> Self {
        Self::with_capacity(domain, 0)
    }

    /// Start an encoding with room for `capacity` bytes after the domain tag.
    pub fn with_capacity(domain: &[u8], capacity: usize) -> Self {
        let mut encoder = Self {
            buf: Vec::with_capacity(field_len(domain.len()) + capacity),
        };
        encoder.field(domain);
        encoder
    }

    /// Append a length-prefixed field that the caller has already validated.
    pub(crate) fn field(&mut self, value: &[u8]) -> &mut Self {
        debug_assert!(
            u32::try_from(value.len()).is_ok(),
            "field of {} bytes overflows the u32 length prefix",
            value.len()
        );
        // Every FieldSpec maximum is far below u32::MAX.
        let len = u32::try_from(value.len()).unwrap_or(u32::MAX);
        self.buf.extend_from_slice(&len.to_be_bytes());
        self.buf.extend_from_slice(value);
        self
    }

    /// Check `value` against `spec`, then append it as a length-prefixed field.
    ///
    /// Nothing is written when the check fails.
    pub fn checked_field(
        &mut self,
        spec: &FieldSpec,
        value: &[u8],
    ) -> Result<&mut Self, EncodingError> {
        spec.check(value)?;
        Ok(self.field(value))
    }

    /// Append a fixed-width integer.
    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finish and return the encoded bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Reads a canonical encoding from untrusted bytes.
///
/// Every method is bounds-checked and returns a [`DecodeError`] instead of
/// panicking. A declared length is compared against the field maximum before
/// the remaining buffer, so a hostile prefix never drives an allocation.
#[derive(Debug, Clone)]
pub struct CanonicalReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> CanonicalReader<'a> {
    /// Create a reader over `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Read the opening domain tag and require it to equal `expected`.
    pub fn expect_domain(&mut self, expected: &[u8]) -> Result<(), DecodeError> {
        let found = self.bytes(&fields::DOMAIN)?;
        if found != expected {
            return Err(DecodeError::UnknownDomain(
                String::from_utf8_lossy(found).into_owned(),
            ));
        }
        Ok(())
    }

    /// Read a length-prefixed field.
    pub fn bytes(&mut self, spec: &FieldSpec) -> Result<&'a [u8], DecodeError> {
        let prefix = self.take(LEN_PREFIX, spec.name)?;
        let mut len_bytes = [0u8; LEN_PREFIX];
        len_bytes.copy_from_slice(prefix);
        let len = u32::from_be_bytes(len_bytes) as usize;

        if spec.is_fixed() && len != spec.max_len {
            return Err(DecodeError::InvalidLength {
                field: spec.name,
                expected: spec.max_len,
                got: len,
            });
        }
        if len > spec.max_len {
            return Err(DecodeError::FieldTooLong {
                field: spec.name,
                len,
                max: spec.max_len,
            });
        }
        if len < spec.min_len {
            return Err(DecodeError::FieldEmpty { field: spec.name });
        }
        self.take(len, spec.name)
    }

    /// Read a length-prefixed UTF-8 field.
    pub fn text(&mut self, spec: &FieldSpec) -> Result<&'a str, DecodeError> {
        let bytes = self.bytes(spec)?;
        std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { field: spec.name })
    }

    /// Read a fixed-width integer.
    pub fn u64(&mut self, name: &'static str) -> Result<u64, DecodeError> {
        let raw = self.take(U64_LEN, name)?;
        let mut arr = [0u8; U64_LEN];
        arr.copy_from_slice(raw);
        Ok(u64::from_be_bytes(arr))
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Require that the whole buffer was consumed.
    pub fn finish(self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(DecodeError::TrailingBytes(n)),
        }
    }

    fn take(&mut self, n: usize, field: &'static str) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining() {
            return Err(DecodeError::Truncated { field });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_layout_is_big_endian_prefixed() {
        let mut enc = CanonicalEncoder::new(b"d");
        enc.field(b"abc").u64(0x0102_0304_0506_0708);
        let bytes = enc.finish();

        assert_eq!(
            bytes,
            vec![
                0, 0, 0, 1, b'd', // domain
                0, 0, 0, 3, b'a', b'b', b'c', // field
                1, 2, 3, 4, 5, 6, 7, 8, // u64
            ]
        );
    }

    #[test]
    fn test_empty_field_still_has_prefix() {
        let mut enc = CanonicalEncoder::new(b"d");
        enc.field(b"");
        assert_eq!(enc.finish(), vec![0, 0, 0, 1, b'd', 0, 0, 0, 0]);
    }

    #[test]
    fn test_field_boundaries_cannot_shift() {
        // ("ab", "c") and ("a", "bc") concatenate identically without prefixes.
        let mut a = CanonicalEncoder::new(b"d");
        a.field(b"ab").field(b"c");
        let mut b = CanonicalEncoder::new(b"d");
        b.field(b"a").field(b"bc");
        assert_ne!(a.finish(), b.finish());
    }

    #[test]
    fn test_checked_field_enforces_spec() {
        let mut enc = CanonicalEncoder::new(b"d");
        enc.checked_field(&fields::KEY_ID, b"k1").unwrap();
        let written = enc.len();

        assert_eq!(
            enc.checked_field(&fields::KEY_ID, b"").unwrap_err(),
            EncodingError::FieldEmpty { field: "key_id" }
        );
        assert!(matches!(
            enc.checked_field(&fields::ALGO, &[b'a'; 33]),
            Err(EncodingError::FieldTooLong { field: "algo", .. })
        ));
        assert_eq!(enc.len(), written);
        assert_eq!(enc.finish(), vec![0, 0, 0, 1, b'd', 0, 0, 0, 2, b'k', b'1']);
    }

    #[test]
    fn test_spec_check_rules() {
        assert!(fields::DEVICE_ID.check(b"dev-42").is_ok());
        assert_eq!(
            fields::DEVICE_ID.check(b""),
            Err(EncodingError::FieldEmpty { field: "device_id" })
        );
        assert!(matches!(
            fields::ALGO.check(&[b'a'; 33]),
            Err(EncodingError::FieldTooLong { field: "algo", len: 33, max: 32 })
        ));
        assert!(matches!(
            fields::NONCE.check(&[0u8; 15]),
            Err(EncodingError::InvalidLength { field: "nonce", expected: 16, got: 15 })
        ));
        assert!(fields::PAYLOAD.check(b"").is_ok());
    }

    #[test]
    fn test_reader_reads_back_encoder_output() {
        let mut enc = CanonicalEncoder::new(ACK_DOMAIN);
        enc.field(b"server-1").u64(42);
        let bytes = enc.finish();

        let mut r = CanonicalReader::new(&bytes);
        r.expect_domain(ACK_DOMAIN).unwrap();
        assert_eq!(r.text(&fields::SIGNER_ID).unwrap(), "server-1");
        assert_eq!(r.u64("timestamp").unwrap(), 42);
        r.finish().unwrap();
    }

    #[test]
    fn test_reader_rejects_wrong_domain() {
        let bytes = CanonicalEncoder::new(ENTRY_DOMAIN).finish();
        let mut r = CanonicalReader::new(&bytes);
        assert!(matches!(
            r.expect_domain(ACK_DOMAIN),
            Err(DecodeError::UnknownDomain(tag)) if tag == "taric/entry/v1"
        ));
    }

    #[test]
    fn test_reader_checks_max_before_remaining() {
        // Declares 4 GiB; must fail on the limit, not try to read.
        let bytes = [0xff, 0xff, 0xff, 0xff, 0x00];
        let mut r = CanonicalReader::new(&bytes);
        assert!(matches!(
            r.bytes(&fields::PAYLOAD),
            Err(DecodeError::FieldTooLong { field: "payload", .. })
        ));
    }

    #[test]
    fn test_reader_truncated_prefix_and_body() {
        let mut r = CanonicalReader::new(&[0, 0]);
        assert_eq!(
            r.bytes(&fields::SIGNER_ID),
            Err(DecodeError::Truncated { field: "signer_id" })
        );

        let mut r = CanonicalReader::new(&[0, 0, 0, 5, b'a']);
        assert_eq!(
            r.bytes(&fields::SIGNER_ID),
            Err(DecodeError::Truncated { field: "signer_id" })
        );
    }

    #[test]
    fn test_reader_rejects_bad_utf8_and_trailing() {
        let mut r = CanonicalReader::new(&[0, 0, 0, 1, 0xff]);
        assert_eq!(
            r.text(&fields::SIGNER_ID),
            Err(DecodeError::InvalidUtf8 { field: "signer_id" })
        );

        let r = CanonicalReader::new(&[1, 2, 3]);
        assert_eq!(r.finish(), Err(DecodeError::TrailingBytes(3)));
    }

    #[test]
    fn test_reader_fixed_length_mismatch() {
        let mut r = CanonicalReader::new(&[0, 0, 0, 2, 1, 2]);
        assert_eq!(
            r.bytes(&fields::NONCE),
            Err(DecodeError::InvalidLength {
                field: "nonce",
                expected: 16,
                got: 2
            })
        );
    }
}
