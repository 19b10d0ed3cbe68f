//! # TARIC Server
//!
//! A reference ack issuer. It accepts a wire entry, checks it against a
//! device trust source, and returns an ack signed with the server key.
//!
//! Device clients use the issuer in tests and demos to exercise
//! [`taric_core::verify_ack`] against real acks; production deployments plug
//! their own [`DeviceTrust`] and [`AckSigner`] behind the same [`AckIssuer`].

pub mod error;
pub mod issuer;
pub mod signer;
pub mod traits;
pub mod trust;

pub use error::IssueError;
pub use issuer::AckIssuer;
pub use signer::Ed25519AckSigner;
pub use traits::{AckSigner, DeviceKey, DeviceTrust};
pub use trust::InMemoryTrust;
