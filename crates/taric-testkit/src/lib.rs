//! # TARIC Testkit
//!
//! Testing utilities for TARIC.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known entries and acks with pinned bytes and signatures
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Devices, a reference server and scripted capabilities
//!
//! ## Golden Vectors
//!
//! ```rust
//! use taric_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, entry_ref) in verify_all_vectors() {
//!     assert!(matches, "{name}: {entry_ref}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use taric_testkit::generators::{entry_from_params, EntryParams};
//!
//! proptest! {
//!     #[test]
//!     fn entry_ref_is_deterministic(params: EntryParams) {
//!         let e1 = entry_from_params(&params);
//!         let e2 = entry_from_params(&params);
//!         prop_assert_eq!(e1.entry_ref(), e2.entry_ref());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use taric_testkit::fixtures::{ReferenceServer, TestDevice, T0};
//!
//! let server = ReferenceServer::default();
//! let device = TestDevice::default();
//! server.register(&device);
//!
//! let caps = device.capabilities(&server, T0);
//! let (wire, identity) = device.build(&caps, b"temp=21.5");
//! let ack = server.ack(&wire, T0).unwrap();
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{devices, CallCounts, Fault, ReferenceServer, ScriptedCapabilities, TestDevice};
pub use generators::{entry_from_params, EntryParams};
pub use vectors::{all_vectors, entry_from_vector, verify_all_vectors, GoldenVector};
