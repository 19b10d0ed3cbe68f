//! # TARIC Client
//!
//! The device-facing API for TARIC: configure once, then build signed
//! entries and verify the acks that come back for them.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taric_client::{Client, ClientConfig, HostCapabilities};
//! use taric_client::core::{Keypair, EntryIdentity};
//!
//! fn example(server_key: taric_client::core::Ed25519PublicKey, ack_bytes: &[u8]) {
//!     let caps = HostCapabilities::new(Keypair::generate())
//!         .trust_server("server-key-1", server_key);
//!     let client = Client::new(ClientConfig::new("dev-42"), caps).unwrap();
//!
//!     let mut out = [0u8; 1024];
//!     let n = client
//!         .build_signed_entry(b"temp=21.5", "ed25519", "k1", &mut out)
//!         .unwrap();
//!
//!     // ... send &out[..n] to the server, receive ack_bytes ...
//!
//!     let identity = EntryIdentity::from_wire_entry(&out[..n]).unwrap();
//!     let ack = client.verify_ack(&identity, ack_bytes).unwrap();
//!     println!("acknowledged by {}", ack.signer_id());
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `taric_client::core` - protocol types and operations

pub mod client;
pub mod config;
pub mod error;
pub mod host;

pub use taric_core as core;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{ClientError, ConfigError};
pub use host::HostCapabilities;

pub use taric_core::{Ack, AckError, Entry, EntryError, EntryIdentity, EntryRef};
