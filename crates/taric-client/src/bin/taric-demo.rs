//! Round trip against an in-process reference server.
//!
//! Usage: `taric-demo [config.json]`, built with the `demo` feature. Set
//! `RUST_LOG=debug` to see protocol logging.

use std::sync::Arc;

use anyhow::{bail, Context};
use taric_client::core::crypto::ED25519_ALGO;
use taric_client::core::{AckError, Capabilities, EntryIdentity, Keypair};
use taric_client::{Client, ClientConfig, HostCapabilities};
use taric_server::{AckIssuer, Ed25519AckSigner, InMemoryTrust};
use tracing_subscriber::EnvFilter;

const SERVER_ID: &str = "server-key-1";
const KEY_ID: &str = "k1";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => ClientConfig::from_path(&path)
            .with_context(|| format!("loading config from {path}"))?,
        None => ClientConfig::new("dev-42"),
    };

    let signer = Ed25519AckSigner::new(SERVER_ID, Keypair::generate());
    let caps =
        HostCapabilities::new(Keypair::generate()).trust_server(SERVER_ID, signer.public_key());

    let trust = Arc::new(InMemoryTrust::new());
    trust.insert_ed25519(config.device_id.clone(), KEY_ID, caps.public_key());
    let issuer = AckIssuer::new(trust, Arc::new(signer));

    let client = Client::new(config, caps).context("creating client")?;

    let mut out = [0u8; 1024];
    let n = client.build_signed_entry(b"temp=21.5", ED25519_ALGO, KEY_ID, &mut out)?;
    let wire_entry = &out[..n];
    tracing::info!(bytes = n, "built entry {}", hex::encode(wire_entry));

    let now = client.capabilities().now_unix_ms();
    let ack = issuer.issue(wire_entry, now).context("server rejected entry")?;
    let ack_bytes = ack.encode();

    let identity = EntryIdentity::from_wire_entry(wire_entry)?;
    let verified = client.verify_ack(&identity, &ack_bytes)?;
    tracing::info!(
        entry_ref = %verified.entry_ref(),
        signer_id = verified.signer_id(),
        "ack verified"
    );

    let mut tampered = ack_bytes.clone();
    if let Some(last) = tampered.last_mut() {
        *last ^= 0x01;
    }
    match client.verify_ack(&identity, &tampered) {
        Err(AckError::SignatureInvalid(_)) => tracing::info!("tampered ack rejected"),
        other => bail!("tampered ack was not rejected: {other:?}"),
    }

    Ok(())
}
