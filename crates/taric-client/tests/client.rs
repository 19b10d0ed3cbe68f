//! Client against the reference server, with real Ed25519 keys and clock.

use std::io::Write;
use std::sync::Arc;

use taric_client::core::{AckError, EntryIdentity, Keypair};
use taric_client::{Client, ClientConfig, ConfigError, HostCapabilities};
use taric_server::{AckIssuer, Ed25519AckSigner, InMemoryTrust};

struct World {
    client: Client<HostCapabilities>,
    issuer: AckIssuer,
}

fn world(config: ClientConfig) -> World {
    let signer = Ed25519AckSigner::from_secret_key("server-key-1", [0x53; 32]);
    let caps = HostCapabilities::new(Keypair::from_seed(&[0x42; 32]))
        .trust_server("server-key-1", signer.public_key());

    let trust = Arc::new(InMemoryTrust::new());
    trust.insert_ed25519(config.device_id.clone(), "k1", caps.public_key());

    World {
        client: Client::new(config, caps).unwrap(),
        issuer: AckIssuer::new(trust, Arc::new(signer)),
    }
}

fn build(w: &World) -> (Vec<u8>, EntryIdentity) {
    let mut out = [0u8; 1024];
    let n = w
        .client
        .build_signed_entry(b"temp=21.5", "ed25519", "k1", &mut out)
        .unwrap();
    let wire = out[..n].to_vec();
    let identity = EntryIdentity::from_wire_entry(&wire).unwrap();
    (wire, identity)
}

#[test]
fn test_round_trip_with_reference_server() {
    let w = world(ClientConfig::new("dev-42"));
    let (wire, identity) = build(&w);

    let ack = w.issuer.issue(&wire, identity.timestamp() + 120).unwrap();
    let verified = w.client.verify_ack(&identity, &ack.encode()).unwrap();

    assert_eq!(verified, ack);
    assert_eq!(verified.entry_ref(), &identity.entry_ref());
}

#[test]
fn test_ack_from_unknown_server_key() {
    let w = world(ClientConfig::new("dev-42"));
    let (wire, identity) = build(&w);

    let rogue = AckIssuer::new(
        Arc::new({
            let trust = InMemoryTrust::new();
            trust.insert_ed25519("dev-42", "k1", w.client.capabilities().public_key());
            trust
        }),
        Arc::new(Ed25519AckSigner::from_secret_key("server-key-1", [0x99; 32])),
    );
    let ack = rogue.issue(&wire, identity.timestamp()).unwrap();

    assert!(matches!(
        w.client.verify_ack(&identity, &ack.encode()),
        Err(AckError::SignatureInvalid(_))
    ));
}

#[test]
fn test_ack_for_earlier_entry_is_rejected() {
    let w = world(ClientConfig::new("dev-42"));
    let (first_wire, first_identity) = build(&w);
    let (_, second_identity) = build(&w);

    let ack = w.issuer.issue(&first_wire, first_identity.timestamp()).unwrap();
    let err = w
        .client
        .verify_ack(&second_identity, &ack.encode())
        .unwrap_err();
    assert_eq!(err.code(), "entry_mismatch");
}

#[test]
fn test_configured_tolerance_applies() {
    let mut config = ClientConfig::new("dev-42");
    config.ack_freshness_ms = Some(1_000);
    let w = world(config);
    let (wire, identity) = build(&w);

    let late = w.issuer.issue(&wire, identity.timestamp() + 1_001).unwrap();
    assert!(matches!(
        w.client.verify_ack(&identity, &late.encode()),
        Err(AckError::Stale { tolerance_ms: 1_000, .. })
    ));

    let on_time = w.issuer.issue(&wire, identity.timestamp() + 1_000).unwrap();
    assert!(w.client.verify_ack(&identity, &on_time.encode()).is_ok());
}

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "device_id": "dev-7", "ack_freshness_ms": 60000 }}"#).unwrap();

    let config = ClientConfig::from_path(file.path()).unwrap();
    assert_eq!(config.device_id, "dev-7");
    assert_eq!(config.ack_freshness_ms, Some(60_000));
}

#[test]
fn test_config_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    assert!(matches!(
        ClientConfig::from_path(&missing),
        Err(ConfigError::Io { path, .. }) if path == missing
    ));
}
