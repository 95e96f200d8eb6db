//! Shared fixtures for client integration tests.

#![allow(dead_code)]

use cardvault_client::{ClientConfig, RawCardOut};
use cardvault_crypto::{
    CardDetails, DerivedKey, KdfParams, derive_content_key, derive_login_credential, seal_card,
};
use chrono::{TimeZone, Utc};
use wiremock::{Request, Respond, ResponseTemplate};

pub const KDF_ITERATIONS: u32 = 1_000;

pub fn config(server_uri: String) -> ClientConfig {
    ClientConfig {
        api_base_url: server_uri,
        kdf_iterations: KDF_ITERATIONS,
        session_ttl_secs: 300,
        request_timeout_secs: 5,
    }
}

pub fn key_for(username: &str, password: &str) -> DerivedKey {
    derive_content_key(username, password, &KdfParams::new(KDF_ITERATIONS).unwrap())
}

pub fn login_credential_for(username: &str, password: &str) -> String {
    let params = KdfParams::new(KDF_ITERATIONS).unwrap();
    derive_login_credential(username, password, &params).as_str().to_owned()
}

pub fn test_card() -> CardDetails {
    CardDetails {
        card_number: "4111111111111111".into(),
        holder: Some("A Test".into()),
        exp: Some("12/30".into()),
        cvv: Some("123".into()),
        notes: None,
    }
}

pub fn token_json() -> serde_json::Value {
    serde_json::json!({ "access_token": "tok-1", "token_type": "bearer" })
}

/// A stored card as the server would return it.
pub fn stored_card(
    id: i64,
    label: Option<&str>,
    key: &DerivedKey,
    card: &CardDetails,
) -> RawCardOut {
    let wire = seal_card(key, card).unwrap().to_wire();
    RawCardOut {
        id,
        label: label.map(str::to_string),
        enc_data_b64: wire.enc_data_b64,
        nonce_b64: wire.nonce_b64,
        created_at: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
    }
}

/// Echoes a `POST /cards` body back with an id and timestamp, like the server.
pub struct EchoCard {
    pub id: i64,
}

impl Respond for EchoCard {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        body["id"] = serde_json::json!(self.id);
        body["created_at"] = serde_json::json!("2025-01-02T03:04:05Z");
        ResponseTemplate::new(200).set_body_json(body)
    }
}
