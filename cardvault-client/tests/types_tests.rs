use cardvault_client::*;
use cardvault_crypto::CardDetails;
use chrono::{TimeZone, Utc};

fn raw(id: i64) -> RawCardOut {
    RawCardOut {
        id,
        label: Some("travel".into()),
        enc_data_b64: "ZW5j".into(),
        nonce_b64: "bm9uY2Vub25jZQ==".into(),
        created_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
    }
}

// --- Wire shapes ---

#[test]
fn raw_card_out_parses_naive_server_timestamp_as_utc() {
    let json = r#"{
        "id": 3,
        "label": null,
        "enc_data_b64": "ZW5j",
        "nonce_b64": "bm9uY2Vub25jZQ==",
        "created_at": "2025-06-01T12:00:00.123456"
    }"#;
    let card: RawCardOut = serde_json::from_str(json).unwrap();
    assert_eq!(card.id, 3);
    assert_eq!(card.label, None);
    assert_eq!(
        card.created_at.timestamp(),
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap().timestamp()
    );
}

#[test]
fn raw_card_out_round_trips_rfc3339() {
    let card = raw(1);
    let back: RawCardOut = serde_json::from_str(&serde_json::to_string(&card).unwrap()).unwrap();
    assert_eq!(back, card);
}

#[test]
fn raw_card_out_rejects_garbage_timestamp() {
    let json = r#"{"id":1,"label":null,"enc_data_b64":"","nonce_b64":"","created_at":"yesterday"}"#;
    assert!(serde_json::from_str::<RawCardOut>(json).is_err());
}

#[test]
fn raw_card_in_serializes_exactly_three_fields() {
    let body = RawCardIn {
        label: None,
        enc_data_b64: "a".into(),
        nonce_b64: "b".into(),
    };
    let value = serde_json::to_value(&body).unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.len(), 3);
    assert!(obj["label"].is_null());
}

#[test]
fn raw_card_exposes_wire_envelope() {
    let wire = raw(1).wire();
    assert_eq!(wire.enc_data_b64, "ZW5j");
    assert_eq!(wire.nonce_b64, "bm9uY2Vub25jZQ==");
}

#[test]
fn auth_token_debug_is_redacted() {
    let token = AuthToken {
        access_token: "eyJsecret".into(),
        token_type: "bearer".into(),
    };
    assert!(!format!("{token:?}").contains("eyJsecret"));
}

// --- Summaries ---

#[test]
fn summary_masks_number() {
    let card = CardDetails {
        card_number: "5500 0000 0000 0004".into(),
        holder: Some("B".into()),
        exp: None,
        cvv: Some("999".into()),
        notes: None,
    };
    let summary = CardSummary::from_card(&raw(2), &card);
    assert_eq!(summary.masked, "************0004");
    assert_eq!(summary.holder.as_deref(), Some("B"));
    assert!(summary.is_decrypted());
    assert!(!serde_json::to_string(&summary).unwrap().contains("999"));
}

#[test]
fn undecryptable_summary_keeps_plaintext_metadata_only() {
    let summary = CardSummary::undecryptable(&raw(4));
    assert_eq!(summary.id, 4);
    assert_eq!(summary.label.as_deref(), Some("travel"));
    assert_eq!(summary.masked, CANNOT_DECRYPT);
    assert!(!summary.is_decrypted());
}
