//! Wire and view types shared by the API client and the vault.

use cardvault_crypto::{CardDetails, WireEnvelope};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Bearer token issued by the storage API.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Body of `POST /cards`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCardIn {
    pub label: Option<String>,
    pub enc_data_b64: String,
    pub nonce_b64: String,
}

impl RawCardIn {
    pub fn new(label: Option<String>, wire: WireEnvelope) -> Self {
        Self {
            label,
            enc_data_b64: wire.enc_data_b64,
            nonce_b64: wire.nonce_b64,
        }
    }
}

/// A stored card as returned by the API. Only `label` is plaintext.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCardOut {
    pub id: i64,
    pub label: Option<String>,
    pub enc_data_b64: String,
    pub nonce_b64: String,
    #[serde(deserialize_with = "utc_or_naive")]
    pub created_at: DateTime<Utc>,
}

/// Accepts RFC 3339 timestamps and offset-less ones, which are taken as UTC.
fn utc_or_naive<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(de)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

impl RawCardOut {
    pub fn wire(&self) -> WireEnvelope {
        WireEnvelope {
            nonce_b64: self.nonce_b64.clone(),
            enc_data_b64: self.enc_data_b64.clone(),
        }
    }
}

/// Placeholder shown for a record that fails to decrypt.
pub const CANNOT_DECRYPT: &str = "(cannot decrypt)";

/// Listing entry: masked number, never the full card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSummary {
    pub id: i64,
    pub label: Option<String>,
    pub masked: String,
    pub holder: Option<String>,
    pub exp: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CardSummary {
    pub fn from_card(raw: &RawCardOut, card: &CardDetails) -> Self {
        Self {
            id: raw.id,
            label: raw.label.clone(),
            masked: card.masked(),
            holder: card.holder.clone(),
            exp: card.exp.clone(),
            created_at: raw.created_at,
        }
    }

    pub fn undecryptable(raw: &RawCardOut) -> Self {
        Self {
            id: raw.id,
            label: raw.label.clone(),
            masked: CANNOT_DECRYPT.to_string(),
            holder: None,
            exp: None,
            created_at: raw.created_at,
        }
    }

    pub fn is_decrypted(&self) -> bool {
        self.masked != CANNOT_DECRYPT
    }
}

/// Full plaintext of one card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecryptedCard {
    pub id: i64,
    pub label: Option<String>,
    pub card: CardDetails,
    pub created_at: DateTime<Utc>,
}
