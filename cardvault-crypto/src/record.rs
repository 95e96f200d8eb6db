//! Plaintext record model and its canonical byte encoding.
//!
//! A record is a flat mapping of field names to string-or-null values. It is
//! encoded as a JSON object with keys in sorted order; absent optional fields
//! are written as explicit `null` so the exact field set survives a round trip.

use crate::error::{CryptoError, CryptoResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use zeroize::Zeroize;

pub const FIELD_CARD_NUMBER: &str = "card_number";
pub const FIELD_HOLDER: &str = "holder";
pub const FIELD_EXP: &str = "exp";
pub const FIELD_CVV: &str = "cvv";
pub const FIELD_NOTES: &str = "notes";

/// Field name -> value. `None` is an explicit null.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaintextRecord {
    fields: BTreeMap<String, Option<String>>,
}

impl PlaintextRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        self.insert(name, value.map(Into::into));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        self.fields.insert(name.into(), value);
    }

    /// `None` if the field is missing, `Some(None)` if it is an explicit null.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.fields.get(name).map(|v| v.as_deref())
    }

    /// The value of a field, collapsing missing and null.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).flatten()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Canonical encoding: compact JSON, sorted keys, explicit nulls.
    pub fn to_canonical_bytes(&self) -> CryptoResult<Vec<u8>> {
        serde_json::to_vec(&self.fields)
            .map_err(|e| CryptoError::Encryption(format!("record serialization failed: {e}")))
    }

    /// Parses decrypted bytes. Errors never quote the input.
    pub fn from_canonical_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        serde_json::from_slice::<BTreeMap<String, Option<String>>>(bytes)
            .map(|fields| Self { fields })
            .map_err(|e| {
                CryptoError::MalformedPayload(format!(
                    "{:?} error at line {} column {}",
                    e.classify(),
                    e.line(),
                    e.column()
                ))
            })
    }
}

impl std::fmt::Debug for PlaintextRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.fields.keys()).finish()
    }
}

impl Drop for PlaintextRecord {
    fn drop(&mut self) {
        for value in self.fields.values_mut().flatten() {
            value.zeroize();
        }
    }
}

/// Typed view of a payment card record.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    pub card_number: String,
    pub holder: Option<String>,
    pub exp: Option<String>,
    pub cvv: Option<String>,
    pub notes: Option<String>,
}

impl CardDetails {
    /// Masked card number, safe for listings.
    pub fn masked(&self) -> String {
        mask_card_number(&self.card_number)
    }
}

impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetails")
            .field("card_number", &self.masked())
            .field("holder", &self.holder)
            .field("exp", &self.exp)
            .field("cvv", &self.cvv.as_ref().map(|_| "***"))
            .field("notes", &self.notes.as_ref().map(|_| "..."))
            .finish()
    }
}

impl From<&CardDetails> for PlaintextRecord {
    fn from(card: &CardDetails) -> Self {
        let mut record = PlaintextRecord::new();
        record.insert(FIELD_CARD_NUMBER, Some(card.card_number.clone()));
        record.insert(FIELD_HOLDER, card.holder.clone());
        record.insert(FIELD_EXP, card.exp.clone());
        record.insert(FIELD_CVV, card.cvv.clone());
        record.insert(FIELD_NOTES, card.notes.clone());
        record
    }
}

impl TryFrom<&PlaintextRecord> for CardDetails {
    type Error = CryptoError;

    fn try_from(record: &PlaintextRecord) -> CryptoResult<Self> {
        let card_number = record
            .value(FIELD_CARD_NUMBER)
            .ok_or_else(|| CryptoError::MalformedPayload("missing card_number".to_string()))?
            .to_string();

        Ok(Self {
            card_number,
            holder: record.value(FIELD_HOLDER).map(str::to_string),
            exp: record.value(FIELD_EXP).map(str::to_string),
            cvv: record.value(FIELD_CVV).map(str::to_string),
            notes: record.value(FIELD_NOTES).map(str::to_string),
        })
    }
}

/// Masks all but the last four digits. Non-digits are dropped first.
///
/// Only ASCII `0-9` count as digits; other Unicode decimal digits are
/// dropped along with spaces and dashes.
pub fn mask_card_number(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(char::is_ascii_digit).collect();
    if digits.len() <= 4 {
        return "*".repeat(digits.len().max(1));
    }
    let visible: String = digits[digits.len() - 4..].iter().collect();
    format!("{}{visible}", "*".repeat(digits.len() - 4))
}
