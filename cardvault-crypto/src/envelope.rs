//! Record envelopes: seal a [`PlaintextRecord`] into `(nonce, ciphertext)`
//! and open it again.
//!
//! The storage tier only ever sees an [`Envelope`]. Both halves must be kept
//! together; losing either makes the record unrecoverable.

use crate::cipher::{self, EncryptedData, NONCE_SIZE};
use crate::error::CryptoResult;
use crate::key::DerivedKey;
use crate::record::{CardDetails, PlaintextRecord};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Nonce plus ciphertext-with-tag for one record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub nonce: [u8; NONCE_SIZE],
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Opens this envelope with `key`.
    pub fn open(&self, key: &DerivedKey) -> CryptoResult<PlaintextRecord> {
        open(key, &self.nonce, &self.ciphertext)
    }
}

impl From<EncryptedData> for Envelope {
    fn from(data: EncryptedData) -> Self {
        Self {
            nonce: data.nonce,
            ciphertext: data.ciphertext,
        }
    }
}

/// Encrypts `record` under `key` with a fresh random nonce.
pub fn seal(key: &DerivedKey, record: &PlaintextRecord) -> CryptoResult<Envelope> {
    let plaintext = Zeroizing::new(record.to_canonical_bytes()?);
    let encrypted = cipher::encrypt(key, &plaintext)?;
    Ok(encrypted.into())
}

/// Authenticates and decrypts an envelope.
///
/// Any tag mismatch is `AuthenticationFailure` and no plaintext is returned.
/// Authentic bytes that are not a record are `MalformedPayload`.
pub fn open(key: &DerivedKey, nonce: &[u8], ciphertext: &[u8]) -> CryptoResult<PlaintextRecord> {
    let plaintext = Zeroizing::new(cipher::decrypt_parts(key, nonce, ciphertext)?);
    PlaintextRecord::from_canonical_bytes(&plaintext)
}

pub fn seal_card(key: &DerivedKey, card: &CardDetails) -> CryptoResult<Envelope> {
    seal(key, &PlaintextRecord::from(card))
}

pub fn open_card(key: &DerivedKey, nonce: &[u8], ciphertext: &[u8]) -> CryptoResult<CardDetails> {
    let record = open(key, nonce, ciphertext)?;
    CardDetails::try_from(&record)
}

/// Seals arbitrary authentic bytes; used to exercise the schema check.
#[cfg(test)]
pub(crate) fn seal_raw(key: &DerivedKey, bytes: &[u8]) -> CryptoResult<Envelope> {
    Ok(cipher::encrypt(key, bytes)?.into())
}
