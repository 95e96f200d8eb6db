//! AES-256-GCM over raw bytes.
//!
//! Every call to [`encrypt`] draws a fresh 96-bit nonce from the OS CSPRNG.
//! Nonces are never derived or counted: reuse under one key breaks GCM.

use crate::error::{CryptoError, CryptoResult};
use crate::key::DerivedKey;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::TryRngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

/// Nonce size in bytes (96 bits).
pub const NONCE_SIZE: usize = 12;

/// Authentication tag size in bytes, appended to every ciphertext.
pub const TAG_SIZE: usize = 16;

/// Nonce plus ciphertext-with-tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedData {
    pub nonce: [u8; NONCE_SIZE],
    pub ciphertext: Vec<u8>,
}

fn cipher_for(key: &DerivedKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}

pub(crate) fn random_nonce() -> CryptoResult<[u8; NONCE_SIZE]> {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| CryptoError::Encryption(format!("OS RNG unavailable: {e}")))?;
    Ok(nonce)
}

/// Encrypts `plaintext` under `key` with no associated data.
pub fn encrypt(key: &DerivedKey, plaintext: &[u8]) -> CryptoResult<EncryptedData> {
    let nonce = random_nonce()?;
    let ciphertext = cipher_for(key)
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::Encryption(format!("AES-GCM seal failed: {e}")))?;

    Ok(EncryptedData { nonce, ciphertext })
}

/// Decrypts and authenticates. Any failure is `AuthenticationFailure`.
pub fn decrypt(key: &DerivedKey, data: &EncryptedData) -> CryptoResult<Vec<u8>> {
    decrypt_parts(key, &data.nonce, &data.ciphertext)
}

/// Like [`decrypt`] but takes an unchecked nonce slice, as received off the wire.
pub fn decrypt_parts(key: &DerivedKey, nonce: &[u8], ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    if nonce.len() != NONCE_SIZE || ciphertext.len() < TAG_SIZE {
        return Err(CryptoError::AuthenticationFailure);
    }

    cipher_for(key)
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailure)
}
