//! Client-side envelope encryption for CardVault.
//!
//! The storage tier only ever receives opaque `(nonce, ciphertext)` pairs.
//! Everything that touches plaintext or keys lives here and runs on the
//! client:
//! - PBKDF2-HMAC-SHA256 for deriving the content key from a password
//! - AES-256-GCM for authenticated encryption of records
//! - Canonical JSON encoding of records, base64 on the wire
//!
//! # Key derivation
//!
//! The content key is derived directly from the password with a per-account
//! salt (see [`Salt::for_account`]). It is never stored: any client that knows
//! the account name and password can re-derive it.
//!
//! The password itself never leaves the client. The storage API is given
//! [`derive_login_credential`] instead: the same password under a separate
//! login salt, so holding the credential does not yield the content key. The
//! password verifier is separate material again, under its own random salt.
//!
//! # Failure semantics
//!
//! `open` either returns the full record or fails. Wrong key, tampered nonce,
//! tampered or truncated ciphertext all surface as the same
//! [`CryptoError::AuthenticationFailure`].

mod cipher;
pub mod envelope;
mod error;
mod key;
pub mod record;
pub mod verifier;
pub mod wire;

pub use cipher::{EncryptedData, NONCE_SIZE, TAG_SIZE, decrypt, decrypt_parts, encrypt};
pub use envelope::{Envelope, open, open_card, seal, seal_card};
pub use error::{CryptoError, CryptoResult};
pub use key::{
    DEFAULT_ITERATIONS, DerivedKey, KEY_SIZE, KdfParams, SALT_SIZE, Salt, derive_key,
    derive_key_material, derive_login_credential, generate_random_key,
};
pub use record::{CardDetails, PlaintextRecord, mask_card_number};
pub use verifier::{PasswordVerifier, make_password_verifier, verify_password};
pub use wire::{WireEnvelope, open_wire};

/// Derives the content key for `account`.
///
/// This is the only path from a password to an encryption key; the client
/// crate and tests go through it so the salt policy stays in one place.
pub fn derive_content_key(account: &str, password: &str, params: &KdfParams) -> DerivedKey {
    derive_key(password, &Salt::for_account(account), params)
}
