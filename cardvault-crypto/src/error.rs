//! Error types for the envelope encryption layer.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors produced by key derivation and the envelope codec.
///
/// `AuthenticationFailure` deliberately carries no detail: a wrong key, a
/// corrupted nonce, a truncated ciphertext and a forged tag all look the same
/// to the caller.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Invalid KDF parameters. A programming error, not a user-facing one.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("cannot decrypt: authentication failed")]
    AuthenticationFailure,

    /// Decrypted bytes did not match the record schema. Never contains plaintext.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("invalid encoding: {0}")]
    Encoding(String),

    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },
}

impl CryptoError {
    /// True for failures where the user should be asked to re-enter the password.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, CryptoError::AuthenticationFailure)
    }
}
