//! Client error types.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur talking to the storage API or running the vault.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("API request failed: {0}")]
    Api(String),

    #[error("authentication required")]
    AuthRequired,

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("crypto error: {0}")]
    Crypto(#[from] cardvault_crypto::CryptoError),

    #[error("background task failed: {0}")]
    Task(String),
}

impl ClientError {
    /// True if the caller should re-prompt for the password.
    pub fn is_cannot_decrypt(&self) -> bool {
        matches!(self, ClientError::Crypto(e) if e.is_authentication_failure())
    }
}
