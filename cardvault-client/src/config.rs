//! Client configuration.

use crate::error::{ClientError, ClientResult};
use cardvault_crypto::{DEFAULT_ITERATIONS, KdfParams};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const ENV_API_BASE_URL: &str = "CARDVAULT_API_BASE_URL";
pub const ENV_KDF_ITERATIONS: &str = "CARDVAULT_KDF_ITERATIONS";
pub const ENV_SESSION_TTL_SECS: &str = "CARDVAULT_SESSION_TTL_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "CARDVAULT_REQUEST_TIMEOUT_SECS";

/// Configuration for the storage client and card vault.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the storage API (e.g., "http://localhost:8000").
    pub api_base_url: String,

    /// PBKDF2 iterations for the content key. Every client of an account must agree.
    pub kdf_iterations: u32,

    /// How long a logged-in session (token + derived key) stays usable.
    pub session_ttl_secs: i64,

    /// HTTP request timeout.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            kdf_iterations: DEFAULT_ITERATIONS,
            session_ttl_secs: 60 * 60, // 1 hour
            request_timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `CARDVAULT_*` environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_BASE_URL) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup(ENV_KDF_ITERATIONS) {
            config.kdf_iterations = parse(ENV_KDF_ITERATIONS, &v)?;
        }
        if let Some(v) = lookup(ENV_SESSION_TTL_SECS) {
            config.session_ttl_secs = parse(ENV_SESSION_TTL_SECS, &v)?;
        }
        if let Some(v) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout_secs = parse(ENV_REQUEST_TIMEOUT_SECS, &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ClientResult<()> {
        if self.api_base_url.is_empty() {
            return Err(ClientError::Config("api_base_url is empty".to_string()));
        }
        if self.session_ttl_secs <= 0 {
            return Err(ClientError::Config(
                "session_ttl_secs must be positive".to_string(),
            ));
        }
        self.kdf_params()?;
        Ok(())
    }

    pub fn kdf_params(&self) -> ClientResult<KdfParams> {
        KdfParams::new(self.kdf_iterations)
            .map_err(|e| ClientError::Config(format!("kdf_iterations: {e}")))
    }
}

fn parse<T: FromStr>(name: &str, value: &str) -> ClientResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ClientError::Config(format!("{name}={value:?}: {e}")))
}
