//! Client side of CardVault.
//!
//! Composes the envelope encryption core with the storage API:
//! - HTTP client for the card storage endpoints
//! - Explicit per-owner sessions with expiry (token + derived key)
//! - `CardVault` facade: login, add, list, get and delete cards

pub mod api_client;
pub mod config;
pub mod error;
pub mod session;
pub mod types;
pub mod vault;

pub use api_client::StorageApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use session::{InMemorySessionStore, Session, SessionStore};
pub use types::*;
pub use vault::CardVault;

/// Installs a stderr `tracing` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_tracing_can_run_twice() {
        super::init_tracing();
        super::init_tracing();
        tracing::info!("tracing initialised");
    }
}
