//! Card vault: derives keys, seals cards, and talks to the storage API.
//!
//! The storage API authenticates the owner with a bearer token obtained with
//! a login credential derived from the password. Decrypting is a separate
//! matter that depends only on the content key held in the owner's
//! [`Session`], which the server cannot compute from that credential.

use crate::api_client::StorageApiClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::{InMemorySessionStore, Session, SessionStore};
use crate::types::{CardSummary, DecryptedCard, RawCardIn, RawCardOut};
use cardvault_crypto::{
    CardDetails, DerivedKey, KdfParams, derive_content_key, derive_login_credential, open_wire,
    seal_card,
};
use chrono::Duration;
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Both halves derived from one password.
struct AccountKeys {
    credential: Zeroizing<String>,
    content: DerivedKey,
}

/// High-level card operations for logged-in owners.
pub struct CardVault<S = InMemorySessionStore> {
    api: StorageApiClient,
    sessions: S,
    kdf: KdfParams,
    session_ttl: Duration,
}

impl CardVault<InMemorySessionStore> {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Self::with_store(config, InMemorySessionStore::new())
    }
}

impl<S: SessionStore> CardVault<S> {
    pub fn with_store(config: &ClientConfig, sessions: S) -> ClientResult<Self> {
        config.validate()?;
        Ok(Self {
            api: StorageApiClient::new(config)?,
            sessions,
            kdf: config.kdf_params()?,
            session_ttl: Duration::seconds(config.session_ttl_secs),
        })
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    /// Logs `owner` in: derives the keys, then obtains a token.
    ///
    /// The API only sees the login credential, never `password`. Derivation
    /// runs on the blocking pool so it does not stall other tasks.
    pub async fn login(&self, owner: &str, username: &str, password: &str) -> ClientResult<()> {
        let keys = self.derive_off_thread(username, password).await?;
        let token = self.api.login(username, &keys.credential).await?;
        self.open_session(owner, token.access_token, keys.content).await;
        debug!("owner {owner} logged in");
        Ok(())
    }

    /// Registers a new account and logs `owner` in with it.
    pub async fn register(&self, owner: &str, username: &str, password: &str) -> ClientResult<()> {
        let keys = self.derive_off_thread(username, password).await?;
        let token = self.api.register(username, &keys.credential).await?;
        self.open_session(owner, token.access_token, keys.content).await;
        debug!("owner {owner} registered");
        Ok(())
    }

    pub async fn logout(&self, owner: &str) -> bool {
        self.sessions.remove(owner).await.is_some()
    }

    /// Stores the new session and drops every expired one.
    async fn open_session(&self, owner: &str, token: String, key: DerivedKey) {
        let purged = self.sessions.purge_expired().await;
        if purged > 0 {
            debug!("purged {purged} expired sessions");
        }
        self.sessions
            .insert(Session::new(owner.to_string(), token, key, self.session_ttl))
            .await;
    }

    async fn derive_off_thread(&self, username: &str, password: &str) -> ClientResult<AccountKeys> {
        let account = username.to_string();
        let secret = Zeroizing::new(password.to_string());
        let params = self.kdf;
        tokio::task::spawn_blocking(move || AccountKeys {
            credential: derive_login_credential(&account, &secret, &params),
            content: derive_content_key(&account, &secret, &params),
        })
        .await
        .map_err(|e| ClientError::Task(format!("key derivation: {e}")))
    }

    async fn session(&self, owner: &str) -> ClientResult<Session> {
        self.sessions
            .get(owner)
            .await
            .ok_or(ClientError::AuthRequired)
    }

    /// Seals `card` and stores it under the plaintext `label`.
    pub async fn add_card(
        &self,
        owner: &str,
        label: Option<String>,
        card: &CardDetails,
    ) -> ClientResult<CardSummary> {
        let session = self.session(owner).await?;
        let envelope = seal_card(&session.key, card)?;

        let stored = self
            .api
            .create_card(&session.token, &RawCardIn::new(label, envelope.to_wire()))
            .await?;
        debug!("stored card {} for owner {owner}", stored.id);
        Ok(CardSummary::from_card(&stored, card))
    }

    /// Lists the owner's cards, masked.
    ///
    /// A record that fails to decrypt is reported as "(cannot decrypt)"
    /// instead of failing the whole listing.
    pub async fn list_cards(&self, owner: &str) -> ClientResult<Vec<CardSummary>> {
        let session = self.session(owner).await?;
        let raw = self.api.list_cards(&session.token).await?;

        Ok(raw
            .iter()
            .map(|r| match decrypt_card(&session.key, r) {
                Ok(card) => CardSummary::from_card(r, &card),
                Err(e) => {
                    warn!("card {} for owner {owner} did not decrypt: {e}", r.id);
                    CardSummary::undecryptable(r)
                }
            })
            .collect())
    }

    /// Fetches and decrypts one card. Decryption errors propagate.
    pub async fn get_card(&self, owner: &str, card_id: i64) -> ClientResult<DecryptedCard> {
        let session = self.session(owner).await?;
        let raw = self.api.get_card(&session.token, card_id).await?;
        let card = decrypt_card(&session.key, &raw)?;

        Ok(DecryptedCard {
            id: raw.id,
            label: raw.label,
            card,
            created_at: raw.created_at,
        })
    }

    pub async fn delete_card(&self, owner: &str, card_id: i64) -> ClientResult<()> {
        let session = self.session(owner).await?;
        self.api.delete_card(&session.token, card_id).await
    }
}

fn decrypt_card(key: &DerivedKey, raw: &RawCardOut) -> ClientResult<CardDetails> {
    let record = open_wire(key, &raw.wire())?;
    Ok(CardDetails::try_from(&record)?)
}
