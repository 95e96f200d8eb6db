//! HTTP client for the card storage API.
//!
//! The API stores opaque envelopes per authenticated owner and never sees
//! plaintext or keys. Bearer tokens are passed per call; the client itself
//! holds no auth state, so one instance serves every session.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::types::{AuthToken, RawCardIn, RawCardOut};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

/// HTTP client for the storage collaborator.
#[derive(Clone)]
pub struct StorageApiClient {
    client: Client,
    base_url: String,
}

impl StorageApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ── Auth ──

    /// Creates an account and returns its first token.
    pub async fn register(&self, username: &str, password: &str) -> ClientResult<AuthToken> {
        let resp = self
            .client
            .post(self.url("/register"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await?;

        if resp.status() == StatusCode::BAD_REQUEST {
            return Err(ClientError::AuthFailed(format!(
                "registration rejected for {username}"
            )));
        }
        Ok(check(resp, "register").await?.json().await?)
    }

    /// Exchanges credentials for a bearer token (`POST /token`, form-encoded).
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<AuthToken> {
        let resp = self
            .client
            .post(self.url("/token"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(ClientError::AuthFailed("incorrect credentials".to_string()));
        }
        Ok(check(resp, "login").await?.json().await?)
    }

    // ── Cards ──

    pub async fn create_card(&self, token: &str, card: &RawCardIn) -> ClientResult<RawCardOut> {
        let resp = self
            .client
            .post(self.url("/cards"))
            .bearer_auth(token)
            .json(card)
            .send()
            .await?;
        Ok(check(resp, "POST /cards").await?.json().await?)
    }

    pub async fn list_cards(&self, token: &str) -> ClientResult<Vec<RawCardOut>> {
        let resp = self
            .client
            .get(self.url("/cards"))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(check(resp, "GET /cards").await?.json().await?)
    }

    pub async fn get_card(&self, token: &str, card_id: i64) -> ClientResult<RawCardOut> {
        let path = format!("/cards/{card_id}");
        let resp = self
            .client
            .get(self.url(&path))
            .bearer_auth(token)
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(format!("card {card_id}")));
        }
        Ok(check(resp, &path).await?.json().await?)
    }

    pub async fn delete_card(&self, token: &str, card_id: i64) -> ClientResult<()> {
        let path = format!("/cards/{card_id}");
        let resp = self
            .client
            .delete(self.url(&path))
            .bearer_auth(token)
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(format!("card {card_id}")));
        }
        check(resp, &path).await?;
        Ok(())
    }
}

/// Maps non-success statuses to errors; 401 always means the token is no good.
async fn check(resp: Response, what: &str) -> ClientResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    debug!("{what} returned {status}");
    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::AuthFailed(format!("{what}: token rejected")));
    }

    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Api(format!("{what}: {status} {body}")))
}
