use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::utils::truncate;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Token endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Token response has no access_token: {0}")]
    MissingAccessToken(String),
}

/// OAuth client settings for the refresh-token grant
#[derive(Clone)]
pub struct OAuthClient {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Holds the Zoho access token and renews it through the refresh-token grant.
///
/// Clones share one token slot. The token carries no expiry; a rejected
/// upload is what tells the caller to refresh.
#[derive(Clone)]
pub struct TokenManager {
    client: reqwest::Client,
    token_url: String,
    oauth: Arc<OAuthClient>,
    access_token: Arc<RwLock<Option<String>>>,
}

impl TokenManager {
    /// `accounts_url` is the accounts host, e.g. https://accounts.zoho.in
    pub fn new(accounts_url: &str, oauth: OAuthClient) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            token_url: format!("{}/oauth/v2/token", accounts_url.trim_end_matches('/')),
            oauth: Arc::new(oauth),
            access_token: Arc::new(RwLock::new(None)),
        }
    }

    /// Currently held access token, if any refresh has succeeded yet
    pub async fn current(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }

    /// Exchange the refresh token for a new access token and store it.
    ///
    /// A failed exchange leaves the previously held token in place.
    #[instrument(skip(self), fields(url = %self.token_url))]
    pub async fn refresh(&self) -> Result<String, TokenError> {
        info!("Requesting new access token");
        let response = self
            .client
            .post(&self.token_url)
            .query(&[
                ("refresh_token", self.oauth.refresh_token.as_str()),
                ("client_id", self.oauth.client_id.as_str()),
                ("client_secret", self.oauth.client_secret.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Token response: {} {}", status, truncate(&body, 200));

        if !status.is_success() {
            return Err(TokenError::Status {
                status,
                body: truncate(&body, 200).to_string(),
            });
        }

        let token = serde_json::from_str::<TokenResponse>(&body)
            .ok()
            .and_then(|r| r.access_token)
            .ok_or_else(|| TokenError::MissingAccessToken(truncate(&body, 200).to_string()))?;

        info!("Got new access token: {}...", truncate(&token, 20));
        *self.access_token.write().await = Some(token.clone());

        Ok(token)
    }
}
