//! OAuth2 access tokens from an offline refresh token.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;

use crate::config::GoogleConfig;
use crate::error::ExternalError;

const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Slack subtracted from the reported lifetime so a token is never used
/// right at its expiry.
const EXPIRY_SLACK: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Exchanges the configured refresh token for access tokens and caches them
/// until shortly before expiry.
pub struct TokenProvider {
    http: reqwest::Client,
    config: GoogleConfig,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(http: reqwest::Client, config: GoogleConfig) -> Self {
        Self {
            http,
            config,
            cached: Mutex::new(None),
        }
    }

    /// Return a valid access token, refreshing if the cached one is stale.
    pub async fn access_token(&self) -> Result<String, ExternalError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref()
            && token.expires_at > Instant::now()
        {
            return Ok(token.access_token.clone());
        }

        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("refresh_token", self.config.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| ExternalError::transport("oauth.token", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalError::classify("oauth.token", status.as_u16(), &body));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ExternalError::transport("oauth.token", e))?;

        tracing::debug!("refreshed access token, lifetime {}s", token.expires_in);

        let expires_at = Instant::now() + Duration::from_secs(token.expires_in)
            - EXPIRY_SLACK.min(Duration::from_secs(token.expires_in));
        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at,
        });

        Ok(token.access_token)
    }
}
