//! Lightspeed API client.
//!
//! Owns the HTTP client, the vendor configuration, and the in-memory
//! access token cache. Tokens are minted lazily from the refresh token
//! and re-minted when the cached one expires.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::sync::RwLock;
use tracing::instrument;

use super::LightspeedError;
use super::auth::{LightspeedToken, refresh_access_token};
use crate::config::LightspeedConfig;

/// Lightspeed API client.
///
/// Cheap to clone; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct LightspeedClient {
    inner: Arc<LightspeedClientInner>,
}

struct LightspeedClientInner {
    client: reqwest::Client,
    config: LightspeedConfig,
    /// In-memory token cache
    token: RwLock<Option<LightspeedToken>>,
}

impl LightspeedClient {
    /// Create a new Lightspeed API client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never happen
    /// under normal circumstances as we use standard TLS configuration.
    #[must_use]
    pub fn new(config: LightspeedConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            inner: Arc::new(LightspeedClientInner {
                client,
                config,
                token: RwLock::new(None),
            }),
        }
    }

    /// The configured API base URL (used to build item endpoints).
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.inner.config.api_url
    }

    /// The configured Lightspeed account ID.
    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.inner.config.account_id
    }

    /// Get a valid access token, minting one if the cache is empty or
    /// expired.
    async fn access_token(&self) -> Result<String, LightspeedError> {
        if let Some(token) = self.inner.token.read().await.as_ref()
            && !token.is_expired()
        {
            return Ok(token.access_token.expose_secret().to_string());
        }

        let mut guard = self.inner.token.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if let Some(token) = guard.as_ref()
            && !token.is_expired()
        {
            return Ok(token.access_token.expose_secret().to_string());
        }

        let token = refresh_access_token(&self.inner.client, &self.inner.config).await?;
        let access_token = token.access_token.expose_secret().to_string();
        *guard = Some(token);
        Ok(access_token)
    }

    /// Perform an authenticated GET against an absolute URL.
    ///
    /// Returns the response when the status is a success; any other status
    /// becomes `LightspeedError::Api`.
    #[instrument(skip(self), fields(url = %url))]
    pub(crate) async fn get(&self, url: &str) -> Result<reqwest::Response, LightspeedError> {
        let access_token = self.access_token().await?;

        let response = self
            .inner
            .client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(LightspeedError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Clear the cached token (forces a refresh on the next call).
    pub async fn clear_token(&self) {
        *self.inner.token.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn test_config() -> LightspeedConfig {
        LightspeedConfig {
            account_id: "292471".to_string(),
            client_id: "client".to_string(),
            client_secret: SecretString::from("cs"),
            refresh_token: SecretString::from("rt"),
            api_url: "http://localhost:0".to_string(),
            token_url: "http://localhost:0/token".to_string(),
        }
    }

    #[tokio::test]
    async fn test_client_starts_without_token() {
        let client = LightspeedClient::new(test_config());
        assert!(client.inner.token.read().await.is_none());
    }

    #[tokio::test]
    async fn test_clear_token() {
        let client = LightspeedClient::new(test_config());
        *client.inner.token.write().await = Some(LightspeedToken {
            access_token: SecretString::from("t"),
            expires_at: chrono::Utc::now().timestamp() + 3600,
        });

        client.clear_token().await;
        assert!(client.inner.token.read().await.is_none());
    }
}
