//! Zoho Books API client.
//!
//! Owns the HTTP client, the vendor configuration, the in-memory token
//! cache, and the request budget. Every request is throttled through the
//! budget, authenticated with a cached `Zoho-oauthtoken`, and retried
//! exactly once with a fresh token when the API answers 401.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use super::ZohoError;
use super::auth::{ZohoToken, refresh_access_token};
use super::limit::RequestBudget;
use crate::config::ZohoConfig;

/// Zoho Books API client.
///
/// Cheap to clone; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct ZohoClient {
    inner: Arc<ZohoClientInner>,
}

struct ZohoClientInner {
    client: reqwest::Client,
    config: ZohoConfig,
    /// In-memory token cache
    token: RwLock<Option<ZohoToken>>,
    /// Request counter for rate limiting
    budget: RequestBudget,
}

impl ZohoClient {
    /// Create a new Zoho API client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never happen
    /// under normal circumstances as we use standard TLS configuration.
    #[must_use]
    pub fn new(config: ZohoConfig) -> Self {
        Self::with_budget(config, RequestBudget::default())
    }

    /// Create a client with an explicit request budget.
    #[must_use]
    pub fn with_budget(config: ZohoConfig, budget: RequestBudget) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            inner: Arc::new(ZohoClientInner {
                client,
                config,
                token: RwLock::new(None),
                budget,
            }),
        }
    }

    /// Get a valid access token, minting one if the cache is empty or
    /// expired.
    async fn access_token(&self) -> Result<String, ZohoError> {
        if let Some(token) = self.inner.token.read().await.as_ref()
            && !token.is_expired()
        {
            return Ok(token.access_token.expose_secret().to_string());
        }

        self.force_refresh().await
    }

    /// Mint a fresh token regardless of the cached one's state.
    async fn force_refresh(&self) -> Result<String, ZohoError> {
        let mut guard = self.inner.token.write().await;
        let token = refresh_access_token(&self.inner.client, &self.inner.config).await?;
        let access_token = token.access_token.expose_secret().to_string();
        *guard = Some(token);
        Ok(access_token)
    }

    /// Perform an authenticated request against an API path.
    ///
    /// `organization_id` is appended to every call. A 401 response triggers
    /// one re-auth-and-retry; any remaining non-success status is returned
    /// untouched for the caller to interpret (create needs the 400 body).
    #[instrument(skip(self, body), fields(path = %path))]
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<reqwest::Response, ZohoError> {
        self.inner.budget.tick().await;

        let token = self.access_token().await?;
        let response = self.dispatch(&token, method.clone(), path, query, body).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            info!("Zoho access token expired, refreshing token");
            let token = self.force_refresh().await?;
            return Ok(self.dispatch(&token, method, path, query, body).await?);
        }

        Ok(response)
    }

    async fn dispatch(
        &self,
        token: &str,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let url = format!("{}{path}", self.inner.config.api_url);

        let mut request = self
            .inner
            .client
            .request(method, url)
            .header("Authorization", format!("Zoho-oauthtoken {token}"))
            .query(&[("organization_id", self.inner.config.organization_id.as_str())])
            .query(query);

        if let Some(body) = body {
            request = request.json(body);
        }

        request.send().await
    }

    /// Perform a GET and deserialize a success response.
    ///
    /// Non-success statuses become `ZohoError::Api`.
    pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ZohoError> {
        let response = self.send(Method::GET, path, query, None).await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ZohoError::Api {
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
    use stocklink_core::AccountId;

    fn test_config() -> ZohoConfig {
        ZohoConfig {
            organization_id: "762023225".to_string(),
            client_id: "client".to_string(),
            client_secret: SecretString::from("cs"),
            refresh_token: SecretString::from("rt"),
            redirect_uri: None,
            api_url: "http://localhost:0".to_string(),
            token_url: "http://localhost:0/token".to_string(),
            purchase_account_id: None,
            inventory_account_id: AccountId::new("acc-inventory"),
        }
    }

    #[tokio::test]
    async fn test_client_starts_without_token() {
        let client = ZohoClient::new(test_config());
        assert!(client.inner.token.read().await.is_none());
    }

    #[tokio::test]
    async fn test_clear_token() {
        let client = ZohoClient::new(test_config());
        *client.inner.token.write().await = Some(ZohoToken {
            access_token: SecretString::from("t"),
            expires_at: chrono::Utc::now().timestamp() + 3600,
        });

        client.clear_token().await;
        assert!(client.inner.token.read().await.is_none());
    }
}
