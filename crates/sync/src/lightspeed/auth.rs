//! Lightspeed authentication module.
//!
//! Mints short-lived bearer tokens from the configured refresh token via
//! the OAuth refresh-token grant.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use super::LightspeedError;
use crate::config::LightspeedConfig;

/// Fallback token lifetime when the grant response omits `expires_in`.
const DEFAULT_EXPIRES_IN: i64 = 3600;

/// Bearer token obtained from the Lightspeed OAuth endpoint.
#[derive(Debug, Clone)]
pub struct LightspeedToken {
    /// Access token for API requests.
    pub access_token: SecretString,
    /// Unix timestamp when the access token expires.
    pub expires_at: i64,
}

impl LightspeedToken {
    /// Check if the access token has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        // Consider expired if less than 60 seconds remaining
        now >= self.expires_at - 60
    }
}

/// Response from the Lightspeed OAuth token endpoint.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Token lifetime in seconds.
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Mint a new access token from the configured refresh token.
///
/// # Errors
///
/// Returns `LightspeedError::AuthenticationFailed` if the grant is
/// rejected.
#[instrument(skip(client, config))]
pub async fn refresh_access_token(
    client: &reqwest::Client,
    config: &LightspeedConfig,
) -> Result<LightspeedToken, LightspeedError> {
    let now = chrono::Utc::now().timestamp();

    let response = client
        .post(&config.token_url)
        .form(&[
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.expose_secret()),
            ("refresh_token", config.refresh_token.expose_secret()),
            ("grant_type", "refresh_token"),
        ])
        .send()
        .await?;

    let status = response.status();

    if status.is_success() {
        let token_response: TokenResponse = response.json().await?;

        Ok(LightspeedToken {
            access_token: SecretString::from(token_response.access_token),
            expires_at: now + token_response.expires_in.unwrap_or(DEFAULT_EXPIRES_IN),
        })
    } else {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(LightspeedError::AuthenticationFailed(format!(
            "HTTP {status}: {error_text}"
        )))
    }
}
