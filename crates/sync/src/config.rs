//! Sync service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LIGHTSPEED_ACCOUNT_ID` - Lightspeed retail account ID
//! - `LIGHTSPEED_CLIENT_ID` - Lightspeed OAuth client ID
//! - `LIGHTSPEED_CLIENT_SECRET` - Lightspeed OAuth client secret
//! - `LIGHTSPEED_REFRESH_TOKEN` - Lightspeed OAuth refresh token
//! - `ZOHO_ORGANIZATION_ID` - Zoho Books organization ID
//! - `ZOHO_CLIENT_ID` - Zoho OAuth client ID
//! - `ZOHO_CLIENT_SECRET` - Zoho OAuth client secret
//! - `ZOHO_REFRESH_TOKEN` - Zoho OAuth refresh token
//! - `ZOHO_INVENTORY_ACCOUNT_ID` - Inventory asset account for created items
//!
//! ## Optional
//! - `SYNC_HOST` - Bind address (default: 127.0.0.1)
//! - `SYNC_PORT` - Listen port (default: 3002)
//! - `ZOHO_PURCHASE_ACCOUNT_ID` - Purchase account for cost updates;
//!   resolved from the chart of accounts when unset
//! - `ZOHO_REDIRECT_URI` - Redirect URI registered with the Zoho OAuth app
//! - `LIGHTSPEED_API_URL` / `LIGHTSPEED_TOKEN_URL` - API/token endpoint
//!   overrides (used by tests)
//! - `ZOHO_API_URL` / `ZOHO_TOKEN_URL` - API/token endpoint overrides
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use stocklink_core::AccountId;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default Lightspeed API base URL.
const DEFAULT_LIGHTSPEED_API_URL: &str = "https://api.lightspeedapp.com";
/// Default Lightspeed OAuth token endpoint.
const DEFAULT_LIGHTSPEED_TOKEN_URL: &str = "https://cloud.lightspeedapp.com/oauth/access_token.php";
/// Default Zoho Books API base URL.
const DEFAULT_ZOHO_API_URL: &str = "https://www.zohoapis.com/books/v3";
/// Default Zoho OAuth token endpoint.
const DEFAULT_ZOHO_TOKEN_URL: &str = "https://accounts.zoho.com/oauth/v2/token";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Sync service configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Lightspeed (source platform) configuration
    pub lightspeed: LightspeedConfig,
    /// Zoho (target platform) configuration
    pub zoho: ZohoConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Lightspeed API configuration.
///
/// Implements `Debug` manually to redact the OAuth credentials.
#[derive(Clone)]
pub struct LightspeedConfig {
    /// Lightspeed retail account ID (path segment of every API call)
    pub account_id: String,
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: SecretString,
    /// OAuth refresh token (long-lived; access tokens are minted from it)
    pub refresh_token: SecretString,
    /// API base URL
    pub api_url: String,
    /// OAuth token endpoint
    pub token_url: String,
}

impl std::fmt::Debug for LightspeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightspeedConfig")
            .field("account_id", &self.account_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("token_url", &self.token_url)
            .finish()
    }
}

/// Zoho Books API configuration.
///
/// Implements `Debug` manually to redact the OAuth credentials.
#[derive(Clone)]
pub struct ZohoConfig {
    /// Zoho Books organization ID (query parameter on every API call)
    pub organization_id: String,
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: SecretString,
    /// OAuth refresh token
    pub refresh_token: SecretString,
    /// Redirect URI registered with the OAuth app, if any
    pub redirect_uri: Option<String>,
    /// API base URL
    pub api_url: String,
    /// OAuth token endpoint
    pub token_url: String,
    /// Purchase account for cost updates; resolved via the chart of
    /// accounts when unset
    pub purchase_account_id: Option<AccountId>,
    /// Inventory asset account assigned to created items
    pub inventory_account_id: AccountId,
}

impl std::fmt::Debug for ZohoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZohoConfig")
            .field("organization_id", &self.organization_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("api_url", &self.api_url)
            .field("token_url", &self.token_url)
            .field("purchase_account_id", &self.purchase_account_id)
            .field("inventory_account_id", &self.inventory_account_id)
            .finish()
    }
}

impl SyncConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("SYNC_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SYNC_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SYNC_PORT", "3002")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SYNC_PORT".to_string(), e.to_string()))?;

        let lightspeed = LightspeedConfig::from_env()?;
        let zoho = ZohoConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            lightspeed,
            zoho,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl LightspeedConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            account_id: get_required_env("LIGHTSPEED_ACCOUNT_ID")?,
            client_id: get_required_env("LIGHTSPEED_CLIENT_ID")?,
            client_secret: get_validated_secret("LIGHTSPEED_CLIENT_SECRET")?,
            refresh_token: get_validated_secret("LIGHTSPEED_REFRESH_TOKEN")?,
            api_url: get_env_or_default("LIGHTSPEED_API_URL", DEFAULT_LIGHTSPEED_API_URL),
            token_url: get_env_or_default("LIGHTSPEED_TOKEN_URL", DEFAULT_LIGHTSPEED_TOKEN_URL),
        })
    }
}

impl ZohoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            organization_id: get_required_env("ZOHO_ORGANIZATION_ID")?,
            client_id: get_required_env("ZOHO_CLIENT_ID")?,
            client_secret: get_validated_secret("ZOHO_CLIENT_SECRET")?,
            refresh_token: get_validated_secret("ZOHO_REFRESH_TOKEN")?,
            redirect_uri: get_optional_env("ZOHO_REDIRECT_URI"),
            api_url: get_env_or_default("ZOHO_API_URL", DEFAULT_ZOHO_API_URL),
            token_url: get_env_or_default("ZOHO_TOKEN_URL", DEFAULT_ZOHO_TOKEN_URL),
            purchase_account_id: get_optional_env("ZOHO_PURCHASE_ACCOUNT_ID").map(AccountId::new),
            inventory_account_id: AccountId::new(get_required_env("ZOHO_INVENTORY_ACCOUNT_ID")?),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> SyncConfig {
        SyncConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3002,
            lightspeed: LightspeedConfig {
                account_id: "292471".to_string(),
                client_id: "test_client_id".to_string(),
                client_secret: SecretString::from("ls_client_super_confidential"),
                refresh_token: SecretString::from("ls_refresh_super_confidential"),
                api_url: DEFAULT_LIGHTSPEED_API_URL.to_string(),
                token_url: DEFAULT_LIGHTSPEED_TOKEN_URL.to_string(),
            },
            zoho: ZohoConfig {
                organization_id: "762023225".to_string(),
                client_id: "test_client_id".to_string(),
                client_secret: SecretString::from("zoho_client_super_confidential"),
                refresh_token: SecretString::from("zoho_refresh_super_confidential"),
                redirect_uri: None,
                api_url: DEFAULT_ZOHO_API_URL.to_string(),
                token_url: DEFAULT_ZOHO_TOKEN_URL.to_string(),
                purchase_account_id: None,
                inventory_account_id: AccountId::new("2866866000000034001"),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_high() {
        // Random-looking string should have high entropy
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3002);
    }

    #[test]
    fn test_lightspeed_config_debug_redacts_secrets() {
        let config = test_config().lightspeed;
        let debug_output = format!("{config:?}");

        // Public fields should be visible
        assert!(debug_output.contains("292471"));
        assert!(debug_output.contains("test_client_id"));

        // Secret fields should be redacted
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("ls_client_super_confidential"));
        assert!(!debug_output.contains("ls_refresh_super_confidential"));
    }

    #[test]
    fn test_zoho_config_debug_redacts_secrets() {
        let config = test_config().zoho;
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("762023225"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("zoho_client_super_confidential"));
        assert!(!debug_output.contains("zoho_refresh_super_confidential"));
    }
}
