//! Zoho Books API client.
//!
//! Read/write access to the Zoho Books item catalog: paginated active-item
//! listing, single-item lookup by SKU, partial item updates, item creation,
//! and the chart-of-accounts lookup used to resolve the purchase account.
//!
//! # Architecture
//!
//! - Access tokens are minted from a long-lived refresh token via the
//!   OAuth2 refresh-token grant and cached in memory with their expiry
//! - A 401 triggers one re-auth-and-retry of the failed request
//! - A request counter pauses for 60 seconds after every 100 calls to
//!   stay inside Zoho's per-minute rate limit

pub mod accounts;
pub mod auth;
pub mod client;
pub mod items;
pub mod limit;

pub use client::ZohoClient;
pub use items::CreateStatus;

use thiserror::Error;

/// Errors that can occur when interacting with the Zoho API.
#[derive(Debug, Error)]
pub enum ZohoError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed (refresh token rejected or grant failed).
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The API returned a non-success status.
    #[error("Zoho API error (HTTP {status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the API.
        body: String,
    },

    /// An expected resource was missing from an otherwise-valid response.
    #[error("Not found: {0}")]
    NotFound(String),
}
