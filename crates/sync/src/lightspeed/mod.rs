//! Lightspeed retail API client.
//!
//! Read-only access to the Lightspeed item catalog: the full paginated
//! item list and filtered single-item lookups by manufacturer SKU.
//!
//! # Architecture
//!
//! - Bearer tokens are minted from a long-lived refresh token against the
//!   Lightspeed OAuth endpoint
//! - Access tokens are cached in memory and re-minted on expiry
//! - Catalog pagination follows the `@attributes.next` link embedded in
//!   each list response

pub mod auth;
pub mod client;
pub mod items;

pub use client::LightspeedClient;

use thiserror::Error;

/// Errors that can occur when interacting with the Lightspeed API.
#[derive(Debug, Error)]
pub enum LightspeedError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed (refresh token rejected or grant failed).
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The API returned a non-success status.
    #[error("Lightspeed API error (HTTP {status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the API.
        body: String,
    },

    /// A URL could not be constructed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}
