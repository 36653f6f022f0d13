//! Source catalog inspection command.
//!
//! # Usage
//!
//! ```bash
//! stocklink catalog
//! ```
//!
//! # Environment Variables
//!
//! Requires the full Lightspeed configuration; see the sync crate's
//! config module for the variable list.

use tracing::info;

use stocklink_sync::config::SyncConfig;
use stocklink_sync::lightspeed::LightspeedClient;
use stocklink_sync::services;

/// Fetch the Lightspeed catalog and report its size.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or the fetch fails.
pub async fn summarize() -> Result<(), Box<dyn std::error::Error>> {
    let config = SyncConfig::from_env()?;
    let lightspeed = LightspeedClient::new(config.lightspeed);

    let summary = services::sync::list_source_catalog(&lightspeed).await?;
    info!(count = summary.count, "source catalog fetched");

    Ok(())
}
