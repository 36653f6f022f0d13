//! Reconciliation run commands.
//!
//! # Usage
//!
//! ```bash
//! # Bulk mode: everything active on both platforms
//! stocklink sync
//!
//! # Targeted mode: just the listed SKUs
//! stocklink sync --skus "A-1,B-2"
//! ```
//!
//! # Environment Variables
//!
//! Requires the full Lightspeed and Zoho configuration; see the sync
//! crate's config module for the variable list.

use tracing::info;

use stocklink_sync::config::SyncConfig;
use stocklink_sync::services::sync::{parse_sku_list, sync_all, sync_skus};
use stocklink_sync::state::AppState;

/// Run a bulk reconciliation of all active items.
///
/// # Errors
///
/// Returns an error if configuration is incomplete, either catalog fetch
/// fails, or either catalog comes back empty.
pub async fn bulk() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state().await?;

    let report = sync_all(state.lightspeed(), state.zoho(), state.accounts()).await?;
    info!(report = %serde_json::to_string(&report)?, "bulk sync finished");

    Ok(())
}

/// Run a targeted reconciliation of a comma-separated SKU list.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or no SKUs were
/// supplied.
pub async fn targeted(raw_skus: &str) -> Result<(), Box<dyn std::error::Error>> {
    let skus = parse_sku_list(raw_skus);
    if skus.is_empty() {
        return Err("no SKUs supplied".into());
    }

    let state = build_state().await?;

    let report = sync_skus(state.lightspeed(), state.zoho(), state.accounts(), &skus).await;
    info!(report = %serde_json::to_string(&report)?, "targeted sync finished");

    Ok(())
}

async fn build_state() -> Result<AppState, Box<dyn std::error::Error>> {
    let config = SyncConfig::from_env()?;
    Ok(AppState::new(config).await?)
}
