//! Sync route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use crate::error::AppError;
use crate::services::sync::{self, BulkSyncReport, TargetedSyncReport};
use crate::state::AppState;

/// Request body for the targeted sync endpoint.
#[derive(Debug, Deserialize)]
pub struct TargetedSyncRequest {
    /// Comma-separated SKU list, e.g. `"A-1, B-2, C-3"`.
    pub skus: String,
}

/// `POST /api/sync` - reconcile all active items.
#[instrument(skip(state))]
pub async fn run_bulk_sync(
    State(state): State<AppState>,
) -> Result<Json<BulkSyncReport>, AppError> {
    let report = sync::sync_all(state.lightspeed(), state.zoho(), state.accounts()).await?;
    Ok(Json(report))
}

/// `POST /api/sync/skus` - reconcile a caller-supplied SKU list.
#[instrument(skip(state, request))]
pub async fn run_targeted_sync(
    State(state): State<AppState>,
    Json(request): Json<TargetedSyncRequest>,
) -> Result<Json<TargetedSyncReport>, AppError> {
    let skus = sync::parse_sku_list(&request.skus);
    if skus.is_empty() {
        return Err(AppError::BadRequest("no SKUs supplied".to_string()));
    }

    let report = sync::sync_skus(state.lightspeed(), state.zoho(), state.accounts(), &skus).await;
    Ok(Json(report))
}
