//! Catalog route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::AppError;
use crate::services::{self, CatalogSummary};
use crate::state::AppState;

/// `GET /api/catalog/source` - fetch and summarize the source catalog.
#[instrument(skip(state))]
pub async fn source_catalog(
    State(state): State<AppState>,
) -> Result<Json<CatalogSummary>, AppError> {
    let summary = services::sync::list_source_catalog(state.lightspeed()).await?;
    Ok(Json(summary))
}
