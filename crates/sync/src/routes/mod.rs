//! HTTP route handlers for the sync service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health              - Health check
//!
//! # Catalog
//! GET  /api/catalog/source  - Source catalog summary (read-only)
//!
//! # Sync
//! POST /api/sync            - Reconcile all active items (bulk mode)
//! POST /api/sync/skus       - Reconcile a comma-separated SKU list
//! ```

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub mod catalog;
pub mod sync;

/// Build the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/catalog/source", get(catalog::source_catalog))
        .route("/api/sync", post(sync::run_bulk_sync))
        .route("/api/sync/skus", post(sync::run_targeted_sync))
}
