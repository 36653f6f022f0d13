//! Business logic services for the sync service.
//!
//! # Services
//!
//! - `sync` - Orchestration of the bulk and targeted reconciliation flows

pub mod sync;

pub use sync::{BulkSyncReport, CatalogSummary, TargetedSyncReport};
