//! Sync orchestration: fetch, reconcile, write.
//!
//! Two flows share the reconciliation rules in `stocklink-core`:
//!
//! - **Bulk** fetches both full catalogs, reconciles them in one pass, and
//!   applies every staged update and create sequentially.
//! - **Targeted** takes a caller-supplied SKU list and does point lookups
//!   on both platforms per SKU, applying each result immediately.
//!
//! Both catalogs are fetched fresh per invocation; nothing is cached or
//! checkpointed across runs. A failure mid-bulk leaves earlier writes in
//! place - later items are simply never reached.

use serde::Serialize;
use tracing::{info, instrument, warn};

use stocklink_core::{AccountRefs, Sku, reconcile};

use crate::error::AppError;
use crate::lightspeed::LightspeedClient;
use crate::writer::{self, CreateOutcome};
use crate::zoho::ZohoClient;

/// Progress log cadence for bulk update application.
const PROGRESS_LOG_INTERVAL: usize = 1000;

/// Summary of the source catalog (read-only entry point).
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    /// Operation status, always "ok" on success.
    pub status: &'static str,
    /// Number of items fetched from the source catalog.
    pub count: usize,
}

/// Counts reported by a bulk sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkSyncReport {
    /// Updates staged by reconciliation.
    pub updates_total: usize,
    /// Updates applied successfully.
    pub updates_succeeded: usize,
    /// Updates that exhausted all retries.
    pub updates_failed: usize,
    /// Creates staged by reconciliation.
    pub creates_total: usize,
    /// Items created.
    pub creates_succeeded: usize,
    /// Creates skipped because the SKU already exists in Zoho.
    pub creates_already_exist: usize,
    /// Creates dropped after a non-duplicate failure.
    pub creates_failed: usize,
    /// Source items skipped for lack of a name to create with.
    pub skipped_missing_name: usize,
    /// Source items skipped for lack of a SKU to join on.
    pub skipped_missing_sku: usize,
}

/// Counts reported by a targeted sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TargetedSyncReport {
    /// SKUs requested by the caller.
    pub requested: usize,
    /// Updates applied successfully.
    pub updates_succeeded: usize,
    /// Updates that exhausted all retries.
    pub updates_failed: usize,
    /// Items created.
    pub creates_succeeded: usize,
    /// Creates skipped because the SKU already exists in Zoho.
    pub creates_already_exist: usize,
    /// Creates dropped after a non-duplicate failure.
    pub creates_failed: usize,
    /// SKUs skipped because Lightspeed has no such item.
    pub skipped_missing_source: usize,
    /// SKUs skipped for lack of a name to create with.
    pub skipped_missing_name: usize,
    /// SKUs skipped because a point lookup failed outright.
    pub lookup_failures: usize,
    /// SKUs already in sync (no staged changes).
    pub unchanged: usize,
}

/// Fetch the source catalog and summarize it.
///
/// # Errors
///
/// Returns `AppError::Lightspeed` if the fetch fails.
#[instrument(skip(lightspeed))]
pub async fn list_source_catalog(
    lightspeed: &LightspeedClient,
) -> Result<CatalogSummary, AppError> {
    let items = lightspeed.list_items().await?;
    Ok(CatalogSummary {
        status: "ok",
        count: items.len(),
    })
}

/// Run a full catalog reconciliation and apply the results.
///
/// # Errors
///
/// Returns `AppError` if either catalog fetch fails or comes back empty;
/// individual write failures are counted, never fatal to the batch.
#[instrument(skip(lightspeed, zoho, accounts))]
pub async fn sync_all(
    lightspeed: &LightspeedClient,
    zoho: &ZohoClient,
    accounts: &AccountRefs,
) -> Result<BulkSyncReport, AppError> {
    let source_items = lightspeed.list_items().await?;
    let target_items = zoho.list_active_items().await?;

    if source_items.is_empty() {
        return Err(AppError::EmptyCatalog(
            "Lightspeed returned no items".to_string(),
        ));
    }
    if target_items.is_empty() {
        return Err(AppError::EmptyCatalog("Zoho returned no items".to_string()));
    }

    let result = reconcile(&source_items, &target_items, accounts);
    info!(
        updates = result.updates.len(),
        creates = result.creates.len(),
        "reconciliation complete"
    );

    let mut report = BulkSyncReport {
        updates_total: result.updates.len(),
        creates_total: result.creates.len(),
        skipped_missing_name: result.skipped_missing_name,
        skipped_missing_sku: result.skipped_missing_sku,
        ..BulkSyncReport::default()
    };

    for (idx, delta) in result.updates.iter().enumerate() {
        if writer::apply_update(zoho, delta).await {
            report.updates_succeeded += 1;
        } else {
            report.updates_failed += 1;
        }

        let processed = idx + 1;
        if processed % PROGRESS_LOG_INTERVAL == 0 {
            info!(
                processed,
                succeeded = report.updates_succeeded,
                remaining = report.updates_total - processed,
                "update progress"
            );
        }
    }

    for payload in &result.creates {
        match writer::apply_create(zoho, payload).await {
            CreateOutcome::Created => report.creates_succeeded += 1,
            CreateOutcome::AlreadyExists => report.creates_already_exist += 1,
            CreateOutcome::Failed => report.creates_failed += 1,
        }
    }

    info!(
        updates_total = report.updates_total,
        updates_succeeded = report.updates_succeeded,
        updates_failed = report.updates_failed,
        creates_total = report.creates_total,
        "bulk sync complete"
    );

    Ok(report)
}

/// Reconcile and apply a caller-supplied set of SKUs.
///
/// Point lookups only - the full catalogs are never fetched. A SKU absent
/// from Lightspeed is skipped with a warning; a SKU absent from Zoho
/// produces a create (name permitting). A failed lookup skips that SKU
/// rather than aborting the run.
#[instrument(skip(lightspeed, zoho, accounts, skus), fields(requested = skus.len()))]
pub async fn sync_skus(
    lightspeed: &LightspeedClient,
    zoho: &ZohoClient,
    accounts: &AccountRefs,
    skus: &[Sku],
) -> TargetedSyncReport {
    let mut report = TargetedSyncReport {
        requested: skus.len(),
        ..TargetedSyncReport::default()
    };

    for sku in skus {
        let source_item = match lightspeed.get_item_by_sku(sku).await {
            Ok(Some(item)) => item,
            Ok(None) => {
                warn!(sku = %sku, "no item found in Lightspeed, skipping");
                report.skipped_missing_source += 1;
                continue;
            }
            Err(e) => {
                warn!(sku = %sku, error = %e, "Lightspeed lookup failed, skipping");
                report.lookup_failures += 1;
                continue;
            }
        };

        let target_item = match zoho.get_item_by_sku(sku).await {
            Ok(item) => item,
            Err(e) => {
                warn!(sku = %sku, error = %e, "Zoho lookup failed, skipping");
                report.lookup_failures += 1;
                continue;
            }
        };

        // One-pair reconciliation under the same rules as bulk mode.
        let targets: Vec<_> = target_item.into_iter().collect();
        let result = reconcile(std::slice::from_ref(&source_item), &targets, accounts);

        report.skipped_missing_name += result.skipped_missing_name;
        if result.updates.is_empty()
            && result.creates.is_empty()
            && result.skipped_missing_name == 0
            && result.skipped_missing_sku == 0
        {
            report.unchanged += 1;
        }

        for delta in &result.updates {
            if writer::apply_update(zoho, delta).await {
                report.updates_succeeded += 1;
            } else {
                report.updates_failed += 1;
            }
        }

        for payload in &result.creates {
            match writer::apply_create(zoho, payload).await {
                CreateOutcome::Created => report.creates_succeeded += 1,
                CreateOutcome::AlreadyExists => report.creates_already_exist += 1,
                CreateOutcome::Failed => report.creates_failed += 1,
            }
        }
    }

    info!(
        requested = report.requested,
        updates_succeeded = report.updates_succeeded,
        creates_succeeded = report.creates_succeeded,
        "targeted sync complete"
    );

    report
}

/// Parse a comma-separated SKU list into trimmed, non-empty SKUs.
#[must_use]
pub fn parse_sku_list(raw: &str) -> Vec<Sku> {
    raw.split(',')
        .map(str::trim)
        .filter(|sku| !sku.is_empty())
        .map(Sku::new)
        .collect()
}
