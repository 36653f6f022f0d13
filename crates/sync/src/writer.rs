//! Applies staged updates and creates against Zoho.
//!
//! The writer absorbs vendor errors into outcomes: a failed update is
//! retried to a fixed bound and then counted, a duplicate-SKU create is a
//! benign skip, and any other create failure is logged and dropped.
//! Nothing here propagates an error to the orchestration loop.

use std::time::Duration;

use tracing::{error, warn};

use stocklink_core::{CreatePayload, FieldDelta};

use crate::zoho::{CreateStatus, ZohoClient};

/// Total attempts for an item update (1 initial + 2 retries).
pub const UPDATE_MAX_ATTEMPTS: u32 = 3;

/// Fixed pause between update attempts.
pub const UPDATE_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Outcome of applying one create payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The item was created.
    Created,
    /// Zoho already holds the SKU; treated as informational, not a failure.
    AlreadyExists,
    /// The create failed and the item was dropped (no retry).
    Failed,
}

/// Apply one field delta, retrying on failure.
///
/// Every failure kind is retried identically: no backoff, no jitter, no
/// retryable/non-retryable distinction. Returns `false` only after all
/// attempts are exhausted.
pub async fn apply_update(zoho: &ZohoClient, delta: &FieldDelta) -> bool {
    let result = retry_with_fixed_delay(UPDATE_MAX_ATTEMPTS, UPDATE_RETRY_DELAY, || {
        zoho.update_item(&delta.item_id, &delta.fields)
    })
    .await;

    match result {
        Ok(()) => true,
        Err(e) => {
            error!(item_id = %delta.item_id, error = %e, "exhausted all retries for item update");
            false
        }
    }
}

/// Apply one create payload.
///
/// No retry: a duplicate SKU is a benign skip, anything else is logged and
/// dropped.
pub async fn apply_create(zoho: &ZohoClient, payload: &CreatePayload) -> CreateOutcome {
    match zoho.create_item(payload).await {
        Ok(CreateStatus::Created) => CreateOutcome::Created,
        Ok(CreateStatus::AlreadyExists) => {
            warn!(sku = %payload.sku, "item already exists in Zoho, skipping creation");
            CreateOutcome::AlreadyExists
        }
        Err(e) => {
            error!(sku = %payload.sku, error = %e, "failed to create item in Zoho");
            CreateOutcome::Failed
        }
    }
}

/// Run an operation up to `max_attempts` times with a fixed pause between
/// attempts.
async fn retry_with_fixed_delay<T, E, F, Fut>(
    max_attempts: u32,
    delay: Duration,
    mut op: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                warn!(
                    attempt,
                    error = %e,
                    "write failed, retrying in {} seconds",
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
