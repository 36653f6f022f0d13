//! Catalog reconciliation - the join that decides update-vs-create-vs-skip.
//!
//! Joins the Lightspeed and Zoho catalogs by exact SKU match, compares the
//! cost/name/price fields with the tolerance rules from [`crate::compare`],
//! and emits the minimal update set plus create payloads for items missing
//! from Zoho. Pure logic: fetching and writing live in the sync crate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::compare::{DEFAULT_TOLERANCE, floats_within_tolerance, normalize};
use crate::types::{AccountId, ItemId, Sku, SourceItem, TargetItem};

/// Zoho `product_type` for created items.
const PRODUCT_TYPE_GOODS: &str = "goods";
/// Zoho `item_type` for created items.
const ITEM_TYPE_INVENTORY: &str = "inventory";
/// Opening stock for created items.
const INITIAL_STOCK: i64 = 1;

/// Account references threaded through reconciliation.
///
/// Resolved once at startup (from config, or the chart-of-accounts lookup)
/// and shared by the bulk and targeted flows so the two paths cannot drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRefs {
    /// Purchase account (typically "Cost of Goods Sold").
    pub purchase_account_id: AccountId,
    /// Inventory asset account.
    pub inventory_account_id: AccountId,
}

/// The staged field changes for one existing Zoho item.
///
/// Serializes directly as the `PUT /items/{id}` body; unset fields are
/// omitted so the update stays a partial field replace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_account_id: Option<AccountId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

impl ItemFields {
    /// Whether any field has been staged.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.purchase_rate.is_none()
            && self.purchase_account_id.is_none()
            && self.name.is_none()
            && self.rate.is_none()
    }
}

/// The minimal set of field changes computed for one matched pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDelta {
    /// Zoho item ID the update targets.
    pub item_id: ItemId,
    /// The staged changes.
    pub fields: ItemFields,
}

/// The full record submitted to create a new Zoho item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePayload {
    pub name: String,
    pub rate: f64,
    pub description: String,
    pub sku: Sku,
    pub product_type: String,
    pub purchase_rate: f64,
    pub purchase_account_id: AccountId,
    pub inventory_account_id: AccountId,
    pub item_type: String,
    pub initial_stock: i64,
    pub initial_stock_rate: f64,
}

impl CreatePayload {
    /// Build a create payload from a source item.
    ///
    /// Returns `None` when the item has no description - Zoho requires a
    /// name, so such items are never created.
    #[must_use]
    pub fn from_source(item: &SourceItem, sku: Sku, accounts: &AccountRefs) -> Option<Self> {
        if item.description.is_empty() {
            return None;
        }
        Some(Self {
            name: item.description.clone(),
            rate: item.price.unwrap_or(0.0),
            description: item.description.clone(),
            sku,
            product_type: PRODUCT_TYPE_GOODS.to_string(),
            purchase_rate: item.default_cost.unwrap_or(0.0),
            purchase_account_id: accounts.purchase_account_id.clone(),
            inventory_account_id: accounts.inventory_account_id.clone(),
            item_type: ITEM_TYPE_INVENTORY.to_string(),
            initial_stock: INITIAL_STOCK,
            initial_stock_rate: item.default_cost.unwrap_or(0.0),
        })
    }
}

/// Result of reconciling the two catalogs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// Updates for items present in both catalogs, in source order.
    pub updates: Vec<FieldDelta>,
    /// Create payloads for items missing from Zoho, in source order.
    pub creates: Vec<CreatePayload>,
    /// Source items skipped because they have no description to create with.
    pub skipped_missing_name: usize,
    /// Source items skipped because they carry no SKU to join on.
    pub skipped_missing_sku: usize,
}

/// Join the two catalogs by SKU and compute the update and create lists.
///
/// Target items are indexed by exact SKU (last write wins on duplicates);
/// source items are then walked in order, so output order matches the
/// source catalog. Missing numeric fields coalesce to `0.0` before the
/// tolerance comparison - a real cost against a missing one is flagged as
/// different unless the real cost is within tolerance of zero.
#[must_use]
pub fn reconcile(
    source_items: &[SourceItem],
    target_items: &[TargetItem],
    accounts: &AccountRefs,
) -> Reconciliation {
    let target_by_sku: HashMap<&str, &TargetItem> = target_items
        .iter()
        .map(|item| (item.sku.as_str(), item))
        .collect();

    let mut result = Reconciliation::default();

    for item in source_items {
        let Some(sku) = item.sku.as_ref() else {
            warn!(description = %item.description, "source item has no SKU, skipping");
            result.skipped_missing_sku += 1;
            continue;
        };

        if let Some(target) = target_by_sku.get(sku.as_str()) {
            let fields = diff_fields(item, target, accounts);
            if !fields.is_empty() {
                result.updates.push(FieldDelta {
                    item_id: target.item_id.clone(),
                    fields,
                });
            }
        } else if let Some(payload) = CreatePayload::from_source(item, sku.clone(), accounts) {
            result.creates.push(payload);
        } else {
            warn!(sku = %sku, "skipping creation due to missing name");
            result.skipped_missing_name += 1;
        }
    }

    result
}

/// Compare one matched pair and stage the fields that differ.
fn diff_fields(source: &SourceItem, target: &TargetItem, accounts: &AccountRefs) -> ItemFields {
    let mut fields = ItemFields::default();

    let source_cost = source.default_cost.unwrap_or(0.0);
    let target_cost = target.purchase_rate.unwrap_or(0.0);
    if !floats_within_tolerance(source_cost, target_cost, DEFAULT_TOLERANCE) {
        fields.purchase_rate = Some(source_cost);
        fields.purchase_account_id = Some(accounts.purchase_account_id.clone());
    }

    if normalize(&Value::from(source.description.as_str()))
        != normalize(&Value::from(target.name.as_str()))
    {
        fields.name = Some(source.description.clone());
    }

    let source_price = source.price.unwrap_or(0.0);
    let target_rate = target.rate.unwrap_or(0.0);
    if !floats_within_tolerance(source_price, target_rate, DEFAULT_TOLERANCE) {
        fields.rate = Some(source_price);
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts() -> AccountRefs {
        AccountRefs {
            purchase_account_id: AccountId::new("acc-purchase"),
            inventory_account_id: AccountId::new("acc-inventory"),
        }
    }

    fn source(sku: &str, description: &str, cost: Option<f64>, price: Option<f64>) -> SourceItem {
        SourceItem {
            sku: Some(Sku::new(sku)),
            description: description.to_string(),
            default_cost: cost,
            price,
        }
    }

    fn target(
        sku: &str,
        item_id: &str,
        name: &str,
        cost: Option<f64>,
        rate: Option<f64>,
    ) -> TargetItem {
        TargetItem {
            item_id: ItemId::new(item_id),
            sku: Sku::new(sku),
            name: name.to_string(),
            rate,
            purchase_rate: cost,
        }
    }

    #[test]
    fn test_matched_pair_within_tolerance_yields_no_delta() {
        let result = reconcile(
            &[source("X", "Widget", Some(10.0), Some(20.0))],
            &[target("X", "1", "widget", Some(10.0), Some(20.0))],
            &accounts(),
        );
        assert!(result.updates.is_empty());
        assert!(result.creates.is_empty());
    }

    #[test]
    fn test_cost_difference_stages_purchase_rate_and_account() {
        let result = reconcile(
            &[source("X", "Widget", Some(10.0), Some(20.0))],
            &[target("X", "1", "Widget", Some(12.0), Some(20.0))],
            &accounts(),
        );

        assert_eq!(result.updates.len(), 1);
        let delta = &result.updates[0];
        assert_eq!(delta.item_id, ItemId::new("1"));
        assert_eq!(delta.fields.purchase_rate, Some(10.0));
        assert_eq!(
            delta.fields.purchase_account_id,
            Some(AccountId::new("acc-purchase"))
        );
        assert_eq!(delta.fields.name, None);
        assert_eq!(delta.fields.rate, None);
    }

    #[test]
    fn test_name_comparison_is_normalized() {
        // " Widget " vs "widget" normalize equal - no name change.
        let result = reconcile(
            &[source("X", " Widget ", Some(10.0), Some(20.0))],
            &[target("X", "1", "widget", Some(10.0), Some(20.0))],
            &accounts(),
        );
        assert!(result.updates.is_empty());

        // A real rename stages the raw source description.
        let result = reconcile(
            &[source("X", "Widget Pro", Some(10.0), Some(20.0))],
            &[target("X", "1", "Widget", Some(10.0), Some(20.0))],
            &accounts(),
        );
        assert_eq!(result.updates.len(), 1);
        assert_eq!(result.updates[0].fields.name.as_deref(), Some("Widget Pro"));
    }

    #[test]
    fn test_unmatched_sku_yields_create_payload() {
        let result = reconcile(
            &[source("NEW-1", "Widget", Some(5.5), Some(9.99))],
            &[target("X", "1", "Widget", Some(10.0), Some(20.0))],
            &accounts(),
        );

        assert!(result.updates.is_empty());
        assert_eq!(result.creates.len(), 1);
        let payload = &result.creates[0];
        assert_eq!(payload.sku, Sku::new("NEW-1"));
        assert_eq!(payload.name, "Widget");
        assert_eq!(payload.description, "Widget");
        assert_eq!(payload.rate, 9.99);
        assert_eq!(payload.purchase_rate, 5.5);
        assert_eq!(payload.initial_stock_rate, 5.5);
        assert_eq!(payload.product_type, "goods");
        assert_eq!(payload.item_type, "inventory");
        assert_eq!(payload.initial_stock, 1);
        assert_eq!(payload.inventory_account_id, AccountId::new("acc-inventory"));
    }

    #[test]
    fn test_unmatched_sku_without_description_is_skipped() {
        let result = reconcile(
            &[source("NEW-1", "", Some(5.5), Some(9.99))],
            &[],
            &accounts(),
        );

        assert!(result.updates.is_empty());
        assert!(result.creates.is_empty());
        assert_eq!(result.skipped_missing_name, 1);
    }

    #[test]
    fn test_source_item_without_sku_is_skipped() {
        let item = SourceItem {
            sku: None,
            description: "Orphan".to_string(),
            default_cost: Some(1.0),
            price: Some(2.0),
        };
        let result = reconcile(&[item], &[], &accounts());

        assert!(result.creates.is_empty());
        assert_eq!(result.skipped_missing_sku, 1);
    }

    #[test]
    fn test_missing_numeric_coalesces_to_zero() {
        // Real cost vs missing cost flags a diff (10.0 vs 0.0).
        let result = reconcile(
            &[source("X", "Widget", Some(10.0), Some(20.0))],
            &[target("X", "1", "Widget", None, Some(20.0))],
            &accounts(),
        );
        assert_eq!(result.updates.len(), 1);
        assert_eq!(result.updates[0].fields.purchase_rate, Some(10.0));

        // Near-zero cost vs missing cost stays within tolerance.
        let result = reconcile(
            &[source("X", "Widget", Some(0.01), Some(20.0))],
            &[target("X", "1", "Widget", None, Some(20.0))],
            &accounts(),
        );
        assert!(result.updates.is_empty());
    }

    #[test]
    fn test_duplicate_target_skus_last_write_wins() {
        let result = reconcile(
            &[source("X", "Widget", Some(10.0), Some(20.0))],
            &[
                target("X", "1", "Widget", Some(99.0), Some(20.0)),
                target("X", "2", "Widget", Some(10.0), Some(20.0)),
            ],
            &accounts(),
        );
        // The second target row wins the index, so the pair matches cleanly.
        assert!(result.updates.is_empty());
    }

    #[test]
    fn test_sku_join_is_exact_case_sensitive() {
        let result = reconcile(
            &[source("abc", "Widget", Some(10.0), Some(20.0))],
            &[target("ABC", "1", "Widget", Some(10.0), Some(20.0))],
            &accounts(),
        );
        // Differently-cased SKUs are distinct items: the source row creates.
        assert_eq!(result.creates.len(), 1);
        assert!(result.updates.is_empty());
    }

    #[test]
    fn test_output_order_follows_source_order() {
        let result = reconcile(
            &[
                source("B", "Bravo", Some(1.0), Some(1.0)),
                source("A", "Alpha", Some(1.0), Some(1.0)),
            ],
            &[
                target("A", "id-a", "Old Alpha", Some(1.0), Some(1.0)),
                target("B", "id-b", "Old Bravo", Some(1.0), Some(1.0)),
            ],
            &accounts(),
        );

        let ids: Vec<&str> = result
            .updates
            .iter()
            .map(|d| d.item_id.as_str())
            .collect();
        assert_eq!(ids, vec!["id-b", "id-a"]);
    }

    #[test]
    fn test_update_body_omits_unstaged_fields() {
        let fields = ItemFields {
            purchase_rate: Some(10.0),
            purchase_account_id: Some(AccountId::new("acc-purchase")),
            name: None,
            rate: None,
        };
        let body = serde_json::to_value(&fields).expect("serialize");
        assert_eq!(
            body,
            serde_json::json!({"purchase_rate": 10.0, "purchase_account_id": "acc-purchase"})
        );
    }
}
