//! Catalog item shapes produced by the vendor fetchers.
//!
//! Both shapes are already reduced to the fields the reconciler compares;
//! everything else the vendor APIs return is dropped at fetch time.

use serde::{Deserialize, Serialize};

use super::id::{ItemId, Sku};

/// An inventory item as fetched from the Lightspeed catalog.
///
/// Lightspeed serves costs as decimal strings and the selling price inside
/// a `Prices.ItemPrice` array; the fetcher flattens both into plain floats
/// before this type is constructed. The SKU may be absent (items without a
/// manufacturer SKU) or duplicated - no dedup is performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceItem {
    /// Manufacturer SKU, the cross-platform join key.
    pub sku: Option<Sku>,
    /// Item description; becomes the Zoho item name on create.
    pub description: String,
    /// Default cost, if set.
    pub default_cost: Option<f64>,
    /// Default selling price, if set.
    pub price: Option<f64>,
}

/// An inventory item as fetched from the Zoho catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetItem {
    /// Zoho's primary key for the item; required for any update.
    pub item_id: ItemId,
    /// Item SKU.
    pub sku: Sku,
    /// Item name.
    pub name: String,
    /// Selling rate, if set.
    pub rate: Option<f64>,
    /// Purchase rate (cost), if set.
    pub purchase_rate: Option<f64>,
}
