//! Item catalog queries for the Lightspeed API.
//!
//! Lightspeed's V3 item payloads need some flattening before they are
//! usable: costs arrive as decimal strings, the selling price hides inside
//! a `Prices.ItemPrice` array keyed by `useType`, and single-item lookups
//! return `Item` as either an object or an array depending on match count.

use serde::Deserialize;
use tracing::instrument;
use url::Url;

use stocklink_core::{Sku, SourceItem};

use super::LightspeedError;
use super::client::LightspeedClient;

/// The `useType` of the price entry treated as the selling price.
const DEFAULT_PRICE_USE_TYPE: &str = "Default";

/// A page of the item list endpoint.
#[derive(Debug, Deserialize)]
struct ItemListResponse {
    #[serde(rename = "@attributes", default)]
    attributes: PageAttributes,
    #[serde(rename = "Item", default)]
    items: Option<OneOrMany<RawItem>>,
}

#[derive(Debug, Default, Deserialize)]
struct PageAttributes {
    /// Absolute URL of the next page, when there is one.
    #[serde(default)]
    next: Option<String>,
}

/// `Item` is an array for multi-item responses but a bare object when the
/// response holds a single item.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(Box<T>),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(item) => vec![*item],
            Self::Many(items) => items,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(rename = "defaultCost", default)]
    default_cost: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "manufacturerSku", default)]
    manufacturer_sku: Option<String>,
    #[serde(rename = "Prices", default)]
    prices: Option<Prices>,
}

#[derive(Debug, Default, Deserialize)]
struct Prices {
    #[serde(rename = "ItemPrice", default)]
    item_price: Vec<ItemPrice>,
}

#[derive(Debug, Deserialize)]
struct ItemPrice {
    #[serde(default)]
    amount: Option<String>,
    #[serde(rename = "useType", default)]
    use_type: Option<String>,
}

impl RawItem {
    fn into_source_item(self) -> SourceItem {
        let price = self.prices.as_ref().and_then(|prices| {
            prices
                .item_price
                .iter()
                .find(|p| p.use_type.as_deref() == Some(DEFAULT_PRICE_USE_TYPE))
                .and_then(|p| p.amount.as_deref())
                .and_then(parse_money)
        });

        SourceItem {
            // An empty manufacturerSku cannot join anything; treat it as absent.
            sku: self
                .manufacturer_sku
                .filter(|sku| !sku.is_empty())
                .map(Sku::new),
            description: self.description.unwrap_or_default(),
            default_cost: self.default_cost.as_deref().and_then(parse_money),
            price,
        }
    }
}

fn parse_money(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

impl LightspeedClient {
    fn items_url(&self) -> String {
        format!(
            "{}/API/V3/Account/{}/Item.json",
            self.api_url(),
            self.account_id()
        )
    }

    /// Fetch the full item catalog, following `next` links to exhaustion.
    ///
    /// # Errors
    ///
    /// Returns `LightspeedError` if any page request fails; partial pages
    /// are discarded.
    #[instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<SourceItem>, LightspeedError> {
        let mut url = self.items_url();
        let mut items = Vec::new();

        loop {
            let response = self.get(&url).await?;
            let page: ItemListResponse = response.json().await?;

            if let Some(page_items) = page.items {
                items.extend(
                    page_items
                        .into_vec()
                        .into_iter()
                        .map(RawItem::into_source_item),
                );
            }

            match page.attributes.next {
                Some(next) if !next.is_empty() => url = next,
                _ => break,
            }
        }

        Ok(items)
    }

    /// Look up a single item by manufacturer SKU.
    ///
    /// Returns `Ok(None)` when no item carries the SKU. If several do, the
    /// first is returned, matching the list endpoint's ordering.
    ///
    /// # Errors
    ///
    /// Returns `LightspeedError` if the lookup request fails.
    #[instrument(skip(self), fields(sku = %sku))]
    pub async fn get_item_by_sku(&self, sku: &Sku) -> Result<Option<SourceItem>, LightspeedError> {
        let mut url = Url::parse(&self.items_url())?;
        url.query_pairs_mut()
            .append_pair("manufacturerSku", sku.as_str());

        let response = self.get(url.as_str()).await?;
        let page: ItemListResponse = response.json().await?;

        Ok(page
            .items
            .map(OneOrMany::into_vec)
            .and_then(|items| items.into_iter().next())
            .map(RawItem::into_source_item))
    }
}
