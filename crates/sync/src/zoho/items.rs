//! Item catalog operations for the Zoho Books API.

use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use stocklink_core::{CreatePayload, ItemFields, ItemId, Sku, TargetItem};

use super::ZohoError;
use super::client::ZohoClient;

/// Page size for catalog listing.
const PAGE_SIZE: u32 = 200;

/// Zoho error code signalling a duplicate SKU on create.
const DUPLICATE_SKU_CODE: i64 = 1001;

/// Outcome of a create call at the API level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateStatus {
    /// The item was created.
    Created,
    /// Zoho already holds an item with this SKU; nothing was written.
    AlreadyExists,
}

/// A page of the items list endpoint.
#[derive(Debug, Deserialize)]
struct ItemsResponse {
    #[serde(default)]
    items: Vec<RawItem>,
    #[serde(default)]
    page_context: Option<PageContext>,
}

#[derive(Debug, Deserialize)]
struct PageContext {
    #[serde(default)]
    has_more_page: bool,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    item_id: String,
    #[serde(default)]
    sku: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    rate: Option<f64>,
    #[serde(default)]
    purchase_rate: Option<f64>,
}

impl RawItem {
    /// Items without a SKU cannot participate in the join and are dropped
    /// at fetch time.
    fn into_target_item(self) -> Option<TargetItem> {
        let sku = self.sku.filter(|sku| !sku.is_empty())?;
        Some(TargetItem {
            item_id: ItemId::new(self.item_id),
            sku: Sku::new(sku),
            name: self.name.unwrap_or_default(),
            rate: self.rate,
            purchase_rate: self.purchase_rate,
        })
    }
}

impl ZohoClient {
    /// Fetch the full active-item catalog, page by page.
    ///
    /// # Errors
    ///
    /// Returns `ZohoError` if any page request fails; partial pages are
    /// discarded.
    #[instrument(skip(self))]
    pub async fn list_active_items(&self) -> Result<Vec<TargetItem>, ZohoError> {
        let mut items = Vec::new();
        let mut page: u32 = 1;

        loop {
            let page_param = page.to_string();
            let per_page_param = PAGE_SIZE.to_string();
            let response: ItemsResponse = self
                .get_json(
                    "/items",
                    &[
                        ("filter_by", "Status.Active"),
                        ("page", page_param.as_str()),
                        ("per_page", per_page_param.as_str()),
                    ],
                )
                .await?;

            items.extend(response.items.into_iter().filter_map(RawItem::into_target_item));

            if response.page_context.is_some_and(|ctx| ctx.has_more_page) {
                page += 1;
            } else {
                break;
            }
        }

        Ok(items)
    }

    /// Look up a single item by SKU.
    ///
    /// Returns `Ok(None)` when no item carries the SKU - the caller decides
    /// whether that means "create it" (targeted sync) or "skip".
    ///
    /// # Errors
    ///
    /// Returns `ZohoError` if the lookup request fails.
    #[instrument(skip(self), fields(sku = %sku))]
    pub async fn get_item_by_sku(&self, sku: &Sku) -> Result<Option<TargetItem>, ZohoError> {
        let response: ItemsResponse = self.get_json("/items", &[("sku", sku.as_str())]).await?;

        let item = response
            .items
            .into_iter()
            .find_map(RawItem::into_target_item);

        if item.is_none() {
            debug!(sku = %sku, "item not found in Zoho");
        }

        Ok(item)
    }

    /// Apply a partial field update to an existing item.
    ///
    /// # Errors
    ///
    /// Returns `ZohoError::Api` on any non-200 response.
    #[instrument(skip(self, fields), fields(item_id = %item_id))]
    pub async fn update_item(
        &self,
        item_id: &ItemId,
        fields: &ItemFields,
    ) -> Result<(), ZohoError> {
        let body = serde_json::to_value(fields)
            .expect("ItemFields serialization is infallible");
        let path = format!("/items/{item_id}");

        let response = self.send(Method::PUT, &path, &[], Some(&body)).await?;

        let status = response.status();
        if status == StatusCode::OK {
            info!(item_id = %item_id, "updated item in Zoho");
            Ok(())
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ZohoError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Create a new item.
    ///
    /// A 400 response carrying Zoho's duplicate-SKU error code maps to
    /// [`CreateStatus::AlreadyExists`] rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `ZohoError::Api` on any other non-201 response.
    #[instrument(skip(self, payload), fields(sku = %payload.sku))]
    pub async fn create_item(&self, payload: &CreatePayload) -> Result<CreateStatus, ZohoError> {
        let body = serde_json::to_value(payload)
            .expect("CreatePayload serialization is infallible");

        let response = self.send(Method::POST, "/items", &[], Some(&body)).await?;

        let status = response.status();
        if status == StatusCode::CREATED {
            info!(sku = %payload.sku, "created item in Zoho");
            return Ok(CreateStatus::Created);
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if status == StatusCode::BAD_REQUEST && error_code(&text) == Some(DUPLICATE_SKU_CODE) {
            return Ok(CreateStatus::AlreadyExists);
        }

        Err(ZohoError::Api {
            status: status.as_u16(),
            body: text,
        })
    }
}

/// Extract the vendor error `code` from a response body, if present.
fn error_code(body: &str) -> Option<i64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("code")?
        .as_i64()
}
