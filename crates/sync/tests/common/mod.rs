//! Common test utilities for stocklink-sync integration tests.

// Not every test binary exercises every helper.
#![allow(dead_code)]

use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stocklink_core::{AccountId, AccountRefs};
use stocklink_sync::config::{LightspeedConfig, ZohoConfig};

/// Lightspeed account ID used across tests.
pub const LS_ACCOUNT_ID: &str = "292471";

/// Zoho organization ID used across tests.
pub const ZOHO_ORG_ID: &str = "762023225";

/// Lightspeed config pointing at a mock server.
pub fn lightspeed_config(server: &MockServer) -> LightspeedConfig {
    LightspeedConfig {
        account_id: LS_ACCOUNT_ID.to_string(),
        client_id: "test-client".to_string(),
        client_secret: SecretString::from("test-client-cs"),
        refresh_token: SecretString::from("test-refresh"),
        api_url: server.uri(),
        token_url: format!("{}/oauth/access_token.php", server.uri()),
    }
}

/// Zoho config pointing at a mock server.
pub fn zoho_config(server: &MockServer) -> ZohoConfig {
    ZohoConfig {
        organization_id: ZOHO_ORG_ID.to_string(),
        client_id: "test-client".to_string(),
        client_secret: SecretString::from("test-client-cs"),
        refresh_token: SecretString::from("test-refresh"),
        redirect_uri: None,
        api_url: server.uri(),
        token_url: format!("{}/oauth/v2/token", server.uri()),
        purchase_account_id: Some(AccountId::new("acc-purchase")),
        inventory_account_id: AccountId::new("acc-inventory"),
    }
}

/// Account references used across tests.
pub fn account_refs() -> AccountRefs {
    AccountRefs {
        purchase_account_id: AccountId::new("acc-purchase"),
        inventory_account_id: AccountId::new("acc-inventory"),
    }
}

/// Mount the Lightspeed OAuth token endpoint, expecting `expected_grants`
/// token requests.
pub async fn mount_lightspeed_token(server: &MockServer, expected_grants: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth/access_token.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "ls-token", "expires_in": 3600})),
        )
        .expect(expected_grants)
        .mount(server)
        .await;
}

/// Mount the Zoho OAuth token endpoint with no call-count expectation.
pub async fn mount_zoho_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/v2/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "zoho-token", "expires_in": 3600})),
        )
        .mount(server)
        .await;
}

/// Test data factory for a Lightspeed item.
pub fn lightspeed_item(sku: &str, description: &str, cost: &str, price: &str) -> Value {
    json!({
        "itemID": "101",
        "description": description,
        "manufacturerSku": sku,
        "defaultCost": cost,
        "Prices": {
            "ItemPrice": [
                {"amount": price, "useType": "Default"},
                {"amount": "999.99", "useType": "MSRP"}
            ]
        }
    })
}

/// Wraps items in a Lightspeed list response, with an optional next link.
pub fn lightspeed_page(items: Vec<Value>, next: Option<&str>) -> Value {
    let mut attributes = json!({"count": items.len().to_string()});
    if let Some(next) = next {
        attributes["next"] = json!(next);
    }
    json!({"@attributes": attributes, "Item": items})
}

/// Test data factory for a Zoho item.
pub fn zoho_item(item_id: &str, sku: &str, name: &str, cost: f64, rate: f64) -> Value {
    json!({
        "item_id": item_id,
        "sku": sku,
        "name": name,
        "rate": rate,
        "purchase_rate": cost,
        "status": "active"
    })
}

/// Wraps items in a Zoho list response with page context.
pub fn zoho_page(items: Vec<Value>, page: u32, has_more_page: bool) -> Value {
    json!({
        "code": 0,
        "message": "success",
        "items": items,
        "page_context": {"page": page, "per_page": 200, "has_more_page": has_more_page}
    })
}
