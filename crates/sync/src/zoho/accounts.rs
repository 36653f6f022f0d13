//! Chart-of-accounts lookup for the Zoho Books API.
//!
//! Used once at startup to resolve the purchase account referenced by
//! cost updates and create payloads, when it is not pinned in config.

use serde::Deserialize;
use tracing::instrument;

use stocklink_core::AccountId;

use super::ZohoError;
use super::client::ZohoClient;

/// Account type whose first entry is used as the purchase account.
const PURCHASE_ACCOUNT_TYPE: &str = "Cost of Goods Sold";

#[derive(Debug, Deserialize)]
struct ChartOfAccountsResponse {
    #[serde(default)]
    chartofaccounts: Vec<RawAccount>,
}

#[derive(Debug, Deserialize)]
struct RawAccount {
    account_id: String,
    #[serde(default)]
    account_type: Option<String>,
}

impl ZohoClient {
    /// Resolve the purchase account from the chart of accounts.
    ///
    /// Picks the first account typed "Cost of Goods Sold".
    ///
    /// # Errors
    ///
    /// Returns `ZohoError::NotFound` when no such account exists, or
    /// `ZohoError` if the lookup request fails.
    #[instrument(skip(self))]
    pub async fn find_purchase_account(&self) -> Result<AccountId, ZohoError> {
        let response: ChartOfAccountsResponse = self.get_json("/chartofaccounts", &[]).await?;

        response
            .chartofaccounts
            .into_iter()
            .find(|account| account.account_type.as_deref() == Some(PURCHASE_ACCOUNT_TYPE))
            .map(|account| AccountId::new(account.account_id))
            .ok_or_else(|| ZohoError::NotFound(format!("'{PURCHASE_ACCOUNT_TYPE}' account")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_of_accounts_parsing() {
        let response: ChartOfAccountsResponse = serde_json::from_value(serde_json::json!({
            "code": 0,
            "chartofaccounts": [
                {"account_id": "1", "account_type": "Income"},
                {"account_id": "2", "account_type": "Cost of Goods Sold"}
            ]
        }))
        .expect("deserialize");

        let cogs = response
            .chartofaccounts
            .iter()
            .find(|a| a.account_type.as_deref() == Some(PURCHASE_ACCOUNT_TYPE))
            .expect("cogs account");
        assert_eq!(cogs.account_id, "2");
    }
}
