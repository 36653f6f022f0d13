//! Application state shared across handlers.

use std::sync::Arc;

use tracing::info;

use stocklink_core::AccountRefs;

use crate::config::SyncConfig;
use crate::error::AppError;
use crate::lightspeed::LightspeedClient;
use crate::zoho::ZohoClient;

/// Application state shared across all handlers.
///
/// Cheap to clone; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SyncConfig,
    lightspeed: LightspeedClient,
    zoho: ZohoClient,
    accounts: AccountRefs,
}

impl AppState {
    /// Build the application state: construct both vendor clients and
    /// resolve the account references used by cost updates and creates.
    ///
    /// The purchase account comes from config when pinned there, otherwise
    /// from a one-time chart-of-accounts lookup.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Zoho` if the chart-of-accounts lookup is needed
    /// and fails.
    pub async fn new(config: SyncConfig) -> Result<Self, AppError> {
        let lightspeed = LightspeedClient::new(config.lightspeed.clone());
        let zoho = ZohoClient::new(config.zoho.clone());

        let purchase_account_id = match config.zoho.purchase_account_id.clone() {
            Some(id) => id,
            None => {
                let id = zoho.find_purchase_account().await?;
                info!(account_id = %id, "resolved purchase account from chart of accounts");
                id
            }
        };

        let accounts = AccountRefs {
            purchase_account_id,
            inventory_account_id: config.zoho.inventory_account_id.clone(),
        };

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                lightspeed,
                zoho,
                accounts,
            }),
        })
    }

    /// Returns a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    /// Returns a reference to the Lightspeed client.
    #[must_use]
    pub fn lightspeed(&self) -> &LightspeedClient {
        &self.inner.lightspeed
    }

    /// Returns a reference to the Zoho client.
    #[must_use]
    pub fn zoho(&self) -> &ZohoClient {
        &self.inner.zoho
    }

    /// Returns the resolved account references.
    #[must_use]
    pub fn accounts(&self) -> &AccountRefs {
        &self.inner.accounts
    }
}
