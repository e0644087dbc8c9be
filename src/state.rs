//! Shared application state for all routes. Immutable after startup.

use crate::config::{ApiConfig, StoreConfig};
use crate::error::StoreError;
use crate::security::SecurityPolicy;
use crate::store::{CustomerStore, InMemoryCustomerStore, PgCustomerStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CustomerStore>,
    pub security: Arc<SecurityPolicy>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    /// State over an existing store; the security policy comes from the configured credentials.
    pub fn new(config: ApiConfig, store: Arc<dyn CustomerStore>) -> Self {
        let security = SecurityPolicy::customers(config.credentials.clone());
        AppState {
            store,
            security: Arc::new(security),
            config: Arc::new(config),
        }
    }

    pub fn in_memory(config: ApiConfig) -> Self {
        Self::new(config, Arc::new(InMemoryCustomerStore::new()))
    }

    /// Open the configured store (creating database and table when Postgres).
    pub async fn connect(config: ApiConfig) -> Result<Self, StoreError> {
        let store: Arc<dyn CustomerStore> = match &config.store {
            StoreConfig::Memory => {
                tracing::warn!("no DATABASE_URL configured; customers are kept in memory only");
                Arc::new(InMemoryCustomerStore::new())
            }
            StoreConfig::Postgres {
                database_url,
                max_connections,
            } => Arc::new(PgCustomerStore::connect(database_url, *max_connections).await?),
        };
        Ok(Self::new(config, store))
    }

    /// Replace the security policy, e.g. to grant the account a different role set.
    pub fn with_security(mut self, security: SecurityPolicy) -> Self {
        self.security = Arc::new(security);
        self
    }
}
