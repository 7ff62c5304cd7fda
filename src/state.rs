use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::Store;
use crate::services::{AccountService, PolicyService};

/// Shared handles passed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub accounts: AccountService,
    pub policies: PolicyService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> anyhow::Result<Self> {
        let accounts = AccountService::new(store.clone(), &config.security)?;
        let policies = PolicyService::new(store.clone());

        Ok(Self {
            config: Arc::new(config),
            store,
            accounts,
            policies,
        })
    }
}
