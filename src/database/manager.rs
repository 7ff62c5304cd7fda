use std::sync::Arc;
use tracing::{info, warn};

use super::{DatabaseError, MemoryStore, PgStore, Store};
use crate::config::DatabaseConfig;

/// Selects and opens the configured store
pub struct DatabaseManager;

impl DatabaseManager {
    /// Connect to Postgres when a URL is configured, otherwise fall back to
    /// the in-memory store.
    pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn Store>, DatabaseError> {
        match config.url.as_deref() {
            Some(url) => {
                info!("Connecting to PostgreSQL at {}", Self::redact_url(url)?);
                let store = PgStore::connect(url, config).await?;
                store.migrate().await?;
                Ok(Arc::new(store))
            }
            None => {
                warn!("DATABASE_URL not set; using in-memory store, data will not survive a restart");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }

    /// Connection string with the password removed, for logs
    pub fn redact_url(raw: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if url.password().is_some() {
            url.set_password(Some("****")).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(url.into())
    }
}
