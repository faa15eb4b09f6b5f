//! Server state shared by every handler

use std::sync::Arc;

use anyhow::Context;

use crate::core::{Config, Result};
use crate::documents::{FileStore, LocalFileStore};
use crate::orders::OrderReconciler;
use crate::store::Store;

/// Handler state
///
/// Cheap to clone: every field is an `Arc` or wraps one.
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub store: Store,
    pub file_store: Arc<dyn FileStore>,
    pub reconciler: OrderReconciler,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// Open the database and upload directory under `WORK_DIR`
    pub fn initialize(config: &Config) -> Result<Self> {
        for dir in [config.work_dir(), config.uploads_dir()] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let store = Store::open(config.database_path())?;
        let rates = store.rate_table()?;
        tracing::info!(
            database = %config.database_path().display(),
            rate_table_version = rates.version,
            "Store opened"
        );

        Ok(Self::with_parts(
            config.clone(),
            store,
            Arc::new(LocalFileStore::new(config.uploads_dir())),
        ))
    }

    pub fn with_parts(config: Config, store: Store, file_store: Arc<dyn FileStore>) -> Self {
        Self {
            config: Arc::new(config),
            reconciler: OrderReconciler::new(store.clone()),
            store,
            file_store,
        }
    }
}
