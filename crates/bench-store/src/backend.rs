//! Construcción de los clientes a partir de la configuración.

use std::sync::Arc;

use log::info;

use crate::blob::BlobStore;
use crate::config::StorageConfig;
use crate::memory::{InMemoryBlobStore, InMemoryTableStore};
use crate::table::TableStore;
use crate::StoreError;

/// Clientes inyectados en drivers y sonda; viven lo que viva el proceso.
#[derive(Clone)]
pub struct StoreClients {
    pub tables: Arc<dyn TableStore>,
    pub blobs: Arc<dyn BlobStore>,
}

impl StoreClients {
    pub fn in_memory() -> Self {
        Self { tables: Arc::new(InMemoryTableStore::new()), blobs: Arc::new(InMemoryBlobStore::new()) }
    }
}

/// Sólo el almacenamiento de desarrollo está soportado: se sirve en memoria.
pub fn connect_stores(config: &StorageConfig) -> Result<StoreClients, StoreError> {
    if config.connection.is_development() {
        info!("using in-memory development storage");
        return Ok(StoreClients::in_memory());
    }
    Err(StoreError::Unsupported(format!("no remote storage client available for account {}",
                                        config.connection.account_name().unwrap_or("<unknown>"))))
}
