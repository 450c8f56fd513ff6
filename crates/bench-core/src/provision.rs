//! Aprovisionamiento idempotente de tablas.

use bench_store::TableStore;
use log::{debug, error};

/// Crea la tabla si no existe. Nunca propaga errores: si falla se registra y
/// el fallo aflora después, cuando fallen las inserciones.
/// Devuelve `true` si la tabla quedó disponible.
pub async fn ensure_table(store: &dyn TableStore, table: &str) -> bool {
    match store.create_table_if_not_exists(table).await {
        Ok(created) => {
            debug!("table {table} ready (created={created})");
            true
        }
        Err(e) => {
            error!("Error creating table {table}: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_store::{InMemoryTableStore, StoreError, TableOp};

    #[tokio::test]
    async fn ensure_table_is_idempotent() {
        let store = InMemoryTableStore::new();
        assert!(ensure_table(&store, "t").await);
        assert!(ensure_table(&store, "t").await);
        assert!(store.table_exists("t"));
    }

    #[tokio::test]
    async fn ensure_table_swallows_errors() {
        let store = InMemoryTableStore::new();
        store.fail_with(TableOp::CreateTable, StoreError::request_failed(403, "forbidden"));
        assert!(!ensure_table(&store, "t").await);
        assert!(!store.table_exists("t"));
    }
}
