//! Comprobación de existencia previa a la inserción (tres variantes).
//!
//! - `ScanByFields`: consulta por ruta local y cluster, sin acotar por clave.
//!   La más cara: obliga a recorrer la tabla.
//! - `ScanByKey`: consulta con igualdad exacta de partition/row key, todavía
//!   expresada como filtro.
//! - `PointLookup`: lectura directa por clave.
//!
//! "No encontrado" nunca es un error: se traduce a `Existence::Absent`. El
//! resto de fallos queda como `Existence::Indeterminate` y es el llamador,
//! vía `FailurePolicy`, quien decide si equivale a "no existe".

use bench_domain::{FileMetadataRecord, CLUSTER_NAME_PROPERTY, LOCAL_PATH_PROPERTY};
use bench_store::{QueryPager, StoreError, TableQuery, TableStore};
use log::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistenceCheck {
    ScanByFields,
    ScanByKey,
    PointLookup,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Existence {
    Exists,
    Absent,
    /// El store falló por otra causa: no se sabe si existe.
    Indeterminate(StoreError),
}

/// Qué hacer cuando la comprobación no puede decidir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Se asume que no existe y se inserta.
    #[default]
    TreatAsAbsent,
    /// No se inserta el registro.
    SkipRecord,
}

impl Existence {
    pub fn should_insert(&self, policy: FailurePolicy) -> bool {
        match self {
            Existence::Exists => false,
            Existence::Absent => true,
            Existence::Indeterminate(_) => policy == FailurePolicy::TreatAsAbsent,
        }
    }
}

impl ExistenceCheck {
    /// Consulta equivalente para las variantes de filtro.
    pub fn query_for(self, record: &FileMetadataRecord) -> Option<TableQuery> {
        match self {
            ExistenceCheck::ScanByFields => Some(TableQuery::new().eq(LOCAL_PATH_PROPERTY, record.local_path())
                                                                  .eq(CLUSTER_NAME_PROPERTY, record.cluster_name())),
            ExistenceCheck::ScanByKey => Some(TableQuery::keys(record.partition_key(), record.row_key())),
            ExistenceCheck::PointLookup => None,
        }
    }
}

pub async fn check_exists(store: &dyn TableStore,
                          table: &str,
                          method: ExistenceCheck,
                          record: &FileMetadataRecord)
                          -> Existence {
    let result = match method.query_for(record) {
        Some(query) => {
            debug!("existence query table={table} filter={}", query.render());
            QueryPager::new(store, table, &query).any().await
        }
        None => store.get_entity(table, record.partition_key(), record.row_key())
                     .await
                     .map(|_| true),
    };
    match result {
        Ok(true) => Existence::Exists,
        Ok(false) => Existence::Absent,
        Err(e) if e.is_not_found() => Existence::Absent,
        Err(e) => {
            error!("failed to check file metadata entity table={table} path={} method={method:?} err={e}",
                   record.local_path());
            Existence::Indeterminate(e)
        }
    }
}
