use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::query::TableQuery;
use crate::table::{EntityPage, TableEntity, TableStore, MAX_BATCH_ACTIONS};
use crate::StoreError;

/// Tamaño de página por defecto de las consultas.
pub const DEFAULT_QUERY_PAGE_SIZE: usize = 1000;

type Rows = BTreeMap<(String, String), TableEntity>;

/// Operaciones del store, usadas para contar llamadas e inyectar fallos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableOp {
    CreateTable,
    AddEntity,
    SubmitBatch,
    GetEntity,
    Query,
}

/// Contadores de llamadas (incluye las que fallaron).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCallStats {
    pub create_table: usize,
    pub add_entity: usize,
    pub submit_batch: usize,
    pub get_entity: usize,
    pub query_pages: usize,
}

/// Store de tablas en memoria.
///
/// - Filas ordenadas por `(partition_key, row_key)` dentro de cada tabla.
/// - Lotes atómicos: si una clave ya existe (o se repite en el lote) no se
///   inserta nada.
/// - Registra el contenido de cada lote enviado, aunque falle.
#[derive(Default)]
pub struct InMemoryTableStore {
    tables: DashMap<String, Rows>,
    failures: DashMap<TableOp, StoreError>,
    version: AtomicU64,
    create_calls: AtomicUsize,
    add_calls: AtomicUsize,
    batch_calls: AtomicUsize,
    get_calls: AtomicUsize,
    query_calls: AtomicUsize,
    batches: Mutex<Vec<Vec<(String, String)>>>,
}

impl InMemoryTableStore {
    pub fn new() -> Self { Self::default() }

    /// A partir de ahora `op` falla con `err` hasta `clear_failure`.
    pub fn fail_with(&self, op: TableOp, err: StoreError) { self.failures.insert(op, err); }

    pub fn clear_failure(&self, op: TableOp) { self.failures.remove(&op); }

    pub fn stats(&self) -> TableCallStats {
        TableCallStats { create_table: self.create_calls.load(Ordering::SeqCst),
                         add_entity: self.add_calls.load(Ordering::SeqCst),
                         submit_batch: self.batch_calls.load(Ordering::SeqCst),
                         get_entity: self.get_calls.load(Ordering::SeqCst),
                         query_pages: self.query_calls.load(Ordering::SeqCst) }
    }

    /// Claves de cada lote enviado, en orden de llegada.
    pub async fn submitted_batches(&self) -> Vec<Vec<(String, String)>> { self.batches.lock().await.clone() }

    pub fn table_exists(&self, table: &str) -> bool { self.tables.contains_key(table) }

    pub fn row_count(&self, table: &str) -> usize { self.tables.get(table).map(|t| t.len()).unwrap_or(0) }

    pub fn entities(&self, table: &str) -> Vec<TableEntity> {
        self.tables.get(table).map(|t| t.values().cloned().collect()).unwrap_or_default()
    }

    fn injected(&self, op: TableOp) -> Result<(), StoreError> {
        match self.failures.get(&op) {
            Some(err) => Err(err.value().clone()),
            None => Ok(()),
        }
    }

    fn stamp(&self, mut entity: TableEntity) -> TableEntity {
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        entity.etag = Some(format!("W/\"datetime'{}'-{version}\"", now.to_rfc3339()));
        entity.timestamp = Some(now);
        entity
    }

    fn already_exists(table: &str, key: &(String, String)) -> StoreError {
        StoreError::EntityAlreadyExists { table: table.to_string(),
                                          partition_key: key.0.clone(),
                                          row_key: key.1.clone() }
    }
}

#[async_trait]
impl TableStore for InMemoryTableStore {
    async fn create_table_if_not_exists(&self, table: &str) -> Result<bool, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.injected(TableOp::CreateTable)?;
        if table.is_empty() {
            return Err(StoreError::InvalidRequest("table name must not be empty".into()));
        }
        match self.tables.entry(table.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(Rows::new());
                Ok(true)
            }
        }
    }

    async fn add_entity(&self, table: &str, entity: TableEntity) -> Result<TableEntity, StoreError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        self.injected(TableOp::AddEntity)?;
        let mut rows = self.tables
                           .get_mut(table)
                           .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        let key = entity.key();
        if rows.contains_key(&key) {
            return Err(Self::already_exists(table, &key));
        }
        let stored = self.stamp(entity);
        rows.insert(key, stored.clone());
        Ok(stored)
    }

    async fn submit_add_batch(&self, table: &str, entities: Vec<TableEntity>) -> Result<usize, StoreError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().await.push(entities.iter().map(TableEntity::key).collect());
        self.injected(TableOp::SubmitBatch)?;
        if entities.is_empty() {
            return Err(StoreError::InvalidBatch("empty batch".into()));
        }
        if entities.len() > MAX_BATCH_ACTIONS {
            return Err(StoreError::InvalidBatch(format!("{} actions exceed the limit of {MAX_BATCH_ACTIONS}",
                                                        entities.len())));
        }
        let mut rows = self.tables
                           .get_mut(table)
                           .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        // validar todo antes de escribir nada
        let mut seen = std::collections::HashSet::new();
        for entity in &entities {
            let key = entity.key();
            if rows.contains_key(&key) || !seen.insert(key.clone()) {
                return Err(Self::already_exists(table, &key));
            }
        }
        let count = entities.len();
        for entity in entities {
            let stored = self.stamp(entity);
            rows.insert(stored.key(), stored);
        }
        Ok(count)
    }

    async fn get_entity(&self, table: &str, partition_key: &str, row_key: &str) -> Result<TableEntity, StoreError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.injected(TableOp::GetEntity)?;
        let rows = self.tables
                       .get(table)
                       .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        rows.get(&(partition_key.to_string(), row_key.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::EntityNotFound { table: table.to_string(),
                                                        partition_key: partition_key.to_string(),
                                                        row_key: row_key.to_string() })
    }

    async fn query_page(&self,
                        table: &str,
                        query: &TableQuery,
                        continuation: Option<&str>)
                        -> Result<EntityPage, StoreError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.injected(TableOp::Query)?;
        let page_size = query.page_size.unwrap_or(DEFAULT_QUERY_PAGE_SIZE);
        if page_size == 0 {
            return Err(StoreError::InvalidRequest("page size must be positive".into()));
        }
        let start = match continuation {
            Some(token) => {
                let key: (String, String) = serde_json::from_str(token)
                    .map_err(|e| StoreError::InvalidRequest(format!("bad continuation token: {e}")))?;
                Bound::Included(key)
            }
            None => Bound::Unbounded,
        };
        let rows = self.tables
                       .get(table)
                       .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        let mut matching = rows.range((start, Bound::Unbounded))
                               .map(|(_, e)| e)
                               .filter(|e| query.matches(e));
        let entities: Vec<TableEntity> = matching.by_ref().take(page_size).cloned().collect();
        let continuation = match matching.next() {
            Some(next) => Some(serde_json::to_string(&next.key())
                .map_err(|e| StoreError::request_failed(500, format!("continuation encoding: {e}")))?),
            None => None,
        };
        Ok(EntityPage { entities, continuation })
    }
}
