//! Contrato del cliente de tablas.
//!
//! Modela las operaciones que consume el harness: crear tabla si no existe,
//! insertar una entidad, enviar un lote de inserciones como una transacción,
//! leer por clave y consultar con filtro de forma paginada.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::query::TableQuery;
use crate::StoreError;

/// Máximo de acciones por transacción de lote.
pub const MAX_BATCH_ACTIONS: usize = 100;

/// Entidad dinámica: claves + bolsa de propiedades.
/// `etag` y `timestamp` los asigna el store al insertar.
#[derive(Debug, Clone, PartialEq)]
pub struct TableEntity {
    pub partition_key: String,
    pub row_key: String,
    pub etag: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub properties: Map<String, Value>,
}

impl TableEntity {
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>, properties: Map<String, Value>) -> Self {
        Self { partition_key: partition_key.into(),
               row_key: row_key.into(),
               etag: None,
               timestamp: None,
               properties }
    }

    pub fn key(&self) -> (String, String) { (self.partition_key.clone(), self.row_key.clone()) }
}

/// Una página de resultados más el token para pedir la siguiente.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityPage {
    pub entities: Vec<TableEntity>,
    pub continuation: Option<String>,
}

#[async_trait]
pub trait TableStore: Send + Sync {
    /// Idempotente. Devuelve `true` si la tabla se creó en esta llamada.
    async fn create_table_if_not_exists(&self, table: &str) -> Result<bool, StoreError>;

    /// Inserta una entidad; falla con `EntityAlreadyExists` si la clave existe.
    async fn add_entity(&self, table: &str, entity: TableEntity) -> Result<TableEntity, StoreError>;

    /// Inserta todas las entidades o ninguna.
    async fn submit_add_batch(&self, table: &str, entities: Vec<TableEntity>) -> Result<usize, StoreError>;

    async fn get_entity(&self, table: &str, partition_key: &str, row_key: &str) -> Result<TableEntity, StoreError>;

    async fn query_page(&self,
                        table: &str,
                        query: &TableQuery,
                        continuation: Option<&str>)
                        -> Result<EntityPage, StoreError>;
}

/// Secuencia perezosa de páginas de una consulta.
pub struct QueryPager<'a> {
    store: &'a dyn TableStore,
    table: &'a str,
    query: &'a TableQuery,
    continuation: Option<String>,
    exhausted: bool,
    pages_fetched: usize,
}

impl<'a> QueryPager<'a> {
    pub fn new(store: &'a dyn TableStore, table: &'a str, query: &'a TableQuery) -> Self {
        Self { store, table, query, continuation: None, exhausted: false, pages_fetched: 0 }
    }

    pub fn pages_fetched(&self) -> usize { self.pages_fetched }

    pub async fn next_page(&mut self) -> Result<Option<Vec<TableEntity>>, StoreError> {
        if self.exhausted {
            return Ok(None);
        }
        let page = self.store
                       .query_page(self.table, self.query, self.continuation.as_deref())
                       .await?;
        self.pages_fetched += 1;
        self.continuation = page.continuation;
        self.exhausted = self.continuation.is_none();
        Ok(Some(page.entities))
    }

    /// `true` en cuanto alguna página trae una entidad; no pide más páginas.
    pub async fn any(&mut self) -> Result<bool, StoreError> {
        while let Some(entities) = self.next_page().await? {
            if !entities.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub async fn collect_all(&mut self) -> Result<Vec<TableEntity>, StoreError> {
        let mut out = Vec::new();
        while let Some(entities) = self.next_page().await? {
            out.extend(entities);
        }
        Ok(out)
    }
}
