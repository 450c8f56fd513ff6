use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::keys::{partition_key, row_key};
use crate::DomainError;

/// Nombres de las propiedades por las que se filtra en la tabla.
pub const LOCAL_PATH_PROPERTY: &str = "LocalPath";
pub const CLUSTER_NAME_PROPERTY: &str = "KustoClusterName";

/// Datos de entrada para crear un registro. Las claves no se aceptan aquí:
/// siempre se derivan de `cluster_name` y `local_path`.
#[derive(Debug, Clone)]
pub struct NewFileMetadata {
    pub cluster_name: String,
    pub local_path: String,
    pub log_type_name: String,
    pub tier: i32,
    pub database_name: String,
    pub table_name: String,
    pub storage_account_name: String,
    pub container_name: String,
    pub file_size_in_bytes: i64,
    pub operation_id: Option<String>,
    pub created_on: DateTime<Utc>,
    pub enqueue_time: DateTime<Utc>,
}

/// Metadatos de un fichero ingerido; una entidad por fichero.
///
/// Invariantes:
/// - `(partition_key, row_key)` se derivan al crear y no cambian después.
/// - `retry_count` sólo crece.
/// - `should_not_retry`, una vez `true`, no vuelve a `false`.
///
/// `etag` y `timestamp` los asigna el store; se leen pero nunca se escriben.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileMetadataRecord {
    partition_key: String,
    row_key: String,
    #[serde(skip)]
    etag: Option<String>,
    #[serde(skip)]
    timestamp: Option<DateTime<Utc>>,
    local_path: String,
    created_on: DateTime<Utc>,
    enqueue_time: DateTime<Utc>,
    log_type_name: String,
    tier: i32,
    #[serde(rename = "KustoClusterName")]
    cluster_name: String,
    #[serde(rename = "KustoDatabaseName")]
    database_name: String,
    #[serde(rename = "KustoTableName")]
    table_name: String,
    #[serde(default)]
    operation_id: Option<String>,
    last_updated_time: DateTime<Utc>,
    should_not_retry: bool,
    storage_account_name: String,
    container_name: String,
    file_size_in_bytes: i64,
    retry_count: u32,
}

impl FileMetadataRecord {
    pub fn new(input: NewFileMetadata) -> Result<Self, DomainError> {
        if input.cluster_name.is_empty() {
            return Err(DomainError::ValidationError("cluster name must not be empty".to_string()));
        }
        if input.local_path.is_empty() {
            return Err(DomainError::ValidationError("local path must not be empty".to_string()));
        }
        if input.file_size_in_bytes < 0 {
            return Err(DomainError::ValidationError(format!("negative file size: {}", input.file_size_in_bytes)));
        }
        Ok(Self {
            partition_key: partition_key(&input.cluster_name),
            row_key: row_key(&input.cluster_name, &input.local_path),
            etag: None,
            timestamp: None,
            local_path: input.local_path,
            created_on: input.created_on,
            enqueue_time: input.enqueue_time,
            log_type_name: input.log_type_name,
            tier: input.tier,
            cluster_name: input.cluster_name,
            database_name: input.database_name,
            table_name: input.table_name,
            operation_id: input.operation_id,
            last_updated_time: Utc::now(),
            should_not_retry: false,
            storage_account_name: input.storage_account_name,
            container_name: input.container_name,
            file_size_in_bytes: input.file_size_in_bytes,
            retry_count: 0,
        })
    }

    pub fn partition_key(&self) -> &str { &self.partition_key }
    pub fn row_key(&self) -> &str { &self.row_key }
    pub fn etag(&self) -> Option<&str> { self.etag.as_deref() }
    pub fn timestamp(&self) -> Option<DateTime<Utc>> { self.timestamp }
    pub fn local_path(&self) -> &str { &self.local_path }
    pub fn created_on(&self) -> DateTime<Utc> { self.created_on }
    pub fn enqueue_time(&self) -> DateTime<Utc> { self.enqueue_time }
    pub fn log_type_name(&self) -> &str { &self.log_type_name }
    pub fn tier(&self) -> i32 { self.tier }
    pub fn cluster_name(&self) -> &str { &self.cluster_name }
    pub fn database_name(&self) -> &str { &self.database_name }
    pub fn table_name(&self) -> &str { &self.table_name }
    pub fn operation_id(&self) -> Option<&str> { self.operation_id.as_deref() }
    pub fn last_updated_time(&self) -> DateTime<Utc> { self.last_updated_time }
    pub fn should_not_retry(&self) -> bool { self.should_not_retry }
    pub fn storage_account_name(&self) -> &str { &self.storage_account_name }
    pub fn container_name(&self) -> &str { &self.container_name }
    pub fn file_size_in_bytes(&self) -> i64 { self.file_size_in_bytes }
    pub fn retry_count(&self) -> u32 { self.retry_count }

    /// Registra un reintento y devuelve el contador nuevo.
    pub fn record_retry(&mut self) -> u32 {
        self.retry_count = self.retry_count.saturating_add(1);
        self.last_updated_time = Utc::now();
        self.retry_count
    }

    /// Marca el registro como no reintentable. Irreversible.
    pub fn mark_should_not_retry(&mut self) {
        self.should_not_retry = true;
        self.last_updated_time = Utc::now();
    }

    pub fn set_operation_id(&mut self, operation_id: impl Into<String>) {
        self.operation_id = Some(operation_id.into());
        self.last_updated_time = Utc::now();
    }

    /// Bolsa de propiedades plana (nombres PascalCase) para el store.
    pub fn to_properties(&self) -> Result<Map<String, Value>, DomainError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(DomainError::ValidationError(format!("record did not serialize to an object: {other}"))),
        }
    }

    /// Reconstruye un registro leído del store, conservando etag y timestamp.
    pub fn from_properties(properties: Map<String, Value>,
                           etag: Option<String>,
                           timestamp: Option<DateTime<Utc>>)
                           -> Result<Self, DomainError> {
        let mut record: Self = serde_json::from_value(Value::Object(properties))?;
        record.etag = etag;
        record.timestamp = timestamp;
        Ok(record)
    }
}
