//! Errores de los stores.
//! Las variantes distinguen "no encontrado" del resto de fallos para que el
//! llamador decida explícitamente cómo colapsarlos.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("table not found: {0}")]
    TableNotFound(String),
    #[error("entity not found: {table} ({partition_key}, {row_key})")]
    EntityNotFound { table: String, partition_key: String, row_key: String },
    #[error("entity already exists: {table} ({partition_key}, {row_key})")]
    EntityAlreadyExists { table: String, partition_key: String, row_key: String },
    #[error("container not found: {0}")]
    ContainerNotFound(String),
    #[error("invalid batch: {0}")]
    InvalidBatch(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("request failed (status {status}): {message}")]
    RequestFailed { status: u16, message: String },
    #[error("operation cancelled")]
    Cancelled,
    #[error("configuration error: {0}")]
    Config(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl StoreError {
    /// `true` para cualquier 404 del store (tabla, entidad o contenedor).
    pub fn is_not_found(&self) -> bool {
        matches!(self,
                 StoreError::TableNotFound(_) | StoreError::EntityNotFound { .. } | StoreError::ContainerNotFound(_))
    }

    pub fn is_cancelled(&self) -> bool { matches!(self, StoreError::Cancelled) }

    /// Código de estado equivalente al de un servicio HTTP.
    pub fn status(&self) -> u16 {
        match self {
            StoreError::TableNotFound(_) | StoreError::EntityNotFound { .. } | StoreError::ContainerNotFound(_) => 404,
            StoreError::EntityAlreadyExists { .. } => 409,
            StoreError::InvalidBatch(_) | StoreError::InvalidRequest(_) => 400,
            StoreError::RequestFailed { status, .. } => *status,
            StoreError::Cancelled => 499,
            StoreError::Config(_) | StoreError::Unsupported(_) => 500,
        }
    }

    pub fn request_failed(status: u16, message: impl Into<String>) -> Self {
        StoreError::RequestFailed { status, message: message.into() }
    }
}
