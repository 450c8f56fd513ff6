//! bench-store
//!
//! Contratos de los clientes de almacenamiento que usa el harness y sus
//! implementaciones en memoria.
//!
//! Módulos:
//! - `table`: trait `TableStore`, entidades y paginado de consultas.
//! - `query`: filtros de igualdad y su render estilo OData.
//! - `blob`: trait `BlobStore` y `BlobPager` cancelable.
//! - `cancel`: señal de cancelación cooperativa (un escritor, N lectores).
//! - `memory`: stores en memoria (tests y almacenamiento de desarrollo).
//! - `config`: cadena de conexión desde `.env` / entorno.
//! - `backend`: construcción de los clientes a partir de la configuración.

pub mod backend;
pub mod blob;
pub mod cancel;
pub mod config;
pub mod error;
pub mod memory;
pub mod query;
pub mod table;

pub use backend::{connect_stores, StoreClients};
pub use blob::{BlobItem, BlobPage, BlobPager, BlobStore};
pub use cancel::{CancelSignal, CancelToken};
pub use config::{ConnectionString, StorageConfig};
pub use error::StoreError;
pub use memory::{InMemoryBlobStore, InMemoryTableStore, TableOp};
pub use query::TableQuery;
pub use table::{EntityPage, QueryPager, TableEntity, TableStore};
