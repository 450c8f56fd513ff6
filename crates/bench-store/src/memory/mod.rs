//! Implementaciones en memoria de los stores.
//! Sirven para tests y para la cadena de conexión de desarrollo.

pub mod blob;
pub mod table;

pub use blob::InMemoryBlobStore;
pub use table::{InMemoryTableStore, TableCallStats, TableOp};
