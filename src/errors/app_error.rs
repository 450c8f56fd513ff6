use bench_core::CoreError;
use bench_store::StoreError;
use thiserror::Error;

/// Errores del binario: arranque, configuración y rutinas.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Error de almacenamiento: {0}")]
    Store(#[from] StoreError),
    #[error("Error de benchmark: {0}")]
    Core(#[from] CoreError),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
}
