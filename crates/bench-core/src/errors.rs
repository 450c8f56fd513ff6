//! Errores específicos del core (simples por ahora).

use bench_domain::DomainError;
use bench_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid setting: {0}")] InvalidSetting(String),
    #[error(transparent)] Domain(#[from] DomainError),
    #[error(transparent)] Store(#[from] StoreError),
}
