use thiserror::Error;
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    ValidationError(String),
    #[error("entity mapping: {0}")]
    Mapping(#[from] serde_json::Error),
}
