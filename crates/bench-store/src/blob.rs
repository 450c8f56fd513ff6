//! Listado paginado de blobs con cancelación cooperativa.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;

use crate::cancel::CancelToken;
use crate::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobItem {
    pub name: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobPage {
    pub items: Vec<BlobItem>,
    pub continuation: Option<String>,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Una página de blobs cuyo nombre empieza por `prefix`, en orden de nombre.
    async fn list_blobs_page(&self,
                             container: &str,
                             prefix: &str,
                             page_size: usize,
                             continuation: Option<&str>)
                             -> Result<BlobPage, StoreError>;
}

/// Iterador explícito de páginas. Antes de cada petición consulta el token y
/// falla con `StoreError::Cancelled` si la señal ya se disparó.
pub struct BlobPager {
    store: Arc<dyn BlobStore>,
    container: String,
    prefix: String,
    page_size: usize,
    cancel: CancelToken,
    continuation: Option<String>,
    exhausted: bool,
}

impl BlobPager {
    pub fn new(store: Arc<dyn BlobStore>,
               container: impl Into<String>,
               prefix: impl Into<String>,
               page_size: usize,
               cancel: CancelToken)
               -> Self {
        Self { store,
               container: container.into(),
               prefix: prefix.into(),
               page_size,
               cancel,
               continuation: None,
               exhausted: false }
    }

    pub async fn next_page(&mut self) -> Result<Option<BlobPage>, StoreError> {
        self.cancel.check()?;
        if self.exhausted {
            return Ok(None);
        }
        let page = self.store
                       .list_blobs_page(&self.container, &self.prefix, self.page_size, self.continuation.as_deref())
                       .await?;
        debug!("blob page container={} prefix={} items={} more={}",
               self.container,
               self.prefix,
               page.items.len(),
               page.continuation.is_some());
        self.continuation = page.continuation.clone();
        self.exhausted = self.continuation.is_none();
        Ok(Some(page))
    }
}
