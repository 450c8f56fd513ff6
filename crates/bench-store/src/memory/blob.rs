use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::blob::{BlobItem, BlobPage, BlobStore};
use crate::StoreError;

/// Store de blobs en memoria: contenedores con blobs ordenados por nombre.
/// El token de continuación es el nombre del último blob devuelto.
#[derive(Default)]
pub struct InMemoryBlobStore {
    containers: DashMap<String, BTreeMap<String, BlobItem>>,
    list_calls: AtomicUsize,
    failure: Mutex<Option<StoreError>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self { Self::default() }

    pub fn create_container(&self, container: &str) { self.containers.entry(container.to_string()).or_default(); }

    /// Crea (o reemplaza) un blob; el contenedor se crea si falta.
    pub fn upload(&self, container: &str, name: &str, size: u64) {
        let item = BlobItem { name: name.to_string(), size, last_modified: Utc::now() };
        self.containers
            .entry(container.to_string())
            .or_default()
            .insert(name.to_string(), item);
    }

    pub fn list_calls(&self) -> usize { self.list_calls.load(Ordering::SeqCst) }

    /// Las siguientes peticiones de listado fallan con `err`; `None` lo desactiva.
    pub async fn set_failure(&self, err: Option<StoreError>) { *self.failure.lock().await = err; }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn list_blobs_page(&self,
                             container: &str,
                             prefix: &str,
                             page_size: usize,
                             continuation: Option<&str>)
                             -> Result<BlobPage, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.failure.lock().await.clone() {
            return Err(err);
        }
        if page_size == 0 {
            return Err(StoreError::InvalidRequest("page size must be positive".into()));
        }
        let blobs = self.containers
                        .get(container)
                        .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;
        let start = match continuation {
            Some(last) => Bound::Excluded(last.to_string()),
            None => Bound::Included(prefix.to_string()),
        };
        let mut matching = blobs.range((start, Bound::Unbounded))
                                .map(|(_, item)| item)
                                .take_while(|item| item.name.starts_with(prefix));
        let items: Vec<BlobItem> = matching.by_ref().take(page_size).cloned().collect();
        let more = matching.next().is_some();
        let continuation = match (more, items.last()) {
            (true, Some(last)) => Some(last.name.clone()),
            _ => None,
        };
        Ok(BlobPage { items, continuation })
    }
}
