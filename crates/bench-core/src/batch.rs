//! Acumulador de lotes transaccionales.
//!
//! Contrato:
//! - `push` añade al buffer y, cuando su tamaño llega al umbral, envía todo
//!   como una sola transacción.
//! - El buffer se vacía tras cada envío, también si falla: semántica
//!   at-most-once, los registros de un lote fallido se pierden.
//! - Al terminar, el resto parcial se envía o se descarta según
//!   `RemainderPolicy`.

use std::sync::Arc;

use bench_domain::FileMetadataRecord;
use bench_store::table::MAX_BATCH_ACTIONS;
use bench_store::{StoreError, TableEntity, TableStore};
use log::{debug, error, warn};

use crate::errors::CoreError;
use crate::mapping::record_to_entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemainderPolicy {
    /// Enviar el lote parcial final.
    #[default]
    Flush,
    /// Descartar el lote parcial final sin enviarlo.
    Drop,
}

/// Resultado de un envío.
#[derive(Debug, Clone, PartialEq)]
pub struct FlushOutcome {
    pub attempted: usize,
    pub inserted: usize,
    pub error: Option<StoreError>,
}

/// Contadores acumulados del acumulador.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub flushes: usize,
    pub inserted: usize,
    pub failed: usize,
    pub dropped: usize,
}

pub struct BatchAccumulator {
    store: Arc<dyn TableStore>,
    table: String,
    threshold: usize,
    buffer: Vec<FileMetadataRecord>,
    stats: BatchStats,
}

impl BatchAccumulator {
    pub fn new(store: Arc<dyn TableStore>, table: impl Into<String>, threshold: usize) -> Result<Self, CoreError> {
        if threshold == 0 || threshold > MAX_BATCH_ACTIONS {
            return Err(CoreError::InvalidSetting(format!("batch size must be within 1..={MAX_BATCH_ACTIONS}, got {threshold}")));
        }
        Ok(Self { store, table: table.into(), threshold, buffer: Vec::with_capacity(threshold), stats: BatchStats::default() })
    }

    pub fn threshold(&self) -> usize { self.threshold }

    pub fn pending(&self) -> usize { self.buffer.len() }

    pub fn stats(&self) -> BatchStats { self.stats }

    /// Añade un registro; devuelve el resultado del envío si se disparó uno.
    pub async fn push(&mut self, record: FileMetadataRecord) -> Option<FlushOutcome> {
        self.buffer.push(record);
        if self.buffer.len() % self.threshold == 0 {
            Some(self.flush().await)
        } else {
            None
        }
    }

    /// Cierra el acumulador aplicando la política sobre el resto parcial.
    pub async fn finish(mut self, policy: RemainderPolicy) -> (BatchStats, Option<FlushOutcome>) {
        if self.buffer.is_empty() {
            return (self.stats, None);
        }
        match policy {
            RemainderPolicy::Flush => {
                let outcome = self.flush().await;
                (self.stats, Some(outcome))
            }
            RemainderPolicy::Drop => {
                warn!("dropping {} buffered records for table {} (partial batch)", self.buffer.len(), self.table);
                self.stats.dropped += self.buffer.len();
                self.buffer.clear();
                (self.stats, None)
            }
        }
    }

    async fn flush(&mut self) -> FlushOutcome {
        let records = std::mem::take(&mut self.buffer);
        self.stats.flushes += 1;
        let attempted = records.len();
        let mut entities: Vec<TableEntity> = Vec::with_capacity(attempted);
        for record in &records {
            match record_to_entity(record) {
                Ok(entity) => entities.push(entity),
                Err(e) => error!("cannot map record {} for table {}: {e}", record.row_key(), self.table),
            }
        }
        let unmapped = attempted - entities.len();
        let result = if entities.is_empty() {
            Err(StoreError::InvalidBatch("no mappable records in batch".into()))
        } else {
            self.store.submit_add_batch(&self.table, entities).await
        };
        match result {
            Ok(inserted) => {
                debug!("batch inserted table={} count={inserted}", self.table);
                self.stats.inserted += inserted;
                self.stats.failed += unmapped;
                FlushOutcome { attempted, inserted, error: None }
            }
            Err(e) => {
                error!("Error inserting batch into table {}: {e}", self.table);
                self.stats.failed += attempted;
                FlushOutcome { attempted, inserted: 0, error: Some(e) }
            }
        }
    }
}
