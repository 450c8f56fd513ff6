//! Drivers de estrategia.
//!
//! Cada driver recorre la carga completa, comprueba existencia con su
//! variante y, si procede, inserta al momento (naive) o acumula en lotes.
//! El tiempo se mide desde que la tabla está aprovisionada hasta el último
//! envío. Los drivers se ejecutan secuencialmente.

use std::sync::Arc;
use std::time::Duration;

use bench_domain::{FileMetadataRecord, Workload};
use bench_store::table::MAX_BATCH_ACTIONS;
use bench_store::TableStore;
use log::{error, info};
use tokio::time::Instant;

use crate::batch::{BatchAccumulator, RemainderPolicy};
use crate::constants::{DEFAULT_BATCH_SIZE, DEFAULT_TABLE_NAME};
use crate::errors::CoreError;
use crate::existence::{check_exists, Existence, ExistenceCheck, FailurePolicy};
use crate::mapping::record_to_entity;
use crate::provision::ensure_table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Consulta por campos + inserción individual.
    Naive,
    /// Consulta por clave + inserción en lotes.
    BatchedScan,
    /// Lectura por clave + inserción en lotes.
    BatchedLookup,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Naive, Strategy::BatchedScan, Strategy::BatchedLookup];

    pub fn existence_check(self) -> ExistenceCheck {
        match self {
            Strategy::Naive => ExistenceCheck::ScanByFields,
            Strategy::BatchedScan => ExistenceCheck::ScanByKey,
            Strategy::BatchedLookup => ExistenceCheck::PointLookup,
        }
    }

    pub fn table_suffix(self) -> &'static str {
        match self {
            Strategy::Naive => "",
            Strategy::BatchedScan => "1",
            Strategy::BatchedLookup => "2",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Strategy::Naive => "query by fields + single insert",
            Strategy::BatchedScan => "query by key + batch insert",
            Strategy::BatchedLookup => "point lookup + batch insert",
        }
    }

    pub fn is_batched(self) -> bool { !matches!(self, Strategy::Naive) }

    fn heading(self) -> &'static str {
        match self {
            Strategy::Naive => "original method",
            Strategy::BatchedScan => "method 1",
            Strategy::BatchedLookup => "method 2",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DriverSettings {
    pub table_base: String,
    pub workload: Workload,
    pub batch_size: usize,
    pub remainder: RemainderPolicy,
    pub on_check_failure: FailurePolicy,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self { table_base: DEFAULT_TABLE_NAME.to_string(),
               workload: Workload::default(),
               batch_size: DEFAULT_BATCH_SIZE,
               remainder: RemainderPolicy::default(),
               on_check_failure: FailurePolicy::default() }
    }
}

/// Resumen de una ejecución.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverReport {
    pub strategy: Option<Strategy>,
    pub table: String,
    pub table_ready: bool,
    pub generated: usize,
    pub invalid_records: usize,
    pub existing: usize,
    pub indeterminate: usize,
    pub skipped_on_failure: usize,
    pub inserted: usize,
    pub insert_failures: usize,
    pub flushes: usize,
    pub dropped: usize,
    pub elapsed: Duration,
}

pub struct StrategyDriver {
    store: Arc<dyn TableStore>,
    settings: DriverSettings,
}

impl StrategyDriver {
    pub fn new(store: Arc<dyn TableStore>, settings: DriverSettings) -> Result<Self, CoreError> {
        if settings.batch_size == 0 || settings.batch_size > MAX_BATCH_ACTIONS {
            return Err(CoreError::InvalidSetting(format!("batch size must be within 1..={MAX_BATCH_ACTIONS}, got {}",
                                                         settings.batch_size)));
        }
        if settings.table_base.is_empty() {
            return Err(CoreError::InvalidSetting("table name must not be empty".into()));
        }
        Ok(Self { store, settings })
    }

    pub fn settings(&self) -> &DriverSettings { &self.settings }

    pub fn table_for(&self, strategy: Strategy) -> String {
        format!("{}{}", self.settings.table_base, strategy.table_suffix())
    }

    /// Ejecuta las tres estrategias una detrás de otra.
    pub async fn run_all(&self) -> Result<Vec<DriverReport>, CoreError> {
        let mut reports = Vec::with_capacity(Strategy::ALL.len());
        for strategy in Strategy::ALL {
            reports.push(self.run(strategy).await?);
        }
        Ok(reports)
    }

    pub async fn run(&self, strategy: Strategy) -> Result<DriverReport, CoreError> {
        let table = self.table_for(strategy);
        let mut report = DriverReport { strategy: Some(strategy), table: table.clone(), ..Default::default() };
        report.table_ready = ensure_table(self.store.as_ref(), &table).await;
        let started = Instant::now();
        info!("Test {}: {}...", strategy.heading(), strategy.label());

        let mut accumulator = if strategy.is_batched() {
            Some(BatchAccumulator::new(self.store.clone(), table.clone(), self.settings.batch_size)?)
        } else {
            None
        };

        for item in self.settings.workload.items() {
            report.generated += 1;
            let record = match item.to_record() {
                Ok(record) => record,
                Err(e) => {
                    error!("cannot build record for {}/{}: {e}", item.cluster, item.local_path);
                    report.invalid_records += 1;
                    continue;
                }
            };
            let existence = check_exists(self.store.as_ref(), &table, strategy.existence_check(), &record).await;
            match &existence {
                Existence::Exists => report.existing += 1,
                Existence::Indeterminate(_) => report.indeterminate += 1,
                Existence::Absent => {}
            }
            if !existence.should_insert(self.settings.on_check_failure) {
                if matches!(existence, Existence::Indeterminate(_)) {
                    report.skipped_on_failure += 1;
                }
                continue;
            }
            match accumulator.as_mut() {
                Some(acc) => {
                    acc.push(record).await;
                }
                None => {
                    if self.insert_single(&table, &record).await {
                        report.inserted += 1;
                    } else {
                        report.insert_failures += 1;
                    }
                }
            }
        }

        if let Some(acc) = accumulator {
            let (stats, _) = acc.finish(self.settings.remainder).await;
            report.inserted += stats.inserted;
            report.insert_failures += stats.failed;
            report.flushes = stats.flushes;
            report.dropped = stats.dropped;
        }

        report.elapsed = started.elapsed();
        info!("Test {}: {}... Time elapsed: {}ms (generated={} inserted={} failed={} existing={} indeterminate={})",
              strategy.heading(),
              strategy.label(),
              report.elapsed.as_millis(),
              report.generated,
              report.inserted,
              report.insert_failures,
              report.existing,
              report.indeterminate);
        Ok(report)
    }

    async fn insert_single(&self, table: &str, record: &FileMetadataRecord) -> bool {
        let entity = match record_to_entity(record) {
            Ok(entity) => entity,
            Err(e) => {
                error!("cannot map record {} for table {table}: {e}", record.row_key());
                return false;
            }
        };
        match self.store.add_entity(table, entity).await {
            Ok(_) => true,
            Err(e) => {
                error!("Error inserting entity into table {table}: {e}");
                false
            }
        }
    }
}
