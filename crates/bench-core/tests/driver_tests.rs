use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bench_core::{run_insertion_comparison, DriverSettings, FailurePolicy, RemainderPolicy, Strategy, StrategyDriver};
use bench_domain::Workload;
use bench_store::{EntityPage, InMemoryTableStore, StoreError, TableEntity, TableOp, TableQuery, TableStore};
use serde_json::Map;

/// Delega en un store en memoria; puede simular que toda clave ya existe y
/// retrasar la creación de tablas.
struct ScriptedStore {
    inner: InMemoryTableStore,
    report_hits: bool,
    create_delay: Duration,
}

impl ScriptedStore {
    fn new(report_hits: bool, create_delay: Duration) -> Self {
        Self { inner: InMemoryTableStore::new(), report_hits, create_delay }
    }
}

#[async_trait]
impl TableStore for ScriptedStore {
    async fn create_table_if_not_exists(&self, table: &str) -> Result<bool, StoreError> {
        tokio::time::sleep(self.create_delay).await;
        self.inner.create_table_if_not_exists(table).await
    }

    async fn add_entity(&self, table: &str, entity: TableEntity) -> Result<TableEntity, StoreError> {
        self.inner.add_entity(table, entity).await
    }

    async fn submit_add_batch(&self, table: &str, entities: Vec<TableEntity>) -> Result<usize, StoreError> {
        self.inner.submit_add_batch(table, entities).await
    }

    async fn get_entity(&self, table: &str, partition_key: &str, row_key: &str) -> Result<TableEntity, StoreError> {
        if self.report_hits {
            return Ok(TableEntity::new(partition_key, row_key, Map::new()));
        }
        self.inner.get_entity(table, partition_key, row_key).await
    }

    async fn query_page(&self,
                        table: &str,
                        query: &TableQuery,
                        continuation: Option<&str>)
                        -> Result<EntityPage, StoreError> {
        if self.report_hits {
            return Ok(EntityPage { entities: vec![TableEntity::new("pk", "rk", Map::new())], continuation: None });
        }
        self.inner.query_page(table, query, continuation).await
    }
}

fn small_settings(batch_size: usize) -> DriverSettings {
    DriverSettings { table_base: "InsertTest".into(),
                     workload: Workload::new(&["cluster1", "cluster2"], &["logtype1", "logtype2"], 3),
                     batch_size,
                     remainder: RemainderPolicy::Flush,
                     on_check_failure: FailurePolicy::TreatAsAbsent }
}

#[tokio::test]
async fn end_to_end_twelve_records_in_three_flushes() {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = Arc::new(InMemoryTableStore::new());
    let driver = StrategyDriver::new(store.clone(), small_settings(4)).unwrap();
    for strategy in [Strategy::BatchedScan, Strategy::BatchedLookup] {
        let report = driver.run(strategy).await.unwrap();
        let table = driver.table_for(strategy);
        assert_eq!(report.generated, 12);
        assert_eq!(report.flushes, 3, "{strategy:?}");
        assert_eq!(report.inserted, 12);
        assert_eq!(report.insert_failures, 0);
        assert!(report.table_ready);

        let stored: HashSet<(String, String)> =
            store.entities(&table).into_iter().map(|e| (e.partition_key, e.row_key)).collect();
        assert_eq!(stored.len(), 12, "all 12 generated keys stored without duplicates");
    }
    let batches = store.submitted_batches().await;
    assert_eq!(batches.len(), 6);
    assert!(batches.iter().all(|b| b.len() == 4));
    let flushed: HashSet<(String, String)> = batches[..3].iter().flatten().cloned().collect();
    assert_eq!(flushed.len(), 12);
    let stats = store.stats();
    assert_eq!(stats.get_entity, 12, "point lookup once per record");
}

#[tokio::test]
async fn naive_strategy_inserts_individually() {
    let store = Arc::new(InMemoryTableStore::new());
    let driver = StrategyDriver::new(store.clone(), small_settings(4)).unwrap();
    let report = driver.run(Strategy::Naive).await.unwrap();
    assert_eq!(report.inserted, 12);
    assert_eq!(report.flushes, 0);
    let stats = store.stats();
    assert_eq!(stats.add_entity, 12);
    assert_eq!(stats.submit_batch, 0);
    assert_eq!(stats.query_pages, 12);
    assert_eq!(store.row_count("InsertTest"), 12);
}

#[tokio::test]
async fn remainder_policy_is_applied_by_batched_drivers() {
    let store = Arc::new(InMemoryTableStore::new());
    let mut settings = small_settings(5);
    settings.remainder = RemainderPolicy::Drop;
    let driver = StrategyDriver::new(store.clone(), settings).unwrap();
    let report = driver.run(Strategy::BatchedLookup).await.unwrap();
    assert_eq!(report.flushes, 2);
    assert_eq!(report.inserted, 10);
    assert_eq!(report.dropped, 2);

    let mut settings = small_settings(5);
    settings.table_base = "Flushed".into();
    let driver = StrategyDriver::new(store.clone(), settings).unwrap();
    let report = driver.run(Strategy::BatchedLookup).await.unwrap();
    assert_eq!(report.flushes, 3);
    assert_eq!(report.inserted, 12);
    assert_eq!(store.row_count("Flushed2"), 12);
}

#[tokio::test]
async fn failure_policy_decides_on_indeterminate_checks() {
    let store = Arc::new(InMemoryTableStore::new());
    store.fail_with(TableOp::Query, StoreError::request_failed(503, "busy"));

    let driver = StrategyDriver::new(store.clone(), small_settings(4)).unwrap();
    let report = driver.run(Strategy::BatchedScan).await.unwrap();
    assert_eq!(report.indeterminate, 12);
    assert_eq!(report.inserted, 12, "source behaviour: failed check means absent");

    let mut settings = small_settings(4);
    settings.on_check_failure = FailurePolicy::SkipRecord;
    settings.table_base = "Skip".into();
    let driver = StrategyDriver::new(store.clone(), settings).unwrap();
    let report = driver.run(Strategy::BatchedScan).await.unwrap();
    assert_eq!(report.indeterminate, 12);
    assert_eq!(report.skipped_on_failure, 12);
    assert_eq!(report.inserted, 0);
    assert_eq!(report.flushes, 0);
}

#[tokio::test]
async fn table_creation_failure_surfaces_as_insert_failures() {
    let store = Arc::new(InMemoryTableStore::new());
    store.fail_with(TableOp::CreateTable, StoreError::request_failed(403, "forbidden"));
    let driver = StrategyDriver::new(store.clone(), small_settings(4)).unwrap();

    let report = driver.run(Strategy::Naive).await.unwrap();
    assert!(!report.table_ready);
    assert_eq!(report.inserted, 0);
    assert_eq!(report.insert_failures, 12);

    let report = driver.run(Strategy::BatchedLookup).await.unwrap();
    assert_eq!(report.flushes, 3);
    assert_eq!(report.insert_failures, 12);
}

#[tokio::test]
async fn comparison_runs_all_strategies_in_order() {
    let store = Arc::new(InMemoryTableStore::new());
    let reports = run_insertion_comparison(store.clone(), small_settings(4)).await.unwrap();
    let order: Vec<Option<Strategy>> = reports.iter().map(|r| r.strategy).collect();
    assert_eq!(order, vec![Some(Strategy::Naive), Some(Strategy::BatchedScan), Some(Strategy::BatchedLookup)]);
    for table in ["InsertTest", "InsertTest1", "InsertTest2"] {
        assert_eq!(store.row_count(table), 12, "{table}");
    }
}

#[tokio::test]
async fn comparison_rejects_bad_settings() {
    let store = Arc::new(InMemoryTableStore::new());
    assert!(run_insertion_comparison(store, small_settings(0)).await.is_err());
}

#[tokio::test]
async fn existing_records_are_never_inserted() {
    let store = Arc::new(ScriptedStore::new(true, Duration::ZERO));
    let driver = StrategyDriver::new(store.clone(), small_settings(4)).unwrap();
    for strategy in Strategy::ALL {
        let report = driver.run(strategy).await.unwrap();
        assert_eq!(report.generated, 12, "{strategy:?}");
        assert_eq!(report.existing, 12, "{strategy:?}");
        assert_eq!(report.inserted, 0, "{strategy:?}");
        assert_eq!(report.insert_failures, 0, "{strategy:?}");
        assert_eq!(report.flushes, 0, "{strategy:?}");
    }
    let stats = store.inner.stats();
    assert_eq!(stats.add_entity, 0);
    assert_eq!(stats.submit_batch, 0);
    assert_eq!(store.inner.row_count("InsertTest"), 0);
}

#[tokio::test(start_paused = true)]
async fn elapsed_excludes_table_provisioning() {
    let store = Arc::new(ScriptedStore::new(false, Duration::from_secs(30)));
    let driver = StrategyDriver::new(store.clone(), small_settings(4)).unwrap();
    let started = tokio::time::Instant::now();
    let report = driver.run(Strategy::BatchedLookup).await.unwrap();
    assert!(report.table_ready);
    assert_eq!(report.inserted, 12);
    assert!(started.elapsed() >= Duration::from_secs(30));
    assert!(report.elapsed < Duration::from_secs(30));
}
