use bench_core::mapping::record_to_entity;
use bench_core::{check_exists, Existence, ExistenceCheck, FailurePolicy};
use bench_domain::{FileMetadataRecord, Workload};
use bench_store::{InMemoryTableStore, StoreError, TableOp, TableStore};

const CHECKS: [ExistenceCheck; 3] = [ExistenceCheck::ScanByFields, ExistenceCheck::ScanByKey, ExistenceCheck::PointLookup];

fn sample_record() -> FileMetadataRecord {
    Workload::new(&["cluster1"], &["logtype1"], 1).items().next().unwrap().to_record().unwrap()
}

#[tokio::test]
async fn absent_on_empty_store_without_table() {
    let store = InMemoryTableStore::new();
    let record = sample_record();
    for check in CHECKS {
        assert_eq!(check_exists(&store, "InsertTest", check, &record).await, Existence::Absent, "{check:?}");
    }
}

#[tokio::test]
async fn absent_on_empty_table() {
    let store = InMemoryTableStore::new();
    store.create_table_if_not_exists("InsertTest").await.unwrap();
    let record = sample_record();
    for check in CHECKS {
        let existence = check_exists(&store, "InsertTest", check, &record).await;
        assert_eq!(existence, Existence::Absent, "{check:?}");
        assert!(existence.should_insert(FailurePolicy::SkipRecord));
    }
}

#[tokio::test]
async fn exists_after_insert_for_every_variant() {
    let store = InMemoryTableStore::new();
    store.create_table_if_not_exists("InsertTest").await.unwrap();
    let record = sample_record();
    store.add_entity("InsertTest", record_to_entity(&record).unwrap()).await.unwrap();
    for check in CHECKS {
        assert_eq!(check_exists(&store, "InsertTest", check, &record).await, Existence::Exists, "{check:?}");
    }
    // otro registro del mismo cluster no debe coincidir
    let other = sample_record();
    for check in CHECKS {
        assert_eq!(check_exists(&store, "InsertTest", check, &other).await, Existence::Absent, "{check:?}");
    }
}

#[tokio::test]
async fn store_failures_are_indeterminate_and_collapse_to_absent_by_default() {
    let store = InMemoryTableStore::new();
    store.create_table_if_not_exists("InsertTest").await.unwrap();
    let busy = StoreError::request_failed(503, "server busy");
    store.fail_with(TableOp::Query, busy.clone());
    store.fail_with(TableOp::GetEntity, busy.clone());
    let record = sample_record();
    for check in CHECKS {
        let existence = check_exists(&store, "InsertTest", check, &record).await;
        assert_eq!(existence, Existence::Indeterminate(busy.clone()), "{check:?}");
        // comportamiento heredado: "no se pudo determinar" se trata como "no existe"
        assert!(existence.should_insert(FailurePolicy::TreatAsAbsent));
        assert!(!existence.should_insert(FailurePolicy::SkipRecord));
    }
}

#[tokio::test]
async fn scan_by_fields_does_not_use_keys() {
    let store = InMemoryTableStore::new();
    store.create_table_if_not_exists("InsertTest").await.unwrap();
    let record = sample_record();
    let mut entity = record_to_entity(&record).unwrap();
    // misma ruta y cluster bajo otra clave: sólo la variante por campos la ve
    entity.row_key = "different".into();
    store.add_entity("InsertTest", entity).await.unwrap();
    assert_eq!(check_exists(&store, "InsertTest", ExistenceCheck::ScanByFields, &record).await, Existence::Exists);
    assert_eq!(check_exists(&store, "InsertTest", ExistenceCheck::ScanByKey, &record).await, Existence::Absent);
    assert_eq!(check_exists(&store, "InsertTest", ExistenceCheck::PointLookup, &record).await, Existence::Absent);
}
