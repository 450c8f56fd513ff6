use std::sync::Arc;

use bench_store::{BlobPager, CancelSignal, InMemoryBlobStore, InMemoryTableStore, QueryPager, StoreError, TableEntity,
                  TableQuery, TableStore};
use serde_json::{json, Map};

fn entity(rk: &str, path: &str) -> TableEntity {
    let mut props = Map::new();
    props.insert("LocalPath".into(), json!(path));
    TableEntity::new("p", rk, props)
}

#[tokio::test]
async fn query_pager_any_stops_at_first_match() {
    let store = InMemoryTableStore::new();
    store.create_table_if_not_exists("t").await.unwrap();
    for i in 0..6 {
        store.add_entity("t", entity(&format!("r{i}"), "hit")).await.unwrap();
    }
    let q = TableQuery::new().eq("LocalPath", "hit").with_page_size(2);
    let mut pager = QueryPager::new(&store, "t", &q);
    assert!(pager.any().await.unwrap());
    assert_eq!(pager.pages_fetched(), 1);

    let mut all = QueryPager::new(&store, "t", &q);
    assert_eq!(all.collect_all().await.unwrap().len(), 6);
    assert_eq!(all.pages_fetched(), 3);
}

#[tokio::test]
async fn query_pager_reports_missing_table() {
    let store = InMemoryTableStore::new();
    let q = TableQuery::keys("p", "r");
    let mut pager = QueryPager::new(&store, "missing", &q);
    let err = pager.any().await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn blob_pager_walks_all_pages_then_ends() {
    let store = Arc::new(InMemoryBlobStore::new());
    for i in 0..3 {
        store.upload("local", &format!("TestLogType/{i}"), 1);
    }
    let signal = CancelSignal::new();
    let mut pager = BlobPager::new(store.clone(), "local", "TestLogType", 1, signal.token());
    let mut pages = 0;
    while let Some(page) = pager.next_page().await.unwrap() {
        assert_eq!(page.items.len(), 1);
        pages += 1;
    }
    assert_eq!(pages, 3);
    assert_eq!(store.list_calls(), 3);
}

#[tokio::test]
async fn blob_pager_checks_token_before_fetching() {
    let store = Arc::new(InMemoryBlobStore::new());
    for i in 0..3 {
        store.upload("local", &format!("TestLogType/{i}"), 1);
    }
    let signal = CancelSignal::new();
    let mut pager = BlobPager::new(store.clone(), "local", "TestLogType", 1, signal.token());
    assert!(pager.next_page().await.unwrap().is_some());
    signal.cancel();
    assert_eq!(pager.next_page().await.unwrap_err(), StoreError::Cancelled);
    assert_eq!(store.list_calls(), 1, "no fetch after cancellation");
}
