use std::sync::Arc;
use std::time::Duration;

use bench_core::probe::DelayOutcome;
use bench_core::{run_cancellation_probe, CancellationProbe, ProbeSettings, ProbeState};
use bench_store::{InMemoryBlobStore, StoreError};

fn store_with(count: usize) -> Arc<InMemoryBlobStore> {
    let store = Arc::new(InMemoryBlobStore::new());
    store.create_container("local");
    for i in 0..count {
        store.upload("local", &format!("TestLogType/{i:03}.log"), 128);
    }
    store.upload("local", "Unrelated/0.log", 1);
    store
}

#[tokio::test(start_paused = true)]
async fn third_page_triggers_cancellation_once() {
    let store = store_with(5);
    let mut probe = CancellationProbe::new(store.clone(), ProbeSettings::default());
    assert_eq!(probe.state(), ProbeState::Idle);
    let report = probe.run().await.unwrap();

    assert_eq!(report.outcome, ProbeState::Cancelled);
    assert_eq!(report.pages_seen, 3);
    assert_eq!(report.triggers, 1);
    assert_eq!(report.delays, vec![DelayOutcome::Completed, DelayOutcome::Completed, DelayOutcome::Cancelled]);
    assert_eq!(report.transitions,
               vec![ProbeState::Idle,
                    ProbeState::Paging(1),
                    ProbeState::Paging(2),
                    ProbeState::Paging(3),
                    ProbeState::Cancelling,
                    ProbeState::Cancelled]);
    assert_eq!(store.list_calls(), 3, "no page fetched after cancellation");
    // dos esperas completas de 10s; la tercera no llega a completarse
    assert!(report.elapsed >= Duration::from_secs(20));
    assert!(report.elapsed < Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn short_listing_completes_without_trigger() {
    let store = store_with(2);
    let report = run_cancellation_probe(store, ProbeSettings::default()).await.unwrap();
    assert_eq!(report.outcome, ProbeState::Completed);
    assert_eq!(report.pages_seen, 2);
    assert_eq!(report.blobs_seen, 2);
    assert_eq!(report.triggers, 0);
    assert!(report.delays.iter().all(|d| *d == DelayOutcome::Completed));
}

#[tokio::test(start_paused = true)]
async fn threshold_zero_cancels_on_first_page() {
    let store = store_with(4);
    let settings = ProbeSettings { cancel_after_pages: 0, page_size: 2, ..Default::default() };
    let report = run_cancellation_probe(store, settings).await.unwrap();
    assert_eq!(report.outcome, ProbeState::Cancelled);
    assert_eq!(report.pages_seen, 1);
    assert_eq!(report.blobs_seen, 2);
    assert_eq!(report.delays, vec![DelayOutcome::Cancelled]);
}

#[tokio::test(start_paused = true)]
async fn other_store_errors_propagate() {
    let store = Arc::new(InMemoryBlobStore::new());
    let err = run_cancellation_probe(store.clone(), ProbeSettings::default()).await.unwrap_err();
    assert_eq!(err, StoreError::ContainerNotFound("local".into()));

    store.create_container("local");
    store.set_failure(Some(StoreError::request_failed(503, "throttled"))).await;
    let err = run_cancellation_probe(store, ProbeSettings::default()).await.unwrap_err();
    assert_eq!(err.status(), 503);
}

#[tokio::test(start_paused = true)]
async fn repeated_runs_start_from_idle() {
    let store = store_with(5);
    let mut probe = CancellationProbe::new(store.clone(), ProbeSettings::default());
    let first = probe.run().await.unwrap();
    assert_eq!(probe.state(), ProbeState::Cancelled);

    let second = probe.run().await.unwrap();
    assert_eq!(second.transitions, first.transitions);
    assert_eq!(second.transitions[0], ProbeState::Idle);
    assert_eq!(second.pages_seen, 3);
    assert_eq!(second.triggers, 1);
    assert_eq!(store.list_calls(), 6);
}
