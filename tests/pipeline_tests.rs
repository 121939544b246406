//! End-to-end runs of the orchestrator against in-memory S3/SNS.

mod common;

use common::{
    GatedPublisher, MemoryStore, RecordingPublisher, object_key, objects, run_config,
};
use crossbeam_channel::{bounded, never};
use s3replay::pipeline::Orchestrator;
use s3replay::{ObjectDescriptor, RunOutcome, replay_prefix};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn run(
    store: &Arc<MemoryStore>,
    publisher: &Arc<RecordingPublisher>,
    concurrency: usize,
    limit: Option<u64>,
) -> anyhow::Result<RunOutcome> {
    Orchestrator::new(
        run_config("logs", "raw/", concurrency, limit),
        store.clone(),
        publisher.clone(),
    )
    .run(&never())
}

// --- successful runs ---

#[test]
fn test_three_objects_two_workers() {
    let store = Arc::new(MemoryStore::single_page(objects(&[
        ("raw/a.gz", 100),
        ("raw/b.gz", 200),
        ("raw/c.gz", 300),
    ])));
    let publisher = Arc::new(RecordingPublisher::new());

    let outcome = run(&store, &publisher, 2, None).unwrap();

    assert!(!outcome.is_interrupted());
    let stats = outcome.report().stats;
    assert_eq!(stats.files_processed, 3);
    assert_eq!(stats.bytes_processed, 600);
    assert_eq!(publisher.calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        publisher.published_keys(),
        vec!["raw/a.gz", "raw/b.gz", "raw/c.gz"]
    );
}

#[test]
fn test_messages_go_to_topic_arn() {
    let store = Arc::new(MemoryStore::single_page(objects(&[("raw/a.gz", 1)])));
    let publisher = Arc::new(RecordingPublisher::new());

    run(&store, &publisher, 1, None).unwrap();

    let messages = publisher.messages.lock().unwrap();
    assert_eq!(
        messages[0].0,
        "arn:aws:sns:us-east-1:123456789012:processed-data"
    );
}

#[test]
fn test_limit_stops_listing_early() {
    let store = Arc::new(MemoryStore::new(vec![
        objects(&[("raw/a", 10), ("raw/b", 20), ("raw/c", 30)]),
        objects(&[("raw/d", 40), ("raw/e", 50)]),
    ]));
    let publisher = Arc::new(RecordingPublisher::new());

    let outcome = run(&store, &publisher, 2, Some(2)).unwrap();

    let stats = outcome.report().stats;
    assert_eq!(stats.files_processed, 2);
    assert_eq!(stats.bytes_processed, 30);
    assert_eq!(store.fetches(), 1);
    assert_eq!(publisher.published_keys(), vec!["raw/a", "raw/b"]);
}

#[test]
fn test_limit_spanning_pages() {
    let store = Arc::new(MemoryStore::new(vec![
        objects(&[("raw/a", 1), ("raw/b", 1)]),
        objects(&[("raw/c", 1), ("raw/d", 1)]),
        objects(&[("raw/e", 1)]),
    ]));
    let publisher = Arc::new(RecordingPublisher::new());

    let outcome = run(&store, &publisher, 3, Some(3)).unwrap();

    assert_eq!(outcome.report().stats.files_processed, 3);
    assert_eq!(store.fetches(), 2);
}

#[test]
fn test_limit_larger_than_listing() {
    let store = Arc::new(MemoryStore::single_page(objects(&[("raw/a", 5), ("raw/b", 6)])));
    let publisher = Arc::new(RecordingPublisher::new());

    let outcome = run(&store, &publisher, 4, Some(100)).unwrap();

    assert_eq!(outcome.report().stats.files_processed, 2);
    assert_eq!(outcome.report().stats.bytes_processed, 11);
}

#[test]
fn test_empty_prefix_is_success() {
    let store = Arc::new(MemoryStore::single_page(Vec::new()));
    let publisher = Arc::new(RecordingPublisher::new());

    let outcome = run(&store, &publisher, 8, None).unwrap();

    assert_eq!(outcome.report().stats.files_processed, 0);
    assert_eq!(outcome.report().stats.bytes_processed, 0);
    assert_eq!(publisher.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_many_pages_many_workers_counts_everything() {
    let pages: Vec<Vec<ObjectDescriptor>> = (0..20_u64)
        .map(|p| {
            (0..50_u64)
                .map(|i| ObjectDescriptor::new(format!("raw/{p}/{i}"), p * 50 + i))
                .collect::<Vec<_>>()
        })
        .collect();
    let expected_bytes: u64 = (0..1000_u64).sum();
    let store = Arc::new(MemoryStore::new(pages));

    for concurrency in [1, 3, 16, 64] {
        let publisher = Arc::new(RecordingPublisher::new());
        let outcome = run(&store, &publisher, concurrency, None).unwrap();
        let stats = outcome.report().stats;
        assert_eq!(stats.files_processed, 1000, "concurrency {concurrency}");
        assert_eq!(stats.bytes_processed, expected_bytes, "concurrency {concurrency}");
        assert_eq!(publisher.calls.load(Ordering::SeqCst), 1000);
    }
}

#[test]
fn test_folder_markers_are_not_replayed() {
    let store = Arc::new(MemoryStore::single_page(objects(&[
        ("raw/", 0),
        ("raw/2024/", 0),
        ("raw/2024/a.json", 42),
    ])));
    let publisher = Arc::new(RecordingPublisher::new());

    let outcome = run(&store, &publisher, 2, None).unwrap();

    assert_eq!(outcome.report().stats.files_processed, 1);
    assert_eq!(publisher.published_keys(), vec!["raw/2024/a.json"]);
}

#[test]
fn test_progress_callback_sees_every_publish() {
    let store = Arc::new(MemoryStore::single_page(objects(&[
        ("raw/a", 1),
        ("raw/b", 1),
        ("raw/c", 1),
        ("raw/d", 1),
    ])));
    let seen = Arc::new(AtomicUsize::new(0));
    let seen_cb = Arc::clone(&seen);

    let outcome = Orchestrator::new(
        run_config("logs", "raw/", 3, None),
        store,
        Arc::new(RecordingPublisher::new()),
    )
    .with_progress(Arc::new(move |n| {
        seen_cb.fetch_add(n, Ordering::SeqCst);
    }))
    .run(&never())
    .unwrap();

    assert_eq!(outcome.report().stats.files_processed, 4);
    assert_eq!(seen.load(Ordering::SeqCst), 4);
}

#[test]
fn test_replay_prefix_entry_point() {
    let store = Arc::new(MemoryStore::single_page(objects(&[("raw/a", 7), ("raw/b", 8)])));
    let publisher = Arc::new(RecordingPublisher::new());

    let report = replay_prefix(run_config("logs", "raw/", 2, None), store, publisher).unwrap();

    assert_eq!(report.stats.files_processed, 2);
    assert_eq!(report.stats.bytes_processed, 15);
}

// --- failures ---

#[test]
fn test_publish_failure_halts_single_worker() {
    let store = Arc::new(MemoryStore::single_page(objects(&[
        ("raw/a", 100),
        ("raw/b", 200),
        ("raw/c", 300),
    ])));
    let publisher = Arc::new(RecordingPublisher::failing_on("raw/b"));
    let orchestrator = Orchestrator::new(
        run_config("logs", "raw/", 1, None),
        store,
        publisher.clone(),
    );
    let stats = orchestrator.stats();

    let err = orchestrator.run(&never()).unwrap_err();

    let msg = format!("{err:#}");
    assert!(msg.contains("publish raw/b"), "{msg}");
    assert!(msg.contains("AuthorizationError"), "{msg}");
    assert_eq!(stats.snapshot().files_processed, 1);
    assert_eq!(stats.snapshot().bytes_processed, 100);
    // raw/c is never attempted.
    assert_eq!(publisher.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_publish_failure_with_many_workers_reports_error() {
    let many: Vec<_> = (0..500)
        .map(|i| ObjectDescriptor::new(format!("raw/{i:04}"), 1))
        .collect();
    let store = Arc::new(MemoryStore::single_page(many));
    let publisher = Arc::new(RecordingPublisher::failing_on("raw/0010"));
    let orchestrator = Orchestrator::new(
        run_config("logs", "raw/", 4, None),
        store,
        publisher.clone(),
    );
    let stats = orchestrator.stats();

    assert!(orchestrator.run(&never()).is_err());

    let snapshot = stats.snapshot();
    assert!(snapshot.files_processed < 500);
    assert_eq!(snapshot.files_processed, snapshot.bytes_processed);
    assert_eq!(
        snapshot.files_processed as usize,
        publisher.messages.lock().unwrap().len()
    );
    assert!(!publisher.published_keys().contains(&"raw/0010".to_string()));
}

#[test]
fn test_listing_failure_is_run_error() {
    let store = Arc::new(
        MemoryStore::new(vec![
            objects(&[("raw/a", 1), ("raw/b", 2)]),
            objects(&[("raw/c", 3)]),
        ])
        .failing_at(1),
    );
    let publisher = Arc::new(RecordingPublisher::new());

    let err = run(&store, &publisher, 2, None).unwrap_err();

    let msg = format!("{err:#}");
    assert!(msg.contains("list s3://logs/raw/"), "{msg}");
    assert!(msg.contains("connection reset"), "{msg}");
    assert!(publisher.calls.load(Ordering::SeqCst) <= 2);
}

#[test]
fn test_first_page_failure_publishes_nothing() {
    let store = Arc::new(MemoryStore::single_page(objects(&[("raw/a", 1)])).failing_at(0));
    let publisher = Arc::new(RecordingPublisher::new());

    assert!(run(&store, &publisher, 2, None).is_err());
    assert_eq!(publisher.calls.load(Ordering::SeqCst), 0);
}

// --- interrupt ---

#[test]
fn test_interrupt_reports_without_draining() {
    let many: Vec<_> = (0..100)
        .map(|i| ObjectDescriptor::new(format!("raw/{i}"), 10))
        .collect();
    let store = Arc::new(MemoryStore::single_page(many));
    let (gate_tx, gate_rx) = bounded::<()>(0);
    let publisher = Arc::new(GatedPublisher { gate: gate_rx });
    let (interrupt_tx, interrupt_rx) = bounded::<()>(1);
    interrupt_tx.send(()).unwrap();

    let outcome = Orchestrator::new(run_config("logs", "raw/", 2, None), store, publisher)
        .run(&interrupt_rx)
        .unwrap();

    assert!(outcome.is_interrupted());
    assert_eq!(outcome.report().stats.files_processed, 0);
    drop(gate_tx);
}

#[test]
fn test_dropped_interrupt_sender_still_drains() {
    let store = Arc::new(MemoryStore::single_page(objects(&[("raw/a", 1), ("raw/b", 1)])));
    let (interrupt_tx, interrupt_rx) = bounded::<()>(1);
    drop(interrupt_tx);

    let outcome = Orchestrator::new(
        run_config("logs", "raw/", 2, None),
        store,
        Arc::new(RecordingPublisher::new()),
    )
    .run(&interrupt_rx)
    .unwrap();

    assert!(!outcome.is_interrupted());
    assert_eq!(outcome.report().stats.files_processed, 2);
}

#[test]
fn test_published_message_is_object_event() {
    let store = Arc::new(MemoryStore::single_page(objects(&[("raw/x.log", 9)])));
    let publisher = Arc::new(RecordingPublisher::new());

    run(&store, &publisher, 1, None).unwrap();

    let messages = publisher.messages.lock().unwrap();
    assert_eq!(object_key(&messages[0].1), "raw/x.log");
}
