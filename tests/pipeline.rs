//! End-to-end pipeline tests: write path through ingestion into the log
//! and live stream, read path through snapshot and session reconciliation.

use std::sync::Arc;

use financial_monitor::broadcast::Broadcaster;
use financial_monitor::ingestion::IngestionService;
use financial_monitor::model::{RawTransaction, TransactionStatus};
use financial_monitor::reconcile::{MonitorSession, SessionEvent};
use financial_monitor::snapshot::SnapshotReader;
use financial_monitor::store::TransactionLog;

struct Harness {
    ingestion: IngestionService,
    reader: SnapshotReader,
    hub: Broadcaster,
}

fn harness() -> Harness {
    let log = Arc::new(TransactionLog::new());
    let hub = Broadcaster::new(256);
    Harness {
        ingestion: IngestionService::new(Arc::clone(&log), hub.clone()),
        reader: SnapshotReader::new(log),
        hub,
    }
}

fn raw(json: &str) -> RawTransaction {
    serde_json::from_str(json).unwrap()
}

#[tokio::test]
async fn ingested_failed_transaction_appears_in_snapshot() {
    let h = harness();
    h.ingestion.ingest(raw(
        r#"{"id":"tx-1","amount":"50","currency":"USD","status":"Failed"}"#,
    ));

    let snapshot = h.reader.get_all();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, "tx-1");
    assert_eq!(snapshot[0].status, TransactionStatus::Failed);
}

#[tokio::test]
async fn unparseable_status_normalizes_to_pending_end_to_end() {
    let h = harness();
    h.ingestion.ingest(raw(r#"{"id":"tx-1","status":"xyz"}"#));
    assert_eq!(h.reader.get_all()[0].status, TransactionStatus::Pending);
}

#[tokio::test]
async fn session_merges_snapshot_with_live_stream_without_duplicates() {
    let h = harness();

    // History before the viewer shows up.
    h.ingestion.ingest(raw(r#"{"id":"tx-1","amount":"50"}"#));

    let mut session = MonitorSession::new(h.reader.clone(), h.hub.clone(), 100);
    session.start().unwrap();

    // The overlap case: tx-1 arrives again live, then a new tx-2 is
    // written through the normal ingestion path.
    h.hub.publish(h.reader.get_all()[0].clone());
    h.ingestion.ingest(raw(r#"{"id":"tx-2","amount":"75"}"#));

    assert!(matches!(
        session.recv().await.unwrap(),
        SessionEvent::Duplicate(_)
    ));
    assert!(matches!(
        session.recv().await.unwrap(),
        SessionEvent::Applied(_)
    ));

    let ids: Vec<_> = session.view().raw_list().map(|t| t.id.clone()).collect();
    assert_eq!(ids, vec!["tx-2", "tx-1"]);
}

#[tokio::test]
async fn filter_returns_only_matching_status() {
    let h = harness();
    h.ingestion.ingest(raw(r#"{"id":"p","status":"Pending"}"#));
    h.ingestion.ingest(raw(r#"{"id":"c","status":"Completed"}"#));
    h.ingestion.ingest(raw(r#"{"id":"f","status":"Failed"}"#));

    let mut session = MonitorSession::new(h.reader.clone(), h.hub.clone(), 100);
    session.start().unwrap();

    session
        .view_mut()
        .set_filter(Some(TransactionStatus::Completed));
    let filtered = session.view().list();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, "c");
}

#[tokio::test]
async fn snapshot_serializes_status_as_string_name() {
    let h = harness();
    h.ingestion.ingest(raw(r#"{"id":"tx-1","status":"Completed"}"#));

    let json = serde_json::to_value(h.reader.get_all()).unwrap();
    assert_eq!(json[0]["status"], "Completed");
}

#[tokio::test]
async fn concurrent_writers_all_land_in_snapshot() {
    let h = harness();
    let ingestion = h.ingestion.clone();

    let mut handles = Vec::new();
    for w in 0..10 {
        let ingestion = ingestion.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..100 {
                ingestion.ingest(
                    serde_json::from_value(serde_json::json!({
                        "id": format!("w{w}-{i}"),
                        "amount": "1",
                    }))
                    .unwrap(),
                );
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(h.reader.get_all().len(), 1000);
}
