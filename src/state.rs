//! Shared application state
//!
//! The transaction log is created once here and handed by `Arc` into
//! ingestion and the snapshot reader; no component reaches it through a
//! global.

use std::sync::Arc;

use crate::broadcast::Broadcaster;
use crate::config::ServiceConfig;
use crate::ingestion::IngestionService;
use crate::snapshot::SnapshotReader;
use crate::store::TransactionLog;

#[derive(Clone)]
pub struct AppState {
    pub ingestion: IngestionService,
    pub snapshots: SnapshotReader,
    pub broadcaster: Broadcaster,
}

impl AppState {
    pub fn new(config: &ServiceConfig) -> Self {
        let log = Arc::new(TransactionLog::new());
        let broadcaster = Broadcaster::new(config.broadcast_capacity);

        Self {
            ingestion: IngestionService::new(Arc::clone(&log), broadcaster.clone()),
            snapshots: SnapshotReader::new(log),
            broadcaster,
        }
    }
}
