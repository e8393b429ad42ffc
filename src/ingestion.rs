//! Write-path ingestion
//!
//! Turns a raw wire payload into a canonical `Transaction`, appends it to
//! the log, and only then publishes it to live subscribers. The ordering
//! is load-bearing: because the log is written first, a snapshot taken at
//! any moment is a superset of everything any subscriber could have seen
//! live, so a reconnecting viewer can always catch up from a snapshot.

use std::sync::Arc;

use tracing::info;

use crate::broadcast::Broadcaster;
use crate::model::{RawTransaction, Transaction};
use crate::store::TransactionLog;

/// Accepts writes, owning the append-then-publish sequencing.
#[derive(Clone)]
pub struct IngestionService {
    log: Arc<TransactionLog>,
    broadcaster: Broadcaster,
}

impl IngestionService {
    pub fn new(log: Arc<TransactionLog>, broadcaster: Broadcaster) -> Self {
        Self { log, broadcaster }
    }

    /// Normalize, append, publish. Returns the record as accepted.
    ///
    /// Structurally malformed payloads are rejected before this point by
    /// the JSON extractor; everything that deserializes into a
    /// `RawTransaction` is accepted, with defaults filled in by
    /// normalization (including a generated id when the writer omits one).
    pub fn ingest(&self, raw: RawTransaction) -> Transaction {
        let tx = raw.normalize();

        info!(
            id = %tx.id,
            status = tx.status.as_str(),
            amount = %tx.amount,
            currency = %tx.currency,
            "transaction accepted"
        );

        // Append must complete before publish.
        self.log.append(tx.clone());
        self.broadcaster.publish(tx.clone());

        tx
    }
}
