//! Append-only in-memory transaction log
//!
//! The single authoritative store of accepted transactions. Records are
//! kept in arrival order, never mutated, and never evicted; the log is
//! volatile and resets on restart. Growth is unbounded on purpose: no
//! retention policy exists for this service and capping here would
//! silently break the "snapshot is a superset of the live stream"
//! guarantee for reconnecting viewers.

use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::model::Transaction;

/// Thread-safe append-only log of transactions, oldest first.
///
/// Created once at startup and handed by `Arc` to ingestion and the
/// snapshot path; nothing reaches it through ambient globals.
#[derive(Debug, Default)]
pub struct TransactionLog {
    entries: RwLock<Vec<Transaction>>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Append a transaction to the end of the log.
    ///
    /// Safe under concurrent callers; an append is never lost and never
    /// observed half-written. Cannot fail: the log has no capacity limit.
    pub fn append(&self, tx: Transaction) {
        // A poisoned lock only means another writer panicked; the vector
        // itself is still consistent (push is all-or-nothing under the
        // write lock), so recover rather than losing the append.
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        entries.push(tx);
        debug!(log_len = entries.len(), "transaction appended");
    }

    /// Point-in-time copy of the full log, oldest first.
    ///
    /// Reflects exactly the appends that completed before this call;
    /// appends racing with the snapshot land either fully in or fully
    /// out. The returned vector is detached from the log and never
    /// mutated by later appends.
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of transactions currently retained.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
