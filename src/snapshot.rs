//! Read-path snapshot access
//!
//! Thin named seam over `TransactionLog::snapshot` so the read path can
//! grow caching or pagination later without touching ingestion.

use std::sync::Arc;

use crate::model::Transaction;
use crate::store::TransactionLog;

/// Serves point-in-time copies of the full transaction history.
#[derive(Clone)]
pub struct SnapshotReader {
    log: Arc<TransactionLog>,
}

impl SnapshotReader {
    pub fn new(log: Arc<TransactionLog>) -> Self {
        Self { log }
    }

    /// Full current history, oldest first.
    pub fn get_all(&self) -> Vec<Transaction> {
        self.log.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionStatus;
    use chrono::Utc;
    use rust_decimal::Decimal;

    #[test]
    fn test_get_all_reflects_log() {
        let log = Arc::new(TransactionLog::new());
        let reader = SnapshotReader::new(Arc::clone(&log));

        assert!(reader.get_all().is_empty());

        log.append(Transaction {
            id: "tx-1".to_string(),
            amount: Decimal::from(50),
            currency: "USD".to_string(),
            status: TransactionStatus::Failed,
            timestamp: Utc::now(),
        });

        let all = reader.get_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, TransactionStatus::Failed);
    }
}
