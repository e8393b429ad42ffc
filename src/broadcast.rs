//! Live fan-out of accepted transactions
//!
//! Wraps a `tokio::sync::broadcast` channel: every subscriber registered
//! at publish time receives the transaction, in publish order, on its own
//! receiver. Delivery is fire-and-forget and at-most-once; a subscriber
//! that falls behind the channel capacity is cut off with `Lagged` and
//! must catch up through a fresh snapshot, never through replay.

use tokio::sync::broadcast;
use tracing::debug;

use crate::model::Transaction;

/// Default channel capacity. At the expected write rate (hundreds of
/// events per second) this gives a slow subscriber several seconds of
/// slack before it is considered disconnected.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 4096;

/// Fan-out hub for live transaction delivery.
///
/// Cheap to clone; all clones publish into the same channel.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    tx: broadcast::Sender<Transaction>,
}

impl Broadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Deliver a transaction to every current subscriber.
    ///
    /// Never blocks and never fails from the publisher's point of view:
    /// zero subscribers is normal, and a subscriber that cannot keep up
    /// loses messages on its own receiver without affecting anyone else.
    pub fn publish(&self, tx: Transaction) {
        debug!(id = %tx.id, subscribers = self.tx.receiver_count(), "publishing transaction");
        // Send only errors when there are no receivers, which is fine.
        let _ = self.tx.send(tx);
    }

    /// Register a live listener. It receives every transaction published
    /// after this call; anything published earlier is only recoverable
    /// via a log snapshot.
    pub fn subscribe(&self) -> broadcast::Receiver<Transaction> {
        self.tx.subscribe()
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionStatus;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn sample_tx(id: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            amount: Decimal::ONE,
            currency: "USD".to_string(),
            status: TransactionStatus::Pending,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_ok() {
        let hub = Broadcaster::with_default_capacity();
        hub.publish(sample_tx("tx-1"));
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_in_publish_order() {
        let hub = Broadcaster::new(16);
        let mut rx = hub.subscribe();

        hub.publish(sample_tx("a"));
        hub.publish(sample_tx("b"));
        hub.publish(sample_tx("c"));

        assert_eq!(rx.recv().await.unwrap().id, "a");
        assert_eq!(rx.recv().await.unwrap().id, "b");
        assert_eq!(rx.recv().await.unwrap().id, "c");
    }

    #[tokio::test]
    async fn test_all_subscribers_receive_every_publish() {
        let hub = Broadcaster::new(16);
        let mut rx1 = hub.subscribe();
        let mut rx2 = hub.subscribe();

        hub.publish(sample_tx("tx-1"));

        assert_eq!(rx1.recv().await.unwrap().id, "tx-1");
        assert_eq!(rx2.recv().await.unwrap().id, "tx-1");
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_earlier_publishes() {
        let hub = Broadcaster::new(16);
        hub.publish(sample_tx("before"));

        let mut rx = hub.subscribe();
        hub.publish(sample_tx("after"));

        assert_eq!(rx.recv().await.unwrap().id, "after");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_lagged_subscriber_does_not_affect_others() {
        let hub = Broadcaster::new(2);
        let mut slow = hub.subscribe();

        for i in 0..5 {
            hub.publish(sample_tx(&format!("tx-{i}")));
        }

        // The slow receiver overflowed its window.
        assert!(matches!(
            slow.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));

        // A fresh subscriber still gets new publishes normally.
        let mut fresh = hub.subscribe();
        hub.publish(sample_tx("tx-new"));
        assert_eq!(fresh.recv().await.unwrap().id, "tx-new");
    }
}
