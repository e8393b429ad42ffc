//! Client-side snapshot/live-stream reconciliation
//!
//! A viewing session has two independent sources of truth: a point-in-time
//! snapshot of the full log (pulled once) and the live broadcast stream
//! (pushed from subscription time onward). The two calls are not atomic,
//! so a record appended around session start can show up in both, or in
//! the snapshot only. The merge makes duplicates a non-event: the view is
//! keyed by transaction id, folds each source idempotently, and is
//! capacity-bounded newest-first.
//!
//! The one hard sequencing rule, enforced by `MonitorSession::start`, is
//! that the snapshot is taken strictly before the subscription is
//! registered. With append-before-publish on the server side, that makes
//! omission impossible: anything the subscription can miss was already in
//! the snapshot.

use std::collections::{HashSet, VecDeque};

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::broadcast::Broadcaster;
use crate::model::{Transaction, TransactionStatus};
use crate::snapshot::SnapshotReader;

/// Default cap on the number of transactions a view retains.
pub const DEFAULT_VIEW_CAPACITY: usize = 1000;

/// Deduplicated, capacity-bounded, newest-first working set of
/// transactions for one viewer.
#[derive(Debug)]
pub struct ReconciledView {
    /// Transactions, newest first.
    entries: VecDeque<Transaction>,
    /// Ids currently in `entries`, for O(1) dedup.
    seen: HashSet<String>,
    /// Maximum number of retained entries; oldest evicted first.
    capacity: usize,
    /// Optional status filter applied by `list`.
    filter: Option<TransactionStatus>,
}

impl ReconciledView {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            seen: HashSet::new(),
            capacity,
            filter: None,
        }
    }

    /// Seed the view from a snapshot (oldest first).
    ///
    /// Snapshot entries count as older than everything already in the
    /// view, so new ones go to the back, newest of them first. Ids
    /// already present are skipped; the capacity cap drops from the old
    /// end.
    pub fn seed(&mut self, snapshot: Vec<Transaction>) {
        for tx in snapshot.into_iter().rev() {
            if self.seen.contains(&tx.id) {
                continue;
            }
            self.seen.insert(tx.id.clone());
            self.entries.push_back(tx);
        }
        self.enforce_capacity();
    }

    /// Fold one live event into the view.
    ///
    /// Returns `false` if the id was already present (the snapshot/live
    /// overlap case) and the event was discarded; `true` if it was
    /// inserted at the front.
    pub fn apply_live(&mut self, tx: Transaction) -> bool {
        if self.seen.contains(&tx.id) {
            debug!(id = %tx.id, "discarding duplicate live transaction");
            return false;
        }
        self.seen.insert(tx.id.clone());
        self.entries.push_front(tx);
        self.enforce_capacity();
        true
    }

    fn enforce_capacity(&mut self) {
        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_back() {
                self.seen.remove(&evicted.id);
            }
        }
    }

    /// Empty the working set. The view keeps folding future live events
    /// normally; previously-seen ids may re-enter after a clear.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.seen.clear();
    }

    /// The full working set, newest first.
    pub fn raw_list(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    /// The working set with the current status filter applied.
    pub fn list(&self) -> Vec<&Transaction> {
        match self.filter {
            Some(status) => self.entries.iter().filter(|t| t.status == status).collect(),
            None => self.entries.iter().collect(),
        }
    }

    pub fn set_filter(&mut self, filter: Option<TransactionStatus>) {
        self.filter = filter;
    }

    pub fn filter(&self) -> Option<TransactionStatus> {
        self.filter
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }
}

impl Default for ReconciledView {
    fn default() -> Self {
        Self::new(DEFAULT_VIEW_CAPACITY)
    }
}

/// Session lifecycle. `AwaitingSnapshot` is never skipped: subscribing
/// before the snapshot returns is exactly the race this type exists to
/// prevent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    AwaitingSnapshot,
    Subscribed,
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session already started")]
    AlreadyStarted,

    #[error("session is not subscribed to the live stream")]
    NotSubscribed,

    #[error("live stream closed")]
    StreamClosed,
}

/// Outcome of receiving one message from the live stream.
#[derive(Debug)]
pub enum SessionEvent {
    /// A new transaction was folded into the view.
    Applied(Transaction),
    /// A duplicate arrived (already present via snapshot or earlier live
    /// delivery) and was discarded.
    Duplicate(Transaction),
    /// The transport lagged or dropped; the session re-ran the full
    /// snapshot-then-subscribe protocol. Events missed during the outage
    /// were recovered from the fresh snapshot.
    Resynced,
}

/// One viewing session: drives the snapshot-then-subscribe protocol and
/// owns the resulting `ReconciledView`.
pub struct MonitorSession {
    reader: SnapshotReader,
    broadcaster: Broadcaster,
    view: ReconciledView,
    rx: Option<broadcast::Receiver<Transaction>>,
    state: SessionState,
}

impl MonitorSession {
    pub fn new(reader: SnapshotReader, broadcaster: Broadcaster, capacity: usize) -> Self {
        Self {
            reader,
            broadcaster,
            view: ReconciledView::new(capacity),
            rx: None,
            state: SessionState::Uninitialized,
        }
    }

    /// Run the three-step start protocol: pull the snapshot, seed the
    /// view, and only then register the live subscription.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Uninitialized {
            return Err(SessionError::AlreadyStarted);
        }
        self.state = SessionState::AwaitingSnapshot;

        let snapshot = self.reader.get_all();
        self.view.seed(snapshot);

        // Subscribe strictly after the snapshot is in hand. A record
        // published in between is either already in the snapshot or will
        // arrive live; either way the idempotent merge absorbs it.
        self.rx = Some(self.broadcaster.subscribe());
        self.state = SessionState::Subscribed;
        Ok(())
    }

    /// Await the next live event and fold it into the view.
    ///
    /// A lagged receiver means events were lost on this connection; the
    /// only correct recovery is a fresh snapshot, so the session restarts
    /// its protocol in place and reports `Resynced`.
    pub async fn recv(&mut self) -> Result<SessionEvent, SessionError> {
        let rx = self.rx.as_mut().ok_or(SessionError::NotSubscribed)?;

        match rx.recv().await {
            Ok(tx) => {
                if self.view.apply_live(tx.clone()) {
                    Ok(SessionEvent::Applied(tx))
                } else {
                    Ok(SessionEvent::Duplicate(tx))
                }
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(missed, "live stream lagged; resyncing from snapshot");
                self.resync();
                Ok(SessionEvent::Resynced)
            }
            Err(broadcast::error::RecvError::Closed) => {
                self.state = SessionState::Closed;
                self.rx = None;
                Err(SessionError::StreamClosed)
            }
        }
    }

    /// Re-run the full snapshot-then-subscribe protocol on an existing
    /// view. Working-set contents survive; the fresh snapshot fills any
    /// gap the outage caused.
    fn resync(&mut self) {
        self.rx = None;
        self.state = SessionState::AwaitingSnapshot;

        let snapshot = self.reader.get_all();
        self.view.seed(snapshot);

        self.rx = Some(self.broadcaster.subscribe());
        self.state = SessionState::Subscribed;
    }

    /// End the session. The view is dropped with the session; the log
    /// and other subscribers are unaffected.
    pub fn close(&mut self) {
        self.rx = None;
        self.state = SessionState::Closed;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn view(&self) -> &ReconciledView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ReconciledView {
        &mut self.view
    }
}
