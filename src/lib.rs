//! Financial Transaction Monitor
//!
//! Accepts transaction writes over HTTP, retains them in an in-memory
//! append-only log, and fans each accepted transaction out in real time
//! to every connected WebSocket viewer. Viewers catch up via a full
//! history snapshot and merge it with the live stream client-side.
//!
//! # Architecture
//!
//! ```text
//! POST /api/transactions
//!        │
//!   ┌────▼──────┐
//!   │ Ingestion │  ← Normalizes the wire payload
//!   └────┬──────┘
//!        │ append, then publish
//!   ┌────▼───────────┐     ┌─────────────┐
//!   │ TransactionLog │     │ Broadcaster │
//!   └────┬───────────┘     └──────┬──────┘
//!        │                        │
//! GET /api/transactions     GET /ws/monitor
//!   (full snapshot)         (live stream)
//!        │                        │
//!        └───────┬────────────────┘
//!          ┌─────▼──────────┐
//!          │ ReconciledView │  ← snapshot-then-subscribe merge
//!          └────────────────┘
//! ```
//!
//! The append-before-publish ordering in ingestion guarantees the log is
//! always a superset of what any live subscriber has seen, which is what
//! makes the client's snapshot-then-subscribe protocol safe: a viewer can
//! receive an event twice (once in the snapshot, once live) but never
//! miss one, and the view dedups by transaction id.

pub mod broadcast;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ingestion;
pub mod model;
pub mod reconcile;
pub mod router;
pub mod snapshot;
pub mod state;
pub mod store;

pub const SERVICE_VERSION: &str = "0.1.0";
