//! Write and read endpoints for transactions

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::error::AppError;
use crate::model::{RawTransaction, Transaction};
use crate::state::AppState;

/// `POST /api/transactions`
///
/// Accepts one transaction payload, normalizes it, appends it to the log
/// and publishes it live. The ack is an empty 200; the caller gets no
/// per-record feedback beyond success or a validation rejection.
pub async fn create_transaction(
    State(state): State<AppState>,
    payload: Result<Json<RawTransaction>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(raw) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    state.ingestion.ingest(raw);

    Ok(StatusCode::OK)
}

/// `GET /api/transactions`
///
/// Full retained history, oldest first, statuses as string names.
pub async fn list_transactions(State(state): State<AppState>) -> Json<Vec<Transaction>> {
    Json(state.snapshots.get_all())
}
