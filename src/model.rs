//! Transaction data model and wire normalization
//!
//! Defines the canonical `Transaction` record, its status enum, and the
//! `RawTransaction` DTO that absorbs the loosely-shaped payloads writers
//! actually send: alternate-cased field names, string or numeric status
//! codes, and missing fields. Normalization happens in exactly one place
//! (`RawTransaction::normalize`) with a fixed precedence between the
//! accepted spellings, never implicitly at call sites.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a transaction.
///
/// Crosses the HTTP boundary as its string name, never as an ordinal.
/// The live stream may carry the numeric code as a wire optimization;
/// `StatusField::normalize` maps it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    /// Parse a status string case-insensitively.
    ///
    /// Unrecognized values normalize to `Pending` rather than rejecting
    /// the write.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "completed" => TransactionStatus::Completed,
            "failed" => TransactionStatus::Failed,
            _ => TransactionStatus::Pending,
        }
    }

    /// Map a numeric wire code to a status. Unknown codes fall back to
    /// `Pending`, same as unparseable strings; that includes negative
    /// and out-of-range values, which must not reject the write.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => TransactionStatus::Completed,
            2 => TransactionStatus::Failed,
            _ => TransactionStatus::Pending,
        }
    }

    /// The status's wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Completed => "Completed",
            TransactionStatus::Failed => "Failed",
        }
    }
}

/// One immutable transaction observation accepted by the system.
///
/// Never mutated after it enters the log; `id` is the dedup key across
/// the snapshot and live paths. `timestamp` is caller-supplied and the
/// log does not reorder by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: TransactionStatus,
    pub timestamp: DateTime<Utc>,
}

/// A status field off the wire: either a string name or a numeric code.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StatusField {
    Code(i64),
    Text(String),
}

impl StatusField {
    pub fn normalize(&self) -> TransactionStatus {
        match self {
            StatusField::Code(code) => TransactionStatus::from_code(*code),
            StatusField::Text(s) => TransactionStatus::parse(s),
        }
    }
}

/// Incoming write payload before normalization.
///
/// Every field is optional and every accepted spelling is a separate
/// struct field so the precedence between spellings is explicit in
/// `normalize` (camelCase wins over PascalCase) instead of being an
/// accident of deserializer ordering.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransaction {
    pub id: Option<String>,
    #[serde(rename = "transactionId")]
    pub transaction_id: Option<String>,
    #[serde(rename = "TransactionId")]
    pub transaction_id_pascal: Option<String>,

    pub amount: Option<Decimal>,
    #[serde(rename = "Amount")]
    pub amount_pascal: Option<Decimal>,

    pub currency: Option<String>,
    #[serde(rename = "Currency")]
    pub currency_pascal: Option<String>,

    pub status: Option<StatusField>,
    #[serde(rename = "Status")]
    pub status_pascal: Option<StatusField>,

    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "Timestamp")]
    pub timestamp_pascal: Option<DateTime<Utc>>,
}

impl RawTransaction {
    /// Normalize the raw payload into a canonical `Transaction`.
    ///
    /// Precedence per field: `id` > `transactionId` > `TransactionId`,
    /// then camelCase > PascalCase. A missing or empty id gets a
    /// generated UUID v7 so every accepted record is dedup-keyable;
    /// repeated ids are accepted and left to the viewer's merge to
    /// collapse. A missing timestamp gets the ingestion wall clock.
    pub fn normalize(self) -> Transaction {
        let id = [self.id, self.transaction_id, self.transaction_id_pascal]
            .into_iter()
            .flatten()
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| Uuid::now_v7().to_string());

        let status = self
            .status
            .or(self.status_pascal)
            .map(|s| s.normalize())
            .unwrap_or(TransactionStatus::Pending);

        Transaction {
            id,
            amount: self.amount.or(self.amount_pascal).unwrap_or(Decimal::ZERO),
            currency: self
                .currency
                .or(self.currency_pascal)
                .unwrap_or_else(|| "USD".to_string()),
            status,
            timestamp: self.timestamp.or(self.timestamp_pascal).unwrap_or_else(Utc::now),
        }
    }
}
