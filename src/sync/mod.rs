//! Wire shapes exchanged with the remote finance backend.
//!
//! Records travel as `{id, description, amount, type, category, date}`. The
//! transport itself lives outside this crate; these types only describe the
//! payloads so callers can decode replies and build request bodies.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::{Transaction, TransactionDraft, TransactionKind};

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("backend rejected the request: {0}")]
    Rejected(String),
    #[error("backend reply is missing `{0}`")]
    MissingPayload(&'static str),
    #[error("malformed backend reply: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Reply to `GET /transactions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionsEnvelope {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Reply to `POST /transaction`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<Transaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransactionEnvelope {
    pub fn into_result(self) -> Result<Transaction, RemoteError> {
        match (self.transaction, self.error) {
            (Some(transaction), _) => Ok(transaction),
            (None, Some(error)) => Err(RemoteError::Rejected(error)),
            (None, None) => Err(RemoteError::MissingPayload("transaction")),
        }
    }
}

/// Reply to `DELETE /transaction`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

impl DeleteEnvelope {
    pub fn into_result(self) -> Result<(), RemoteError> {
        match (self.success, self.error) {
            (Some(true), _) => Ok(()),
            (_, Some(error)) => Err(RemoteError::Rejected(error)),
            _ => Err(RemoteError::MissingPayload("success")),
        }
    }
}

/// Body of `POST /transaction`. The backend assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub date: NaiveDate,
}

impl From<&TransactionDraft> for CreateTransactionRequest {
    fn from(draft: &TransactionDraft) -> Self {
        Self {
            description: draft.description.clone(),
            amount: draft.amount,
            kind: draft.kind,
            category: draft.category.clone(),
            date: draft.date,
        }
    }
}

impl From<&Transaction> for CreateTransactionRequest {
    fn from(txn: &Transaction) -> Self {
        Self {
            description: txn.description.clone(),
            amount: txn.amount,
            kind: txn.kind,
            category: txn.category.clone(),
            date: txn.date,
        }
    }
}

#[derive(Deserialize)]
struct RawTransactionsEnvelope {
    #[serde(default)]
    transactions: Vec<serde_json::Value>,
}

/// Decodes a transaction list. Records that do not fit the local model (for
/// example a date that is not `YYYY-MM-DD`) are skipped with a warning rather
/// than failing the whole list.
pub fn decode_transactions(body: &str) -> Result<Vec<Transaction>, RemoteError> {
    let envelope: RawTransactionsEnvelope = serde_json::from_str(body)?;
    let mut records = Vec::with_capacity(envelope.transactions.len());
    for (index, raw) in envelope.transactions.into_iter().enumerate() {
        match serde_json::from_value::<Transaction>(raw) {
            Ok(txn) => records.push(txn),
            Err(err) => tracing::warn!(index, error = %err, "skipping malformed backend record"),
        }
    }
    Ok(records)
}

pub fn decode_created(body: &str) -> Result<Transaction, RemoteError> {
    let envelope: TransactionEnvelope = serde_json::from_str(body)?;
    envelope.into_result()
}

pub fn decode_deleted(body: &str) -> Result<(), RemoteError> {
    let envelope: DeleteEnvelope = serde_json::from_str(body)?;
    envelope.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_reply_with_error_is_rejected() {
        let err = decode_created(r#"{"error": "amount is required"}"#).unwrap_err();
        assert!(matches!(err, RemoteError::Rejected(ref msg) if msg == "amount is required"));
    }

    #[test]
    fn empty_created_reply_is_missing_payload() {
        let err = decode_created("{}").unwrap_err();
        assert!(matches!(err, RemoteError::MissingPayload("transaction")));
    }

    #[test]
    fn delete_reply_requires_success_flag() {
        assert!(decode_deleted(r#"{"success": true}"#).is_ok());
        assert!(matches!(
            decode_deleted(r#"{"error": "Transaction not found"}"#),
            Err(RemoteError::Rejected(_))
        ));
        assert!(decode_deleted(r#"{"success": false}"#).is_err());
    }

    #[test]
    fn list_reply_tolerates_missing_array() {
        assert!(decode_transactions("{}").unwrap().is_empty());
    }

    #[test]
    fn list_reply_skips_records_with_unusable_dates() {
        let body = r#"{"transactions": [
            {"id": "a", "description": "Pay", "amount": 100, "type": "income", "category": "work", "date": ""},
            {"id": "b", "description": "Food", "amount": 30, "type": "expense", "category": "food", "date": "2024-01-03"}
        ]}"#;
        let records = decode_transactions(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_str(), "b");
    }

    #[test]
    fn list_reply_that_is_not_json_fails() {
        assert!(matches!(decode_transactions("<html>"), Err(RemoteError::Decode(_))));
    }
}
