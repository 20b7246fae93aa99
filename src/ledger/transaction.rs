use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

const LOCAL_ID_PREFIX: &str = "local-";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Opaque transaction identifier.
///
/// Locally created records and backend records share this type. Callers must
/// treat the value as an opaque token: it is neither numeric nor ordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub(crate) fn local(sequence: u64) -> Self {
        Self(format!("{LOCAL_ID_PREFIX}{sequence}"))
    }

    /// Wraps an identifier issued by the remote backend.
    pub fn remote(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id was assigned by a local store rather than the backend.
    pub fn is_local(&self) -> bool {
        self.local_sequence().is_some()
    }

    pub(crate) fn local_sequence(&self) -> Option<u64> {
        self.0.strip_prefix(LOCAL_ID_PREFIX)?.parse().ok()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Multiplier applied to an amount when computing a balance.
    pub fn sign(&self) -> f64 {
        match self {
            TransactionKind::Income => 1.0,
            TransactionKind::Expense => -1.0,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded income or expense. Records are never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(alias = "desc")]
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub date: NaiveDate,
}

impl Transaction {
    pub fn signed_amount(&self) -> f64 {
        self.kind.sign() * self.amount
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

/// Raw form values as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFields {
    pub description: String,
    pub amount: String,
    pub kind: String,
    pub category: String,
    pub date: String,
}

impl TransactionFields {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        kind: impl Into<String>,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            kind: kind.into(),
            category: category.into(),
            date: date.into(),
        }
    }

    /// Checks every field and produces a draft ready to receive an id.
    pub fn validate(&self) -> Result<TransactionDraft> {
        let description = required("description", &self.description)?;
        let category = required("category", &self.category)?;
        let raw_date = required("date", &self.date)?;
        let raw_amount = required("amount", &self.amount)?;

        let parsed: f64 = raw_amount.parse().map_err(|_| {
            LedgerError::validation("amount", format!("`{raw_amount}` is not a number"))
        })?;
        if !parsed.is_finite() || parsed < 0.0 {
            return Err(LedgerError::validation(
                "amount",
                format!("`{raw_amount}` must be a finite, non-negative number"),
            ));
        }
        // `-0` parses to negative zero.
        let amount = if parsed == 0.0 { 0.0 } else { parsed };

        let kind = TransactionKind::parse(&self.kind).ok_or_else(|| {
            LedgerError::validation(
                "kind",
                format!("`{}` must be `income` or `expense`", self.kind.trim()),
            )
        })?;

        let date = NaiveDate::parse_from_str(&raw_date, DATE_FORMAT).map_err(|_| {
            LedgerError::validation("date", format!("`{raw_date}` is not a YYYY-MM-DD date"))
        })?;

        Ok(TransactionDraft {
            description,
            amount,
            kind,
            category,
            date,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(LedgerError::validation(field, "must not be empty"))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Validated transaction contents without an identity.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub category: String,
    pub date: NaiveDate,
}

impl TransactionDraft {
    pub(crate) fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            description: self.description,
            amount: self.amount,
            kind: self.kind,
            category: self.category,
            date: self.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> TransactionFields {
        TransactionFields::new("Coffee", "3.50", "expense", "food", "2024-01-02")
    }

    #[test]
    fn validate_trims_and_parses_fields() {
        let mut raw = fields();
        raw.description = "  Coffee beans ".into();
        raw.kind = "Expense".into();
        let draft = raw.validate().expect("valid fields");
        assert_eq!(draft.description, "Coffee beans");
        assert_eq!(draft.amount, 3.5);
        assert_eq!(draft.kind, TransactionKind::Expense);
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn validate_rejects_blank_fields() {
        for field in ["description", "category", "date", "amount"] {
            let mut raw = fields();
            match field {
                "description" => raw.description = "   ".into(),
                "category" => raw.category.clear(),
                "date" => raw.date.clear(),
                _ => raw.amount.clear(),
            }
            let err = raw.validate().expect_err("blank field must fail");
            assert!(
                matches!(err, LedgerError::ValidationFailed { field: f, .. } if f == field),
                "unexpected error for {field}: {err:?}"
            );
        }
    }

    #[test]
    fn validate_rejects_bad_amounts() {
        for amount in ["abc", "-1", "NaN", "inf"] {
            let mut raw = fields();
            raw.amount = amount.into();
            let err = raw.validate().expect_err("bad amount must fail");
            assert!(err.is_validation(), "{amount}: {err:?}");
        }
    }

    #[test]
    fn zero_amount_is_accepted() {
        let mut raw = fields();
        raw.amount = "0".into();
        assert_eq!(raw.validate().unwrap().amount, 0.0);
    }

    #[test]
    fn negative_zero_amount_is_stored_as_zero() {
        let mut raw = fields();
        raw.amount = "-0".into();
        let draft = raw.validate().unwrap();
        assert_eq!(draft.amount, 0.0);
        assert!(draft.amount.is_sign_positive());
    }

    #[test]
    fn validate_rejects_unknown_kind_and_malformed_date() {
        let mut raw = fields();
        raw.kind = "transfer".into();
        assert!(raw.validate().is_err());

        let mut raw = fields();
        raw.date = "2024-02-30".into();
        assert!(raw.validate().is_err());
    }

    #[test]
    fn local_ids_are_recognised() {
        let id = TransactionId::local(7);
        assert_eq!(id.as_str(), "local-7");
        assert!(id.is_local());
        assert!(!TransactionId::remote("65a1f0c2e4b0").is_local());
    }
}
