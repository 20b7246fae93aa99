//! Business logic helpers for managing transactions from UI input.

use crate::core::services::{ServiceError, ServiceResult};
use crate::ledger::{
    KindFilter, LedgerStore, Transaction, TransactionFields, TransactionFilter, TransactionId,
};

/// Translates raw UI values into ledger store operations.
pub struct TransactionService;

impl TransactionService {
    /// Validates the form and appends the record.
    pub fn add(store: &mut LedgerStore, fields: &TransactionFields) -> ServiceResult<Transaction> {
        store.add(fields).map_err(ServiceError::from)
    }

    /// Removes the transaction identified by `id`, reporting whether it existed.
    pub fn remove(store: &mut LedgerStore, id: &str) -> bool {
        store.remove(&TransactionId::from(id.trim()))
    }

    /// Returns a snapshot of the store's transactions.
    pub fn list(store: &LedgerStore) -> Vec<&Transaction> {
        store.list().iter().collect()
    }

    /// Applies a search term and a kind tag (`all`, `income`, `expense`).
    pub fn search<'a>(
        store: &'a LedgerStore,
        term: &str,
        kind: &str,
    ) -> ServiceResult<Vec<&'a Transaction>> {
        let kind = if kind.trim().is_empty() {
            KindFilter::All
        } else {
            KindFilter::parse(kind).ok_or_else(|| {
                ServiceError::Invalid(format!(
                    "unknown kind filter `{kind}`; expected all, income or expense"
                ))
            })?
        };
        Ok(store.filter(&TransactionFilter::new(term, kind)))
    }
}
