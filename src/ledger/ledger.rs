use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{LedgerError, Result};

use super::{
    filter::TransactionFilter,
    transaction::{Transaction, TransactionDraft, TransactionFields, TransactionId},
};

pub(crate) const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Authoritative in-memory collection of transactions, kept in insertion order.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    id: Uuid,
    transactions: Vec<Transaction>,
    next_local_id: u64,
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            transactions: Vec::new(),
            next_local_id: 1,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Validates raw form fields and appends a new record with a fresh local id.
    pub fn add(&mut self, fields: &TransactionFields) -> Result<Transaction> {
        let draft = fields.validate().map_err(|err| {
            tracing::warn!(store = %self.id, error = %err, "rejected transaction");
            err
        })?;
        self.insert_draft(draft)
    }

    /// Appends an already validated draft.
    pub fn insert_draft(&mut self, draft: TransactionDraft) -> Result<Transaction> {
        let id = self.allocate_id()?;
        let transaction = draft.into_transaction(id);
        tracing::debug!(store = %self.id, id = %transaction.id, "transaction added");
        self.transactions.push(transaction.clone());
        Ok(transaction)
    }

    fn allocate_id(&mut self) -> Result<TransactionId> {
        loop {
            let sequence = self.next_local_id;
            self.next_local_id = sequence
                .checked_add(1)
                .ok_or_else(|| LedgerError::Storage("local id counter exhausted".into()))?;
            let id = TransactionId::local(sequence);
            if !self.contains(&id) {
                return Ok(id);
            }
        }
    }

    /// Removes the record with `id`. Missing ids are a no-op.
    pub fn remove(&mut self, id: &TransactionId) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|txn| &txn.id != id);
        let removed = self.transactions.len() != before;
        if removed {
            tracing::debug!(store = %self.id, %id, "transaction removed");
        }
        removed
    }

    pub fn list(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn filter(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|txn| filter.matches(txn))
            .collect()
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| &txn.id == id)
    }

    pub fn contains(&self, id: &TransactionId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Replaces the record with `id` wholesale, keeping its position.
    pub fn replace(&mut self, id: &TransactionId, replacement: Transaction) -> Result<bool> {
        if &replacement.id != id && self.contains(&replacement.id) {
            return Err(LedgerError::InvalidRef(format!(
                "transaction id `{}` already exists",
                replacement.id
            )));
        }
        match self.transactions.iter_mut().find(|txn| &txn.id == id) {
            Some(slot) => {
                *slot = replacement;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Swaps the whole contents for externally sourced records.
    ///
    /// Records are accepted as already validated; only id uniqueness is checked.
    pub fn replace_all(&mut self, records: Vec<Transaction>) -> Result<()> {
        ensure_unique_ids(&records)?;
        self.bump_counter_past(&records);
        self.transactions = records;
        tracing::debug!(store = %self.id, count = self.transactions.len(), "store replaced");
        Ok(())
    }

    fn bump_counter_past(&mut self, records: &[Transaction]) {
        if let Some(highest) = records
            .iter()
            .filter_map(|txn| txn.id.local_sequence())
            .max()
        {
            self.next_local_id = self.next_local_id.max(highest.saturating_add(1));
        }
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            id: self.id,
            saved_at: Utc::now(),
            next_local_id: self.next_local_id,
            transactions: self.transactions.clone(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Rebuilds a store from a snapshot, keeping its identity and id counter.
    pub fn restore(snapshot: LedgerSnapshot) -> Result<Self> {
        if snapshot.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(LedgerError::Storage(format!(
                "snapshot schema {} is newer than supported {}",
                snapshot.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        let mut store = Self {
            id: snapshot.id,
            transactions: Vec::new(),
            next_local_id: snapshot.next_local_id.max(1),
        };
        store.replace_all(snapshot.transactions)?;
        Ok(store)
    }
}

fn ensure_unique_ids(records: &[Transaction]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for txn in records {
        if !seen.insert(&txn.id) {
            return Err(LedgerError::InvalidRef(format!(
                "duplicate transaction id `{}`",
                txn.id
            )));
        }
    }
    Ok(())
}

/// Serializable image of a [`LedgerStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub next_local_id: u64,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default = "LedgerSnapshot::schema_version_default")]
    pub schema_version: u8,
}

impl LedgerSnapshot {
    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{KindFilter, TransactionKind};
    use chrono::NaiveDate;

    fn fields(description: &str, amount: &str, kind: &str) -> TransactionFields {
        TransactionFields::new(description, amount, kind, "food", "2024-01-02")
    }

    fn remote(id: &str) -> Transaction {
        Transaction {
            id: TransactionId::remote(id),
            description: "Salary".into(),
            amount: 100.0,
            kind: TransactionKind::Income,
            category: "work".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn add_assigns_distinct_ids_in_order() {
        let mut store = LedgerStore::new();
        let first = store.add(&fields("Coffee", "3", "expense")).unwrap();
        let second = store.add(&fields("Lunch", "12", "expense")).unwrap();
        assert_ne!(first.id, second.id);
        let descriptions: Vec<_> = store.list().iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, ["Coffee", "Lunch"]);
    }

    #[test]
    fn failed_add_leaves_store_untouched() {
        let mut store = LedgerStore::new();
        store.add(&fields("Coffee", "3", "expense")).unwrap();
        let err = store.add(&fields("", "3", "expense")).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.len(), 1);
        let next = store.add(&fields("Tea", "2", "expense")).unwrap();
        assert_eq!(next.id.as_str(), "local-2");
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = LedgerStore::new();
        let txn = store.add(&fields("Coffee", "3", "expense")).unwrap();
        assert!(store.remove(&txn.id));
        assert!(!store.remove(&txn.id));
        assert!(store.is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_remove() {
        let mut store = LedgerStore::new();
        let first = store.add(&fields("Coffee", "3", "expense")).unwrap();
        store.remove(&first.id);
        let second = store.add(&fields("Tea", "2", "expense")).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn filter_preserves_order() {
        let mut store = LedgerStore::new();
        store.add(&fields("Coffee beans", "8", "expense")).unwrap();
        store.add(&fields("Pay", "500", "income")).unwrap();
        store.add(&fields("coffee", "3", "expense")).unwrap();
        let filter = TransactionFilter::new("Coffee", KindFilter::All);
        let hits: Vec<_> = store.filter(&filter).iter().map(|t| t.amount).collect();
        assert_eq!(hits, [8.0, 3.0]);
    }

    #[test]
    fn replace_all_rejects_duplicates_and_keeps_counter_ahead() {
        let mut store = LedgerStore::new();
        let err = store
            .replace_all(vec![remote("a"), remote("a")])
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidRef(_)));

        let mut local = remote("local-4");
        local.description = "Restored".into();
        store.replace_all(vec![remote("a"), local]).unwrap();
        let added = store.add(&fields("Coffee", "3", "expense")).unwrap();
        assert_eq!(added.id.as_str(), "local-5");
    }

    #[test]
    fn allocation_skips_ids_taken_by_remote_records() {
        let mut store = LedgerStore::new();
        let first = store.add(&fields("Coffee", "3", "expense")).unwrap();
        store.replace(&first.id, remote("local-2")).unwrap();
        let added = store.add(&fields("Tea", "2", "expense")).unwrap();
        assert_eq!(added.id.as_str(), "local-3");
    }

    #[test]
    fn replace_keeps_position_and_guards_uniqueness() {
        let mut store = LedgerStore::new();
        let first = store.add(&fields("Coffee", "3", "expense")).unwrap();
        store.add(&fields("Tea", "2", "expense")).unwrap();

        assert!(store.replace(&first.id, remote("srv-1")).unwrap());
        assert_eq!(store.list()[0].id.as_str(), "srv-1");

        let clash = store.replace(&TransactionId::from("local-2"), remote("srv-1"));
        assert!(clash.is_err());
        assert!(!store.replace(&TransactionId::from("nope"), remote("srv-9")).unwrap());
    }

    #[test]
    fn snapshot_round_trip_preserves_identity() {
        let mut store = LedgerStore::new();
        store.add(&fields("Coffee", "3", "expense")).unwrap();
        let snapshot = store.snapshot();
        let mut restored = LedgerStore::restore(snapshot).unwrap();
        assert_eq!(restored.id(), store.id());
        assert_eq!(restored.list(), store.list());
        let next = restored.add(&fields("Tea", "2", "expense")).unwrap();
        assert_eq!(next.id.as_str(), "local-2");
    }

    #[test]
    fn maximal_remote_local_id_does_not_overflow_counter() {
        let mut store = LedgerStore::new();
        let max_id = format!("local-{}", u64::MAX);
        store.replace_all(vec![remote(&max_id)]).unwrap();
        assert_eq!(store.len(), 1);

        let err = store.add(&fields("Coffee", "3", "expense")).unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn exhausted_counter_in_snapshot_rejects_add() {
        let mut snapshot = LedgerStore::new().snapshot();
        snapshot.next_local_id = u64::MAX;
        let mut restored = LedgerStore::restore(snapshot).unwrap();

        assert!(matches!(
            restored.add(&fields("Coffee", "3", "expense")),
            Err(LedgerError::Storage(_))
        ));
        assert!(restored.is_empty());
    }

    #[test]
    fn separate_stores_do_not_share_state() {
        let mut a = LedgerStore::new();
        let b = LedgerStore::new();
        a.add(&fields("Coffee", "3", "expense")).unwrap();
        assert!(b.is_empty());
        assert_ne!(a.id(), b.id());
    }
}
