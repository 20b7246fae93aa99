use std::path::PathBuf;

use chrono::NaiveDate;

use crate::core::services::{
    Reconciliation, ServiceResult, Summary, SummaryService, SyncService, TransactionService,
};
use crate::ledger::{
    LedgerStore, SummaryPeriod, Transaction, TransactionFields, TransactionFilter, TransactionId,
};
use crate::storage::StorageBackend;

/// Owns the active ledger store, its persistence backend, and the last computed summary.
///
/// Every mutation drops the cached summary so a stale view is never handed out.
pub struct LedgerManager {
    store: LedgerStore,
    storage: Box<dyn StorageBackend>,
    current_name: Option<String>,
    cached_summary: Option<(NaiveDate, Summary)>,
}

impl LedgerManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            store: LedgerStore::new(),
            storage,
            current_name: None,
            cached_summary: None,
        }
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    fn invalidate(&mut self) {
        self.cached_summary = None;
    }

    pub fn add(&mut self, fields: &TransactionFields) -> ServiceResult<Transaction> {
        let txn = TransactionService::add(&mut self.store, fields)?;
        self.invalidate();
        Ok(txn)
    }

    pub fn remove(&mut self, id: &TransactionId) -> bool {
        let removed = self.store.remove(id);
        if removed {
            self.invalidate();
        }
        removed
    }

    pub fn list(&self) -> &[Transaction] {
        self.store.list()
    }

    pub fn filter(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        self.store.filter(filter)
    }

    pub fn search(&self, term: &str, kind: &str) -> ServiceResult<Vec<&Transaction>> {
        TransactionService::search(&self.store, term, kind)
    }

    pub fn replace_from_remote(&mut self, records: Vec<Transaction>) -> ServiceResult<()> {
        SyncService::replace_from_remote(&mut self.store, records)?;
        self.invalidate();
        Ok(())
    }

    pub fn confirm_remote(
        &mut self,
        local_id: &TransactionId,
        remote: Transaction,
    ) -> ServiceResult<Reconciliation> {
        let outcome = SyncService::confirm_remote(&mut self.store, local_id, remote)?;
        self.invalidate();
        Ok(outcome)
    }

    pub fn balance(&self) -> f64 {
        SummaryService::balance(self.store.list())
    }

    /// Returns the summary for `period` as of `now`, recomputing only when needed.
    pub fn summary(&mut self, period: &SummaryPeriod, now: NaiveDate) -> &Summary {
        let fresh = matches!(
            &self.cached_summary,
            Some((at, summary)) if *at == now && &summary.period == period
        );
        if !fresh {
            self.cached_summary = None;
        }
        let store = &self.store;
        let (_, summary) = self
            .cached_summary
            .get_or_insert_with(|| (now, SummaryService::summarize(store.list(), period, now)));
        summary
    }

    pub fn has_cached_summary(&self) -> bool {
        self.cached_summary.is_some()
    }

    pub fn save(&mut self, name: &str) -> ServiceResult<PathBuf> {
        let path = self.storage.save(&self.store.snapshot(), name)?;
        self.current_name = Some(name.to_string());
        Ok(path)
    }

    pub fn load(&mut self, name: &str) -> ServiceResult<()> {
        let snapshot = self.storage.load(name)?;
        self.store = LedgerStore::restore(snapshot)?;
        self.current_name = Some(name.to_string());
        self.invalidate();
        Ok(())
    }

    /// Loads `name` when it exists, otherwise starts an empty ledger under that name.
    pub fn open_or_create(&mut self, name: &str) -> ServiceResult<bool> {
        if self.storage.exists(name) {
            self.load(name)?;
            Ok(true)
        } else {
            self.store = LedgerStore::new();
            self.current_name = Some(name.to_string());
            self.invalidate();
            Ok(false)
        }
    }

    pub fn saved_ledgers(&self) -> ServiceResult<Vec<String>> {
        Ok(self.storage.list()?)
    }
}
