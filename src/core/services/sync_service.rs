//! Reconciles backend replies with the local ledger store.

use crate::core::services::{ServiceError, ServiceResult};
use crate::ledger::{LedgerStore, Transaction, TransactionId};

/// What happened to a local record when the backend echoed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The local record now carries the backend id, in the same position.
    Replaced,
    /// The backend record was already present, so the local copy was dropped.
    Deduplicated,
}

pub struct SyncService;

impl SyncService {
    /// Replaces the store contents with the backend's list (last write wins).
    pub fn replace_from_remote(
        store: &mut LedgerStore,
        records: Vec<Transaction>,
    ) -> ServiceResult<()> {
        let count = records.len();
        store.replace_all(records)?;
        tracing::info!(count, "ledger replaced from backend");
        Ok(())
    }

    /// Swaps a locally added record for the backend's echo of it.
    pub fn confirm_remote(
        store: &mut LedgerStore,
        local_id: &TransactionId,
        remote: Transaction,
    ) -> ServiceResult<Reconciliation> {
        if !store.contains(local_id) {
            return Err(ServiceError::Invalid(format!(
                "transaction `{local_id}` not found"
            )));
        }
        if &remote.id != local_id && store.contains(&remote.id) {
            store.remove(local_id);
            tracing::debug!(%local_id, remote_id = %remote.id, "dropped duplicate local record");
            return Ok(Reconciliation::Deduplicated);
        }
        let remote_id = remote.id.clone();
        store.replace(local_id, remote)?;
        tracing::debug!(%local_id, %remote_id, "local record confirmed by backend");
        Ok(Reconciliation::Replaced)
    }
}
