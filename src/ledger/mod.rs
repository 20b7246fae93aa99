//! Transaction records, the ledger store that owns them, and the filters and
//! periods used to slice them.

pub mod filter;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod period;
pub mod transaction;

pub use filter::{KindFilter, TransactionFilter};
pub use ledger::{LedgerSnapshot, LedgerStore};
pub use period::SummaryPeriod;
pub use transaction::{
    Transaction, TransactionDraft, TransactionFields, TransactionId, TransactionKind,
};
