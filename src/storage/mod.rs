pub mod json_backend;

use std::path::PathBuf;

use crate::{errors::Result, ledger::LedgerSnapshot};

/// Abstraction over persistence backends capable of storing ledger snapshots.
pub trait StorageBackend: Send + Sync {
    fn save(&self, snapshot: &LedgerSnapshot, name: &str) -> Result<PathBuf>;
    fn load(&self, name: &str) -> Result<LedgerSnapshot>;
    fn exists(&self, name: &str) -> bool;
    fn list(&self) -> Result<Vec<String>>;
}

/// Opaque string values under well-known keys, mirroring a device key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Returns whether a value was present.
    fn remove(&self, key: &str) -> Result<bool>;
}

pub use json_backend::JsonStorage;
