use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    errors::{LedgerError, Result},
    ledger::LedgerSnapshot,
    utils::persistence::{
        load_snapshot_from_file, read_json, save_snapshot_to_file, write_json_atomic,
    },
};

use super::{KeyValueStore, StorageBackend};

const LEDGER_EXTENSION: &str = "json";

type StateMap = BTreeMap<String, String>;

/// File-backed storage: one JSON file per ledger plus a shared key-value state file.
pub struct JsonStorage {
    root: PathBuf,
    ledgers_dir: PathBuf,
    state_file: PathBuf,
    state_lock: Mutex<()>,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let ledgers_dir = PathResolver::ledger_dir_in(&app_root);
        ensure_dir(&ledgers_dir)?;
        let state_file = PathResolver::state_file_in(&app_root);
        Ok(Self {
            root: app_root,
            ledgers_dir,
            state_file,
            state_lock: Mutex::new(()),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn ledger_path(&self, name: &str) -> PathBuf {
        self.ledgers_dir
            .join(format!("{}.{}", canonical_name(name), LEDGER_EXTENSION))
    }

    fn read_state(&self) -> Result<StateMap> {
        if self.state_file.exists() {
            read_json(&self.state_file)
        } else {
            Ok(StateMap::new())
        }
    }

    fn update_state<F, T>(&self, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut StateMap) -> T,
    {
        let _guard = self
            .state_lock
            .lock()
            .map_err(|_| LedgerError::Storage("state lock poisoned".into()))?;
        let mut state = self.read_state()?;
        let outcome = mutate(&mut state);
        write_json_atomic(&state, &self.state_file)?;
        Ok(outcome)
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, snapshot: &LedgerSnapshot, name: &str) -> Result<PathBuf> {
        let path = self.ledger_path(name);
        save_snapshot_to_file(snapshot, &path)?;
        tracing::info!(path = %path.display(), "ledger saved");
        Ok(path)
    }

    fn load(&self, name: &str) -> Result<LedgerSnapshot> {
        let path = self.ledger_path(name);
        if !path.exists() {
            return Err(LedgerError::Storage(format!(
                "ledger `{}` not found",
                canonical_name(name)
            )));
        }
        let snapshot = load_snapshot_from_file(&path)?;
        tracing::info!(path = %path.display(), "ledger loaded");
        Ok(snapshot)
    }

    fn exists(&self, name: &str) -> bool {
        self.ledger_path(name).exists()
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.ledgers_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(LEDGER_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

impl KeyValueStore for JsonStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_state()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update_state(|state| {
            state.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<bool> {
        self.update_state(|state| state.remove(key).is_some())
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "ledger".into()
    } else {
        sanitized
    }
}
