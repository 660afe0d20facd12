//! JSON file store
//!
//! Keeps the whole state document in memory behind a lock and rewrites the
//! file atomically after every mutation.

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::error::{TallyError, TallyResult};
use crate::models::{Budget, Transaction};

use super::file_io::{read_json_or_quarantine, write_json_atomic};
use super::{StateDocument, Store};

/// File-backed [`Store`]
pub struct JsonFileStore {
    path: PathBuf,
    data: RwLock<StateDocument>,
}

impl JsonFileStore {
    /// Open (or create) the state file at `path`
    ///
    /// An unreadable file is moved aside to `*.corrupt` and replaced with an
    /// empty document.
    pub fn open(path: impl Into<PathBuf>) -> TallyResult<Self> {
        let path = path.into();
        let loaded = read_json_or_quarantine::<StateDocument, _>(&path)?;

        if let Some(backup) = &loaded.quarantined {
            warn!(
                path = %path.display(),
                backup = %backup.display(),
                "state file was corrupt; moved aside and starting empty"
            );
        }

        let exists = path.exists();
        let store = Self {
            path,
            data: RwLock::new(loaded.value),
        };

        if !exists {
            let data = store.read()?;
            write_json_atomic(&store.path, &*data)?;
        }

        debug!(path = %store.path.display(), "opened state file");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> TallyResult<RwLockReadGuard<'_, StateDocument>> {
        self.data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> TallyResult<RwLockWriteGuard<'_, StateDocument>> {
        self.data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

impl Store for JsonFileStore {
    fn save_transaction(&self, txn: &Transaction) -> TallyResult<()> {
        let mut data = self.write()?;
        data.transactions.push(txn.clone());

        if let Err(e) = write_json_atomic(&self.path, &*data) {
            data.transactions.pop();
            return Err(e);
        }
        Ok(())
    }

    fn list_transactions(&self, category: Option<&str>) -> TallyResult<Vec<Transaction>> {
        Ok(self.read()?.transactions_for(category))
    }

    fn get_budget(&self, month: &str) -> TallyResult<Option<Budget>> {
        Ok(self.read()?.budgets.get(month).cloned())
    }

    fn save_budget(&self, budget: &Budget) -> TallyResult<()> {
        let mut data = self.write()?;
        let previous = data.budgets.insert(budget.month.clone(), budget.clone());

        if let Err(e) = write_json_atomic(&self.path, &*data) {
            match previous {
                Some(old) => data.budgets.insert(budget.month.clone(), old),
                None => data.budgets.remove(&budget.month),
            };
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, JsonFileStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp_dir.path().join("state.json")).unwrap();
        (temp_dir, store)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
    }

    #[test]
    fn test_open_creates_empty_document() {
        let (temp_dir, store) = create_test_store();
        assert!(temp_dir.path().join("state.json").exists());
        assert!(store.list_transactions(None).unwrap().is_empty());
        assert!(store.get_budget("2025-08").unwrap().is_none());
    }

    #[test]
    fn test_list_is_sorted_and_filtered() {
        let (_temp_dir, store) = create_test_store();
        let late = Transaction::new(Money::from_cents(300), "Coffee", "", date(9));
        let early = Transaction::new(Money::from_cents(100), "Groceries", "", date(1));
        let middle = Transaction::new(Money::from_cents(200), "coffee", "", date(5));

        store.save_transaction(&late).unwrap();
        store.save_transaction(&early).unwrap();
        store.save_transaction(&middle).unwrap();

        let all = store.list_transactions(None).unwrap();
        let ids: Vec<_> = all.iter().map(|t| t.id).collect();
        assert_eq!(ids, [early.id, middle.id, late.id]);

        let coffee = store.list_transactions(Some("COFFEE")).unwrap();
        assert_eq!(coffee.len(), 2);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, store) = create_test_store();
        let txn = Transaction::new(Money::from_cents(2500), "Groceries", "veggies", date(7))
            .with_meta("source", "chat");
        let mut budget = Budget::with_limits("2025-08", [("Groceries", Money::from_cents(10_000))]);
        budget.apply_transaction(&txn).unwrap();

        store.save_transaction(&txn).unwrap();
        store.save_budget(&budget).unwrap();

        let reopened = JsonFileStore::open(temp_dir.path().join("state.json")).unwrap();
        assert_eq!(reopened.list_transactions(None).unwrap(), vec![txn]);
        assert_eq!(reopened.get_budget("2025-08").unwrap(), Some(budget));
    }

    #[test]
    fn test_save_budget_replaces_month() {
        let (_temp_dir, store) = create_test_store();
        let mut budget = Budget::new("2025-08");
        store.save_budget(&budget).unwrap();

        budget.set_limit("Rent", Money::from_cents(120_000));
        store.save_budget(&budget).unwrap();

        let loaded = store.get_budget("2025-08").unwrap().unwrap();
        assert_eq!(loaded.categories.len(), 1);
    }

    #[test]
    fn test_corrupt_file_is_moved_aside() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        fs::write(&path, "{\"transactions\": [oops").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.list_transactions(None).unwrap().is_empty());
        assert!(temp_dir.path().join("state.corrupt").exists());
        assert!(path.exists());
    }

    #[test]
    fn test_persisted_layout() {
        let (temp_dir, store) = create_test_store();
        let txn = Transaction::new(Money::from_cents(1234), "Groceries", "milk", date(7));
        store.save_transaction(&txn).unwrap();

        let raw = fs::read_to_string(temp_dir.path().join("state.json")).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["transactions"][0]["amount"], "12.34");
        assert_eq!(doc["transactions"][0]["txn_date"], "2025-08-07");
        assert!(doc["budgets"].is_object());
    }
}
