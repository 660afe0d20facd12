//! In-process store
//!
//! Same contract as the file store without touching disk. Used for one-shot
//! sessions and tests.

use std::sync::RwLock;

use crate::error::{TallyError, TallyResult};
use crate::models::{Budget, Transaction};

use super::{StateDocument, Store};

#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<StateDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything held so far
    pub fn snapshot(&self) -> TallyResult<StateDocument> {
        let data = self
            .data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.clone())
    }
}

impl Store for MemoryStore {
    fn save_transaction(&self, txn: &Transaction) -> TallyResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.transactions.push(txn.clone());
        Ok(())
    }

    fn list_transactions(&self, category: Option<&str>) -> TallyResult<Vec<Transaction>> {
        Ok(self.snapshot()?.transactions_for(category))
    }

    fn get_budget(&self, month: &str) -> TallyResult<Option<Budget>> {
        Ok(self.snapshot()?.budgets.get(month).cloned())
    }

    fn save_budget(&self, budget: &Budget) -> TallyResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.budgets.insert(budget.month.clone(), budget.clone());
        Ok(())
    }
}
