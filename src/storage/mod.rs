//! Storage layer for Tally
//!
//! Services talk to a [`Store`]; the file-backed [`JsonFileStore`] keeps the
//! whole ledger in one JSON document written atomically after every change.

pub mod file_io;
pub mod json_store;
pub mod memory;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use file_io::{read_json, read_json_or_quarantine, write_json_atomic};
pub use json_store::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::TallyResult;
use crate::models::{Budget, Transaction};

/// Persistence contract the services depend on
pub trait Store: Send + Sync {
    /// Append a transaction and make it durable
    fn save_transaction(&self, txn: &Transaction) -> TallyResult<()>;

    /// Transactions in ledger order, optionally filtered by category
    /// (case-insensitive)
    fn list_transactions(&self, category: Option<&str>) -> TallyResult<Vec<Transaction>>;

    fn get_budget(&self, month: &str) -> TallyResult<Option<Budget>>;

    /// Insert or replace the budget for its month and make it durable
    fn save_budget(&self, budget: &Budget) -> TallyResult<()>;
}

/// The persisted document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDocument {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budgets: BTreeMap<String, Budget>,
}

impl StateDocument {
    fn transactions_for(&self, category: Option<&str>) -> Vec<Transaction> {
        let mut txns: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| category.map_or(true, |c| t.in_category(c)))
            .cloned()
            .collect();
        txns.sort_by(|a, b| a.ledger_cmp(b));
        txns
    }
}
