//! Transaction service
//!
//! The ledger: append-only transaction recording, category filtering, totals
//! and CSV export.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use chrono::{Duration, Local, NaiveDate};
use tracing::{debug, info};

use crate::error::{TallyError, TallyResult};
use crate::export::csv::export_transactions_csv;
use crate::models::{Metadata, MetaValue, Money, Transaction};
use crate::storage::Store;

/// Service for ledger operations
pub struct TransactionService<'a> {
    store: &'a dyn Store,
}

/// Input for recording a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub amount: Money,
    pub category: String,
    /// Defaults to the category name
    pub description: Option<String>,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    pub meta: Metadata,
}

impl CreateTransactionInput {
    pub fn new(amount: Money, category: impl Into<String>) -> Self {
        Self {
            amount,
            category: category.into(),
            description: None,
            date: None,
            meta: Metadata::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }
}

/// Spending inside a trailing window of days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSummary {
    pub days: u32,
    pub total: Money,
    pub count: usize,
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Record and persist a new transaction
    pub fn add(&self, input: CreateTransactionInput) -> TallyResult<Transaction> {
        self.record(Self::build(input))
    }

    /// The transaction `input` describes, without persisting it
    pub fn build(input: CreateTransactionInput) -> Transaction {
        let date = input.date.unwrap_or_else(|| Local::now().date_naive());
        let description = input.description.unwrap_or_default();

        let mut txn = Transaction::new(input.amount, &input.category, &description, date);
        txn.meta = input.meta;
        txn
    }

    /// Persist an already-built transaction (e.g. a receipt draft)
    pub fn record(&self, txn: Transaction) -> TallyResult<Transaction> {
        if !txn.amount.is_positive() {
            return Err(TallyError::Validation(format!(
                "Amount must be positive, got {}",
                txn.amount
            )));
        }

        self.store.save_transaction(&txn)?;
        debug!(id = %txn.id.short(), amount = %txn.amount, category = %txn.category, "recorded transaction");
        Ok(txn)
    }

    /// All transactions in ledger order, optionally for one category
    pub fn list(&self, category: Option<&str>) -> TallyResult<Vec<Transaction>> {
        self.store.list_transactions(category)
    }

    /// Sum of amounts, optionally for one category
    pub fn total_for(&self, category: Option<&str>) -> TallyResult<Money> {
        Ok(self.list(category)?.iter().map(|t| t.amount).sum())
    }

    /// The last `n` transactions in ledger order
    pub fn recent(&self, n: usize) -> TallyResult<Vec<Transaction>> {
        let mut txns = self.list(None)?;
        let skip = txns.len().saturating_sub(n);
        Ok(txns.split_off(skip))
    }

    /// Total and count of transactions dated within the last `days` days
    /// (strictly after `today - days`)
    pub fn window_summary(&self, days: u32, today: NaiveDate) -> TallyResult<WindowSummary> {
        let cutoff = Duration::try_days(i64::from(days))
            .and_then(|span| today.checked_sub_signed(span))
            .ok_or_else(|| TallyError::Validation(format!("Window of {} days is too large", days)))?;

        let txns: Vec<Transaction> = self
            .list(None)?
            .into_iter()
            .filter(|t| t.date > cutoff)
            .collect();

        Ok(WindowSummary {
            days,
            total: txns.iter().map(|t| t.amount).sum(),
            count: txns.len(),
        })
    }

    /// Write every transaction to a CSV file, returning the row count
    pub fn export_csv(&self, path: &Path) -> TallyResult<usize> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                TallyError::Export(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let file = File::create(path).map_err(|e| {
            TallyError::Export(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        let txns = self.list(None)?;
        let count = export_transactions_csv(&txns, BufWriter::new(file))?;
        info!(path = %path.display(), count, "exported transactions");
        Ok(count)
    }
}
