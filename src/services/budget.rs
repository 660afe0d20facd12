//! Budget service
//!
//! Per-month category limits and spend accumulation.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{TallyError, TallyResult};
use crate::models::{category, Budget, CategorySummary, Money, Transaction};
use crate::storage::Store;

/// Service for budget management
pub struct BudgetService<'a> {
    store: &'a dyn Store,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Canonical period key for a date
    pub fn month_key(date: NaiveDate) -> String {
        crate::models::month_key(date)
    }

    /// Load the month's budget, or create and persist it seeded with
    /// `categories`
    pub fn get_or_create(&self, month: &str, categories: &[(String, Money)]) -> TallyResult<Budget> {
        if let Some(existing) = self.store.get_budget(month)? {
            return Ok(existing);
        }

        let budget = Budget::with_limits(
            month,
            categories
                .iter()
                .map(|(name, limit)| (category::normalize(name), *limit)),
        );
        self.store.save_budget(&budget)?;
        debug!(month, "created budget");
        Ok(budget)
    }

    /// Add a transaction's amount to its month's budget
    pub fn apply(&self, txn: &Transaction) -> TallyResult<Budget> {
        let budget = self.with_applied(&Self::month_key(txn.date), std::slice::from_ref(txn))?;
        self.store.save_budget(&budget)?;
        Ok(budget)
    }

    /// The month's budget with `txns` applied, not yet persisted
    ///
    /// Lets callers reject out-of-range spending before anything reaches the
    /// ledger; pair with [`BudgetService::save`].
    pub fn with_applied(&self, month: &str, txns: &[Transaction]) -> TallyResult<Budget> {
        let mut budget = self
            .store
            .get_budget(month)?
            .unwrap_or_else(|| Budget::new(month));

        for txn in txns {
            let txn_month = Self::month_key(txn.date);
            if txn_month != month {
                return Err(TallyError::Validation(format!(
                    "Transaction dated {} does not belong to {}",
                    txn.date, month
                )));
            }
            budget.apply_transaction(txn)?;
        }
        Ok(budget)
    }

    pub fn save(&self, budget: &Budget) -> TallyResult<()> {
        self.store.save_budget(budget)?;
        debug!(month = %budget.month, "saved budget");
        Ok(())
    }

    /// Summary rows sorted by category; empty when the month has no budget
    pub fn summary(&self, month: &str) -> TallyResult<Vec<CategorySummary>> {
        Ok(self
            .store
            .get_budget(month)?
            .map(|b| b.summary())
            .unwrap_or_default())
    }

    /// Summary row for one category, matched case-insensitively
    pub fn category_summary(&self, month: &str, name: &str) -> TallyResult<CategorySummary> {
        let budget = self
            .store
            .get_budget(month)?
            .ok_or_else(|| TallyError::budget_not_found(month))?;

        budget
            .category(name)
            .map(CategorySummary::from)
            .ok_or_else(|| TallyError::NotFound {
                entity_type: "Budget category",
                identifier: name.to_string(),
            })
    }

    /// Create missing categories with the given limits or overwrite the
    /// limits of existing ones; spending is preserved
    pub fn set_limits(&self, month: &str, updates: &[(String, Money)]) -> TallyResult<Budget> {
        if let Some((name, limit)) = updates.iter().find(|(_, limit)| limit.is_negative()) {
            return Err(TallyError::Validation(format!(
                "Limit for {} must be non-negative, got {}",
                name, limit
            )));
        }

        let mut budget = self.get_or_create(month, &[])?;
        for (name, limit) in updates {
            budget.set_limit(&category::normalize(name), *limit);
        }
        self.store.save_budget(&budget)?;

        info!(month, count = updates.len(), "updated budget limits");
        Ok(budget)
    }

    /// Categories with a positive limit, sorted by name
    pub fn list_limits(&self, month: &str) -> TallyResult<Vec<(String, Money)>> {
        Ok(self
            .summary(month)?
            .into_iter()
            .filter(|row| row.limit.is_positive())
            .map(|row| (row.category, row.limit))
            .collect())
    }
}
