//! Monthly budget model
//!
//! A budget holds per-category limits and the amount spent against them for a
//! single calendar month, keyed by "YYYY-MM".

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{TallyError, TallyResult};

use super::category;
use super::ids::BudgetId;
use super::money::Money;
use super::transaction::Transaction;

/// Canonical period key for a date ("2025-08")
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// One category's limit and accumulated spending
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub name: String,
    pub limit: Money,
    #[serde(default)]
    pub spent: Money,
}

impl BudgetCategory {
    /// Create a category with nothing spent yet
    pub fn new(name: impl Into<String>, limit: Money) -> Self {
        Self {
            name: name.into(),
            limit,
            spent: Money::zero(),
        }
    }

    /// Limit minus spent; negative when over budget
    pub fn remaining(&self) -> Money {
        self.limit - self.spent
    }

    /// Spent as a fraction of the limit, rounded to two places.
    ///
    /// Defined as 0.0 when the limit is zero.
    pub fn usage_ratio(&self) -> f64 {
        if self.limit.is_zero() {
            return 0.0;
        }
        let ratio = self.spent.cents() as f64 / self.limit.cents() as f64;
        (ratio * 100.0).round() / 100.0
    }
}

/// Summary row for one category in a month
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    pub limit: Money,
    pub spent: Money,
    pub remaining: Money,
    pub usage_ratio: f64,
}

impl CategorySummary {
    /// Whether the category was auto-created without a configured limit
    pub fn is_unlimited(&self) -> bool {
        self.limit.is_zero()
    }
}

impl From<&BudgetCategory> for CategorySummary {
    fn from(cat: &BudgetCategory) -> Self {
        Self {
            category: cat.name.clone(),
            limit: cat.limit,
            spent: cat.spent,
            remaining: cat.remaining(),
            usage_ratio: cat.usage_ratio(),
        }
    }
}

impl fmt::Display for CategorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: spent {} / {} (remaining {})",
            self.category, self.spent, self.limit, self.remaining
        )
    }
}

/// A month's budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    /// Period key ("YYYY-MM")
    pub month: String,

    pub created_at: DateTime<Utc>,

    /// Category name -> limit/spent, kept sorted by name
    #[serde(default)]
    pub categories: BTreeMap<String, BudgetCategory>,
}

impl Budget {
    /// Create an empty budget for a month
    pub fn new(month: impl Into<String>) -> Self {
        Self {
            id: BudgetId::new(),
            month: month.into(),
            created_at: Utc::now(),
            categories: BTreeMap::new(),
        }
    }

    /// Create a budget seeded with category limits
    pub fn with_limits<I, S>(month: impl Into<String>, limits: I) -> Self
    where
        I: IntoIterator<Item = (S, Money)>,
        S: Into<String>,
    {
        let mut budget = Self::new(month);
        for (name, limit) in limits {
            let name: String = name.into();
            budget.set_limit(&name, limit);
        }
        budget
    }

    /// Storage key of a category, matched case-insensitively
    fn key_for(&self, name: &str) -> Option<String> {
        self.categories
            .keys()
            .find(|key| category::same_category(key, name))
            .cloned()
    }

    /// Look up a category case-insensitively
    pub fn category(&self, name: &str) -> Option<&BudgetCategory> {
        self.key_for(name).and_then(|key| self.categories.get(&key))
    }

    /// Create the category with this limit, or overwrite the limit of the
    /// existing one (spent is preserved)
    pub fn set_limit(&mut self, name: &str, limit: Money) {
        match self.key_for(name) {
            Some(key) => {
                if let Some(cat) = self.categories.get_mut(&key) {
                    cat.limit = limit;
                }
            }
            None => {
                self.categories
                    .insert(name.to_string(), BudgetCategory::new(name, limit));
            }
        }
    }

    /// Add a transaction's amount to its category's spending, creating a
    /// zero-limit category when none is configured
    ///
    /// Fails without changing anything if the new total is out of range.
    pub fn apply_transaction(&mut self, txn: &Transaction) -> TallyResult<()> {
        let Some(key) = self.key_for(&txn.category) else {
            self.categories.insert(
                txn.category.clone(),
                BudgetCategory {
                    spent: txn.amount,
                    ..BudgetCategory::new(txn.category.clone(), Money::zero())
                },
            );
            return Ok(());
        };

        if let Some(cat) = self.categories.get_mut(&key) {
            cat.spent = cat.spent.checked_add(txn.amount).ok_or_else(|| {
                TallyError::Validation(format!(
                    "Spending for {} would exceed the supported range",
                    cat.name
                ))
            })?;
        }
        Ok(())
    }

    /// Summary rows sorted by category name
    pub fn summary(&self) -> Vec<CategorySummary> {
        self.categories.values().map(CategorySummary::from).collect()
    }
}
