//! Transaction model
//!
//! Transactions are immutable spending records. They are created once by the
//! ledger service, persisted immediately, and never edited afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use super::category;
use super::ids::TransactionId;
use super::money::Money;

/// A scalar metadata value attached to a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Sorted key/value bag so serialization is deterministic
pub type Metadata = BTreeMap<String, MetaValue>;

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Amount spent (always positive when created through the ledger service)
    pub amount: Money,

    /// Title-cased category name
    pub category: String,

    /// Free text; defaults to the category name
    pub description: String,

    /// Calendar date the expense happened on
    #[serde(rename = "txn_date")]
    pub date: NaiveDate,

    /// When the record was captured
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub meta: Metadata,
}

impl Transaction {
    /// Create a new transaction, normalizing category and description
    pub fn new(amount: Money, category: &str, description: &str, date: NaiveDate) -> Self {
        let category = category::normalize(category);
        let description = match description.trim() {
            "" => category.clone(),
            text => text.to_string(),
        };
        Self {
            id: TransactionId::new(),
            amount,
            category,
            description,
            date,
            created_at: Utc::now(),
            meta: Metadata::new(),
        }
    }

    /// Attach a metadata entry
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Check whether this transaction belongs to a category (case-insensitive)
    pub fn in_category(&self, name: &str) -> bool {
        category::same_category(&self.category, name)
    }

    /// Ledger order: transaction date, then capture time
    pub fn ledger_cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then(self.created_at.cmp(&other.created_at))
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.category,
            self.description,
            self.amount
        )
    }
}
