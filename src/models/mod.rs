//! Core data models for Tally
//!
//! This module contains the data structures of the ledger domain:
//! transactions, monthly budgets, receipt parse results and money.

pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod receipt;
pub mod transaction;

pub use budget::{month_key, Budget, BudgetCategory, CategorySummary};
pub use ids::{BudgetId, TransactionId};
pub use money::{Money, MoneyParseError};
pub use receipt::{ReceiptLine, ReceiptParseResult};
pub use transaction::{MetaValue, Metadata, Transaction};
