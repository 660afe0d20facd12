//! Service layer for Tally
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, computed fields, and cross-aggregate updates.

pub mod budget;
pub mod category;
pub mod receipt;
pub mod transaction;

pub use budget::BudgetService;
pub use category::{CategoryResolver, DEFAULT_CATEGORY};
pub use receipt::ReceiptParser;
pub use transaction::{CreateTransactionInput, TransactionService, WindowSummary};
