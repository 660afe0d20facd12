//! Export module for Tally
//!
//! Spreadsheet-compatible CSV export of the ledger.

pub mod csv;

pub use self::csv::{export_transactions_csv, CSV_HEADER};
