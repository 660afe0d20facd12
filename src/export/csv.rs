//! CSV Export functionality
//!
//! Writes the ledger as one row per transaction.

use std::io::Write;

use crate::error::TallyResult;
use crate::models::Transaction;

/// Column order of exported files
pub const CSV_HEADER: [&str; 5] = ["id", "date", "category", "amount", "description"];

/// Export transactions to CSV, returning the number of rows written
///
/// Amounts are written with two decimals and fields are quoted where needed.
pub fn export_transactions_csv<W: Write>(
    transactions: &[Transaction],
    writer: W,
) -> TallyResult<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for txn in transactions {
        wtr.write_record([
            txn.id.to_string(),
            txn.date.format("%Y-%m-%d").to_string(),
            txn.category.clone(),
            txn.amount.to_string(),
            txn.description.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(transactions.len())
}
