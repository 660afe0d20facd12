//! Reply formatting
//!
//! Fixed reply texts and the budget/ledger renderings used by the
//! orchestrator.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{CategorySummary, Money, Transaction};

pub const HELP_TEXT: &str = "Commands:
 add 12.34 groceries milk and bread [on YYYY-MM-DD]
 set <category> <limit>  # set budget limit for category
 budget [category]
 limits  # list configured limits
 receipt: <paste receipt text>
 summary 7d|30d
 recent [N]  # last N transactions
 export csv [path]
 help";

pub const NOT_UNDERSTOOD: &str = "Could not understand. Type 'help'.";

const DESCRIPTION_WIDTH: usize = 28;

/// Remaining budget as shown to the user; categories without a limit show
/// their spending instead of a negative remainder
pub fn friendly_remaining(row: &CategorySummary) -> String {
    if row.is_unlimited() {
        format!("spent {} (no limit)", row.spent)
    } else {
        row.remaining.to_string()
    }
}

/// Reply for `budget <category>`
pub fn budget_line(row: &CategorySummary) -> String {
    if row.is_unlimited() {
        format!("{}: spent {} (no limit)", row.category, row.spent)
    } else {
        row.to_string()
    }
}

/// Reply for a bare `budget`
pub fn budget_listing(rows: &[CategorySummary]) -> String {
    let lines: Vec<String> = rows
        .iter()
        .map(|row| {
            if row.is_unlimited() {
                format!("{}: {}", row.category, friendly_remaining(row))
            } else {
                format!(
                    "{}: {}/{} rem {}",
                    row.category, row.spent, row.limit, row.remaining
                )
            }
        })
        .collect();
    format!("Budget\n{}", lines.join("\n"))
}

/// Reply for `limits`
pub fn limits_listing(limits: &[(String, Money)]) -> String {
    let lines: Vec<String> = limits
        .iter()
        .map(|(name, limit)| format!("{}: {}", name, limit))
        .collect();
    format!("Limits\n{}", lines.join("\n"))
}

#[derive(Tabled)]
struct RegisterRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl From<&Transaction> for RegisterRow {
    fn from(txn: &Transaction) -> Self {
        Self {
            date: txn.date.format("%Y-%m-%d").to_string(),
            category: txn.category.clone(),
            description: truncate(&txn.description, DESCRIPTION_WIDTH),
            amount: txn.amount.to_string(),
        }
    }
}

/// Reply for `recent`: a small register table
pub fn recent_table(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions yet.".to_string();
    }

    let rows: Vec<RegisterRow> = transactions.iter().map(RegisterRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("Last {} transactions\n{}", transactions.len(), table)
}

/// Shorten to at most `max_len` characters, marking the cut with "..."
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BudgetCategory;
    use chrono::NaiveDate;

    fn row(name: &str, limit: i64, spent: i64) -> CategorySummary {
        let mut cat = BudgetCategory::new(name, Money::from_cents(limit));
        cat.spent = Money::from_cents(spent);
        CategorySummary::from(&cat)
    }

    #[test]
    fn test_budget_line() {
        assert_eq!(
            budget_line(&row("Groceries", 10_000, 2_500)),
            "Groceries: spent 25.00 / 100.00 (remaining 75.00)"
        );
        assert_eq!(
            budget_line(&row("Snacks", 0, 1_000)),
            "Snacks: spent 10.00 (no limit)"
        );
    }

    #[test]
    fn test_friendly_remaining_can_be_negative_with_limit() {
        assert_eq!(friendly_remaining(&row("Dining", 2_000, 3_510)), "-15.10");
        assert_eq!(
            friendly_remaining(&row("Snacks", 0, 500)),
            "spent 5.00 (no limit)"
        );
    }

    #[test]
    fn test_budget_listing() {
        let rows = [row("Groceries", 10_000, 2_500), row("Snacks", 0, 1_000)];
        assert_eq!(
            budget_listing(&rows),
            "Budget\nGroceries: 25.00/100.00 rem 75.00\nSnacks: spent 10.00 (no limit)"
        );
    }

    #[test]
    fn test_limits_listing() {
        let limits = vec![("Rent".to_string(), Money::from_cents(120_000))];
        assert_eq!(limits_listing(&limits), "Limits\nRent: 1200.00");
    }

    #[test]
    fn test_recent_table() {
        let txn = Transaction::new(
            Money::from_cents(450),
            "Coffee",
            "flat white",
            NaiveDate::from_ymd_opt(2025, 8, 7).unwrap(),
        );
        let out = recent_table(&[txn]);
        assert!(out.starts_with("Last 1 transactions\n"));
        assert!(out.contains("Date"));
        assert!(out.contains("2025-08-07"));
        assert!(out.contains("flat white"));
        assert!(out.contains("4.50"));

        assert_eq!(recent_table(&[]), "No transactions yet.");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long description", 9), "a long...");
        assert_eq!(truncate("café au lait", 7), "café...");
        assert_eq!(truncate("abcdef", 2), "..");
    }
}
