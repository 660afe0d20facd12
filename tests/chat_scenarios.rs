//! End-to-end conversations against a real state file

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tally::chat::Orchestrator;
use tally::config::Settings;
use tally::storage::{JsonFileStore, Store};
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 10).unwrap()
}

fn state_file(dir: &TempDir) -> PathBuf {
    dir.path().join("data").join("state.json")
}

fn open(dir: &TempDir) -> Orchestrator {
    let store = JsonFileStore::open(state_file(dir)).unwrap();
    Orchestrator::new(
        Box::new(store),
        Settings::default(),
        dir.path().join("exports").join("transactions.csv"),
    )
    .with_today(today())
}

/// Orchestrator for plain command scenarios
fn chat(dir: &TempDir) -> Orchestrator {
    open(dir).without_onboarding()
}

fn line_count(path: &Path) -> usize {
    fs::read_to_string(path).unwrap().lines().count()
}

#[test]
fn set_then_add_reports_remaining_budget() {
    let dir = TempDir::new().unwrap();
    let mut chat = chat(&dir);

    assert_eq!(chat.handle("set groceries 100"), "Set Groceries limit to 100.00.");
    assert_eq!(
        chat.handle("add 25.00 groceries veggies"),
        "Added 25.00 to Groceries. Remaining: 75.00."
    );
    assert_eq!(
        chat.handle("budget groceries"),
        "Groceries: spent 25.00 / 100.00 (remaining 75.00)"
    );
}

#[test]
fn unbudgeted_category_has_no_limit_framing() {
    let dir = TempDir::new().unwrap();
    let mut chat = chat(&dir);

    assert_eq!(
        chat.handle("add 10 snacks chips"),
        "Added 10.00 to Snacks. Remaining: spent 10.00 (no limit)."
    );
    assert_eq!(chat.handle("budget snacks"), "Snacks: spent 10.00 (no limit)");
    assert_eq!(
        chat.handle("limits"),
        "No limits configured yet. Use set <category> <limit>."
    );
}

#[test]
fn add_with_description_and_date() {
    let dir = TempDir::new().unwrap();
    let mut chat = chat(&dir);

    assert_eq!(
        chat.handle("add 12.34 groceries milk and bread on 2025-08-07"),
        "Added 12.34 to Groceries. Remaining: spent 12.34 (no limit)."
    );

    let store = JsonFileStore::open(state_file(&dir)).unwrap();
    let txns = store.list_transactions(None).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].amount.to_string(), "12.34");
    assert_eq!(txns[0].category, "Groceries");
    assert_eq!(txns[0].description, "milk and bread");
    assert_eq!(txns[0].date, NaiveDate::from_ymd_opt(2025, 8, 7).unwrap());
}

#[test]
fn invalid_inputs_get_corrective_replies() {
    let dir = TempDir::new().unwrap();
    let mut chat = chat(&dir);

    assert_eq!(chat.handle("add 0 coffee"), "Amount must be positive.");
    assert_eq!(
        chat.handle("add 3 coffee on 2025-02-30"),
        "Invalid date format. Use YYYY-MM-DD."
    );
    assert_eq!(chat.handle("set rent lots"), "Invalid limit. Use set groceries 300");
    assert_eq!(chat.handle("set rent -10"), "Limit must be non-negative.");
    assert_eq!(chat.handle("export pdf"), "Only csv export supported currently.");
    assert_eq!(chat.handle("buy me a coffee"), "Could not understand. Type 'help'.");
    assert_eq!(
        chat.handle("budget"),
        "No budget yet. Add expenses to start tracking."
    );

    // None of the above touched the ledger
    let store = JsonFileStore::open(state_file(&dir)).unwrap();
    assert!(store.list_transactions(None).unwrap().is_empty());
}

#[test]
fn budget_listing_and_limits() {
    let dir = TempDir::new().unwrap();
    let mut chat = chat(&dir);

    chat.handle("set rent 1200");
    chat.handle("set groceries 300");
    chat.handle("add 45.50 groceries");
    chat.handle("add 4 coffee");

    assert_eq!(
        chat.handle("budget"),
        "Budget\nCoffee: spent 4.00 (no limit)\nGroceries: 45.50/300.00 rem 254.50\nRent: 0.00/1200.00 rem 1200.00"
    );
    assert_eq!(chat.handle("limits"), "Limits\nGroceries: 300.00\nRent: 1200.00");
    assert_eq!(chat.handle("budget travel"), "No data for Travel.");
}

#[test]
fn receipt_lines_are_recorded() {
    let dir = TempDir::new().unwrap();
    let mut chat = chat(&dir);

    assert_eq!(
        chat.handle("receipt: Milk 2.50\nBread 1.20\nTotal 3.70"),
        "Parsed 2 lines. Detected total 3.70."
    );
    assert_eq!(
        chat.handle("receipt:\nCoffee 3.00\n???"),
        "Parsed 1 lines. Warnings: 1"
    );
    assert_eq!(
        chat.handle("budget"),
        "Budget\nDining: spent 3.00 (no limit)\nOther: spent 3.70 (no limit)"
    );
}

#[test]
fn export_writes_header_plus_rows() {
    let dir = TempDir::new().unwrap();
    let mut chat = chat(&dir);
    chat.handle("add 1 coffee");
    chat.handle("add 2 coffee");
    chat.handle("add 3 rent");

    let target = dir.path().join("out.csv");
    assert_eq!(
        chat.handle(&format!("export csv {}", target.display())),
        format!("Exported 3 transactions to {}.", target.display())
    );
    assert_eq!(line_count(&target), 4);

    let default_target = dir.path().join("exports").join("transactions.csv");
    assert_eq!(
        chat.handle("export CSV"),
        format!("Exported 3 transactions to {}.", default_target.display())
    );
    assert_eq!(line_count(&default_target), 4);
}

#[test]
fn state_survives_restart() {
    let dir = TempDir::new().unwrap();
    {
        let mut chat = chat(&dir);
        chat.handle("set groceries 100");
        chat.handle("add 25 groceries veggies");
    }

    let mut chat = chat(&dir);
    assert_eq!(
        chat.handle("budget groceries"),
        "Groceries: spent 25.00 / 100.00 (remaining 75.00)"
    );
    assert_eq!(chat.handle("summary"), "Last 7d: 25.00 across 1 transactions.");
}

#[test]
fn corrupt_state_starts_fresh() {
    let dir = TempDir::new().unwrap();
    let path = state_file(&dir);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{ not json").unwrap();

    let mut chat = chat(&dir);
    assert_eq!(
        chat.handle("add 5 coffee"),
        "Added 5.00 to Coffee. Remaining: spent 5.00 (no limit)."
    );
    assert!(dir.path().join("data").join("state.corrupt").exists());
}

#[test]
fn out_of_range_spending_is_rejected_cleanly() {
    let dir = TempDir::new().unwrap();
    let mut chat = chat(&dir);

    let first = chat.handle("add 92233720368547758 big");
    assert!(first.starts_with("Added 92233720368547758.00 to Big."));
    let second = chat.handle("add 92233720368547758 big");
    assert!(second.starts_with("Amount too large"));
    drop(chat);

    let store = JsonFileStore::open(state_file(&dir)).unwrap();
    let ledger = store.list_transactions(None).unwrap();
    assert_eq!(ledger.len(), 1);
    let budget = store.get_budget("2025-08").unwrap().unwrap();
    assert_eq!(budget.category("big").unwrap().spent, ledger[0].amount);
}

#[test]
fn onboarding_banner_on_blank_input() {
    let dir = TempDir::new().unwrap();
    let mut chat = open(&dir);

    assert!(chat.handle("").contains("Welcome"));
    assert!(chat.onboarding().is_active());
}

#[test]
fn onboarding_skip_is_permanent() {
    let dir = TempDir::new().unwrap();
    let mut chat = open(&dir);

    assert!(chat.handle("skip").contains("Onboarding skipped"));
    assert!(chat.handle("add 5.00 coffee test").starts_with("Added"));
    assert_eq!(chat.handle(""), "Could not understand. Type 'help'.");
    assert_eq!(chat.handle("3"), "Could not understand. Type 'help'.");
}

#[test]
fn onboarding_guided_flow() {
    let dir = TempDir::new().unwrap();
    let mut chat = open(&dir);

    assert!(chat.handle("start").contains("Enter how many"));
    assert!(chat.handle("3").contains("Now enter each category"));
    assert_eq!(chat.handle("groceries 300"), "Added Groceries (300.00). 1/3 entered.");
    assert!(chat.handle("rent 1200").contains("Added Rent"));
    assert!(chat.handle("fun 100").contains("Type 'done'"));
    assert_eq!(
        chat.handle("done"),
        "Setup complete. Budget limits saved for 2025-08: Groceries 300.00, Rent 1200.00, Fun 100.00. Type 'help' to see commands."
    );
    assert!(!chat.onboarding().is_active());

    assert_eq!(
        chat.handle("add 10 groceries milk"),
        "Added 10.00 to Groceries. Remaining: 290.00."
    );
    assert_eq!(
        chat.handle("limits"),
        "Limits\nFun: 100.00\nGroceries: 300.00\nRent: 1200.00"
    );
}

#[test]
fn onboarding_invalid_count_then_valid() {
    let dir = TempDir::new().unwrap();
    let mut chat = open(&dir);

    assert!(chat.handle("abc").contains("number 1-10"));
    assert!(chat.handle("2").contains("Now enter each category"));
    assert!(chat.handle("food").starts_with("Format:"));
    assert!(chat.handle("done").contains("No categories entered yet"));
    assert!(chat.handle("food 200").starts_with("Added"));
    assert!(chat.handle("transport 150").contains("Type 'done'"));
    assert!(chat.handle("done").starts_with("Setup complete"));
}

#[test]
fn command_bypasses_onboarding() {
    let dir = TempDir::new().unwrap();
    let mut chat = open(&dir);

    assert!(chat.handle("add 5.00 coffee test").starts_with("Added"));
    assert!(!chat.onboarding().is_active());
    assert!(!chat.handle("").contains("Welcome"));
}

#[test]
fn existing_budget_skips_onboarding() {
    let dir = TempDir::new().unwrap();
    chat(&dir).handle("set rent 1200");

    let mut chat = open(&dir);
    assert!(chat.welcome().is_none());
    assert_eq!(chat.handle(""), "Could not understand. Type 'help'.");
    assert!(!chat.onboarding().is_active());
}
