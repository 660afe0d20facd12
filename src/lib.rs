//! Tally - chat-driven personal finance tracker
//!
//! Short text commands ("add 12.34 groceries milk", "set rent 1200",
//! "budget") drive a ledger of expenses and monthly category budgets kept in
//! a single JSON document.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Data directory resolution and user settings
//! - `error`: Custom error types
//! - `logging`: Process-wide `tracing` setup for the binary
//! - `models`: Money, transactions, budgets and receipt parse results
//! - `storage`: The `Store` trait with JSON-file and in-memory backends
//! - `services`: Ledger, budget, category and receipt logic
//! - `export`: CSV export
//! - `chat`: Intent parsing, guided setup and the orchestrator
//! - `collab`: OCR and language-completion collaborators
//!
//! # Example
//!
//! ```rust
//! use std::path::PathBuf;
//! use tally::chat::Orchestrator;
//! use tally::config::Settings;
//! use tally::storage::MemoryStore;
//!
//! let mut chat = Orchestrator::new(
//!     Box::new(MemoryStore::new()),
//!     Settings::default(),
//!     PathBuf::from("transactions.csv"),
//! )
//! .without_onboarding();
//!
//! assert_eq!(chat.handle("set groceries 100"), "Set Groceries limit to 100.00.");
//! assert_eq!(
//!     chat.handle("add 25 groceries veggies"),
//!     "Added 25.00 to Groceries. Remaining: 75.00."
//! );
//! ```

pub mod chat;
pub mod collab;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{TallyError, TallyResult};
