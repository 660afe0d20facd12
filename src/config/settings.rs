//! User settings for Tally
//!
//! Preferences for the chat session: summary window, export location,
//! receipt fallback category and logging.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::TallyPaths;
use crate::error::TallyError;
use crate::storage::{read_json, write_json_atomic};

/// User settings for Tally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Window used by a bare `summary`
    #[serde(default = "default_summary_window_days")]
    pub summary_window_days: u32,

    /// Target of a bare `export csv`; `exports/transactions.csv` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_export_path: Option<PathBuf>,

    /// Category for receipt items no keyword matches
    #[serde(default = "default_receipt_category")]
    pub receipt_default_category: String,

    /// Rows shown by a bare `recent`
    #[serde(default = "default_recent_count")]
    pub recent_count: usize,

    /// Whether the guided setup runs for a month without a budget
    #[serde(default = "default_true")]
    pub onboarding_enabled: bool,

    /// `tracing` filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_summary_window_days() -> u32 {
    7
}

fn default_receipt_category() -> String {
    "Other".to_string()
}

fn default_recent_count() -> usize {
    10
}

fn default_true() -> bool {
    true
}

fn default_log_filter() -> String {
    "tally=warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            summary_window_days: default_summary_window_days(),
            default_export_path: None,
            receipt_default_category: default_receipt_category(),
            recent_count: default_recent_count(),
            onboarding_enabled: default_true(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or default settings if the file doesn't exist
    ///
    /// Nothing is written; the caller decides when to persist.
    pub fn load_or_create(paths: &TallyPaths) -> Result<Self, TallyError> {
        read_json(paths.settings_file())
            .map_err(|e| TallyError::Config(format!("Failed to load settings: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TallyPaths) -> Result<(), TallyError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Resolved target of a bare `export csv`
    pub fn export_path(&self, paths: &TallyPaths) -> PathBuf {
        self.default_export_path
            .clone()
            .unwrap_or_else(|| paths.default_export_file())
    }
}
