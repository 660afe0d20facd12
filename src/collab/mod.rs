//! External collaborators
//!
//! Narrow seams to things outside the ledger: text extraction from receipt
//! images and a language-completion adapter.

pub mod completion;
pub mod ocr;

pub use completion::{ChatMessage, CompletionAdapter, EchoCompletion, Role};
pub use ocr::{bulk_extract, collect_images, FileExtraction, TesseractCli, TextExtractor};
