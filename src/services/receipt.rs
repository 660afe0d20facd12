//! Receipt line parser
//!
//! Turns pasted (or OCR-extracted) receipt text into item lines. Lines that
//! cannot be read produce warnings instead of failing the whole receipt.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::warn;

use crate::models::{Money, ReceiptLine, ReceiptParseResult, Transaction};

use super::category::CategoryResolver;

fn line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<desc>.+?)\s+(?P<amount>\d+[.,]\d{2})$").expect("receipt line regex")
    })
}

fn total_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^total\b").expect("receipt total regex"))
}

fn amount_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+[.,]\d{2}").expect("receipt amount regex"))
}

/// Parse a receipt amount token, accepting a comma as decimal separator
fn parse_amount(token: &str) -> Option<Money> {
    Money::parse(&token.replace(',', ".")).ok()
}

#[derive(Debug, Clone, Default)]
pub struct ReceiptParser {
    resolver: CategoryResolver,
}

impl ReceiptParser {
    pub fn new(resolver: CategoryResolver) -> Self {
        Self { resolver }
    }

    /// Split receipt text into item lines, a detected total and warnings
    pub fn parse(&self, text: &str) -> ReceiptParseResult {
        let mut result = ReceiptParseResult {
            original_text: text.to_string(),
            ..Default::default()
        };

        for raw in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            // "Total 3.70" also reads as an item, so totals are checked first
            if total_regex().is_match(raw) {
                if let Some(total) = amount_regex()
                    .find_iter(raw)
                    .last()
                    .and_then(|m| parse_amount(m.as_str()))
                {
                    result.total_detected = Some(total);
                }
                continue;
            }

            let item = line_regex().captures(raw).and_then(|caps| {
                let amount = parse_amount(&caps["amount"]).filter(Money::is_positive)?;
                Some(ReceiptLine::new(raw, caps["desc"].trim(), amount))
            });

            match item {
                Some(line) => result.lines.push(line),
                None => {
                    warn!(line = raw, "unparsed receipt line");
                    result.warnings.push(format!("Unparsed line: {}", raw));
                }
            }
        }

        result
    }

    /// Draft transactions (not persisted) for every parsed line
    pub fn to_transactions(&self, result: &ReceiptParseResult, date: NaiveDate) -> Vec<Transaction> {
        result
            .lines
            .iter()
            .map(|line| {
                Transaction::new(
                    line.amount,
                    self.resolver.resolve(&line.description),
                    &line.description,
                    date,
                )
                .with_meta("source", "receipt")
                .with_meta("raw", line.raw.as_str())
            })
            .collect()
    }
}
