//! Chat orchestrator
//!
//! Single entry point that turns one line of user text into one reply. The
//! guided setup gets the first look at every input; everything else goes
//! through the intent parser and on to the services.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use tracing::{debug, error, info, info_span, Span};

use crate::config::{Settings, TallyPaths};
use crate::error::{TallyError, TallyResult};
use crate::models::{category, CategorySummary, Money};
use crate::services::{
    BudgetService, CategoryResolver, CreateTransactionInput, ReceiptParser, TransactionService,
};
use crate::storage::{JsonFileStore, Store};

use super::format::{
    self, budget_line, budget_listing, friendly_remaining, limits_listing, recent_table,
};
use super::intent::{self, Intent};
use super::onboarding::{Onboarding, OnboardingState, Step, WELCOME_BANNER};

const INVALID_AMOUNT: &str = "Invalid amount. Example: add 12.34 groceries milk";
const AMOUNT_NOT_POSITIVE: &str = "Amount must be positive.";
const AMOUNT_TOO_LARGE: &str = "Amount too large: budget totals would overflow.";
const INVALID_DATE: &str = "Invalid date format. Use YYYY-MM-DD.";
const INVALID_LIMIT: &str = "Invalid limit. Use set groceries 300";
const NEGATIVE_LIMIT: &str = "Limit must be non-negative.";
const NO_BUDGET: &str = "No budget yet. Add expenses to start tracking.";
const NO_LIMITS: &str = "No limits configured yet. Use set <category> <limit>.";
const UNSUPPORTED_EXPORT: &str = "Only csv export supported currently.";
const EMPTY_RECEIPT: &str = "Empty receipt body. Use 'receipt:' then lines like 'Milk 2.50'";
const INVALID_WINDOW: &str = "Invalid window. Use e.g. summary 7d";
const INVALID_COUNT: &str = "Invalid count. Use e.g. recent 5";

pub struct Orchestrator {
    store: Box<dyn Store>,
    settings: Settings,
    export_path: PathBuf,
    receipts: ReceiptParser,
    onboarding: Onboarding,
    span: Span,
    today: Option<NaiveDate>,
}

impl Orchestrator {
    /// Build an orchestrator over any store
    pub fn new(store: Box<dyn Store>, settings: Settings, export_path: PathBuf) -> Self {
        let resolver =
            CategoryResolver::new().with_default(settings.receipt_default_category.clone());
        let onboarding = if settings.onboarding_enabled {
            Onboarding::new()
        } else {
            Onboarding::disabled()
        };

        Self {
            store,
            settings,
            export_path,
            receipts: ReceiptParser::new(resolver),
            onboarding,
            span: info_span!("chat"),
            today: None,
        }
    }

    /// Open the state file under `paths`
    pub fn open(paths: &TallyPaths, settings: Settings) -> TallyResult<Self> {
        let store = JsonFileStore::open(paths.state_file())?;
        let export_path = settings.export_path(paths);
        Ok(Self::new(Box::new(store), settings, export_path))
    }

    /// Log every handled input inside `span`
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Pin "today" (used for default dates, the current month and summaries)
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Skip the guided setup entirely
    pub fn without_onboarding(mut self) -> Self {
        self.onboarding = Onboarding::disabled();
        self
    }

    pub fn onboarding(&self) -> &Onboarding {
        &self.onboarding
    }

    /// The banner to show before the first prompt, if the guided setup is
    /// going to run
    pub fn welcome(&mut self) -> Option<String> {
        let span = self.span.clone();
        let _enter = span.enter();

        if let Err(e) = self.check_first_interaction() {
            error!(error = %e, "failed to check for an existing budget");
            return None;
        }
        (self.onboarding.state() == &OnboardingState::AwaitingCount)
            .then(|| WELCOME_BANNER.to_string())
    }

    /// Handle one input and produce the reply
    pub fn handle(&mut self, text: &str) -> String {
        let span = self.span.clone();
        let _enter = span.enter();

        match self.respond(text) {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, input = text, "failed to handle input");
                format!("Error: {}", e)
            }
        }
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn current_month(&self) -> String {
        BudgetService::month_key(self.today())
    }

    fn ledger(&self) -> TransactionService<'_> {
        TransactionService::new(self.store.as_ref())
    }

    fn budgets(&self) -> BudgetService<'_> {
        BudgetService::new(self.store.as_ref())
    }

    fn check_first_interaction(&mut self) -> TallyResult<()> {
        if self.onboarding.needs_first_check() {
            let has_budget = !self.budgets().summary(&self.current_month())?.is_empty();
            if has_budget {
                debug!("budget exists for this month; skipping guided setup");
            }
            self.onboarding.first_interaction(has_budget);
        }
        Ok(())
    }

    fn respond(&mut self, text: &str) -> TallyResult<String> {
        self.check_first_interaction()?;

        match self.onboarding.step(text) {
            Step::Reply(reply) => return Ok(reply),
            Step::Finish(limits) => return self.finish_onboarding(&limits),
            Step::PassThrough => {}
        }

        let Some(intent) = intent::parse(text) else {
            debug!(input = text, "no intent matched");
            return Ok(format::NOT_UNDERSTOOD.to_string());
        };

        debug!(intent = %intent.kind(), "dispatching");
        self.dispatch(intent)
    }

    fn finish_onboarding(&mut self, limits: &[(String, Money)]) -> TallyResult<String> {
        let month = self.current_month();
        self.budgets().set_limits(&month, limits)?;
        self.onboarding.complete();
        info!(month = %month, count = limits.len(), "guided setup complete");

        let saved: Vec<String> = limits
            .iter()
            .map(|(name, limit)| format!("{} {}", name, limit))
            .collect();
        Ok(format!(
            "Setup complete. Budget limits saved for {}: {}. Type 'help' to see commands.",
            month,
            saved.join(", ")
        ))
    }

    fn dispatch(&self, intent: Intent) -> TallyResult<String> {
        match intent {
            Intent::AddExpense {
                amount,
                category,
                description,
                date,
            } => self.add_expense(&amount, &category, description, date.as_deref()),
            Intent::SetBudget { category, limit } => self.set_budget(&category, &limit),
            Intent::ShowBudget { category } => self.show_budget(category.as_deref()),
            Intent::Limits => self.limits(),
            Intent::Export { target, path } => self.export(&target, path),
            Intent::Receipt { body } => self.receipt(&body),
            Intent::Summary { window } => self.summary(window.as_deref()),
            Intent::Help => Ok(format::HELP_TEXT.to_string()),
            Intent::Recent { count } => self.recent(count.as_deref()),
        }
    }

    fn add_expense(
        &self,
        amount: &str,
        category: &str,
        description: Option<String>,
        date: Option<&str>,
    ) -> TallyResult<String> {
        let Ok(amount) = Money::parse(amount) else {
            return Ok(INVALID_AMOUNT.to_string());
        };
        if !amount.is_positive() {
            return Ok(AMOUNT_NOT_POSITIVE.to_string());
        }
        let date = match date {
            Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => date,
                Err(_) => return Ok(INVALID_DATE.to_string()),
            },
            None => self.today(),
        };

        let mut input = CreateTransactionInput::new(amount, category::normalize(category))
            .date(date)
            .meta("source", "chat");
        if let Some(description) = description {
            input = input.description(description);
        }

        let txn = TransactionService::build(input);
        let budgets = self.budgets();
        let month = BudgetService::month_key(txn.date);
        let budget = match budgets.with_applied(&month, std::slice::from_ref(&txn)) {
            Ok(budget) => budget,
            Err(e) if e.is_validation() => {
                debug!(error = %e, "rejected expense");
                return Ok(AMOUNT_TOO_LARGE.to_string());
            }
            Err(e) => return Err(e),
        };
        let txn = self.ledger().record(txn)?;
        budgets.save(&budget)?;

        let remaining = budget
            .category(&txn.category)
            .map(|cat| friendly_remaining(&CategorySummary::from(cat)))
            .unwrap_or_else(|| "n/a".to_string());

        Ok(format!(
            "Added {} to {}. Remaining: {}.",
            txn.amount, txn.category, remaining
        ))
    }

    fn set_budget(&self, category: &str, limit: &str) -> TallyResult<String> {
        let Ok(limit) = Money::parse(limit) else {
            return Ok(INVALID_LIMIT.to_string());
        };
        if limit.is_negative() {
            return Ok(NEGATIVE_LIMIT.to_string());
        }

        let name = category::normalize(category);
        self.budgets()
            .set_limits(&self.current_month(), &[(name.clone(), limit)])?;
        Ok(format!("Set {} limit to {}.", name, limit))
    }

    fn show_budget(&self, category: Option<&str>) -> TallyResult<String> {
        let rows = self.budgets().summary(&self.current_month())?;
        if rows.is_empty() {
            return Ok(NO_BUDGET.to_string());
        }

        let Some(requested) = category else {
            return Ok(budget_listing(&rows));
        };
        let name = category::normalize(requested);
        Ok(rows
            .iter()
            .find(|row| category::same_category(&row.category, &name))
            .map(budget_line)
            .unwrap_or_else(|| format!("No data for {}.", name)))
    }

    fn limits(&self) -> TallyResult<String> {
        let limits = self.budgets().list_limits(&self.current_month())?;
        if limits.is_empty() {
            return Ok(NO_LIMITS.to_string());
        }
        Ok(limits_listing(&limits))
    }

    fn export(&self, target: &str, path: Option<String>) -> TallyResult<String> {
        if !target.eq_ignore_ascii_case("csv") {
            return Ok(UNSUPPORTED_EXPORT.to_string());
        }

        let path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| self.export_path.clone());
        let count = self.ledger().export_csv(&path)?;
        Ok(format!(
            "Exported {} transactions to {}.",
            count,
            path.display()
        ))
    }

    fn receipt(&self, body: &str) -> TallyResult<String> {
        let body = body.trim();
        if body.is_empty() {
            return Ok(EMPTY_RECEIPT.to_string());
        }

        let result = self.receipts.parse(body);
        let drafts = self.receipts.to_transactions(&result, self.today());
        let month = self.current_month();
        let ledger = self.ledger();
        let budgets = self.budgets();

        let budget = match budgets.with_applied(&month, &drafts) {
            Ok(budget) => budget,
            Err(e) if e.is_validation() => {
                debug!(error = %e, "rejected receipt");
                return Ok(AMOUNT_TOO_LARGE.to_string());
            }
            Err(e) => return Err(e),
        };

        let mut recorded = Vec::with_capacity(drafts.len());
        for draft in drafts.iter().cloned() {
            match ledger.record(draft) {
                Ok(txn) => recorded.push(txn),
                Err(e) => {
                    // Budget must match whatever reached the ledger
                    if !recorded.is_empty() {
                        budgets.save(&budgets.with_applied(&month, &recorded)?)?;
                    }
                    return Err(TallyError::Storage(format!(
                        "recorded {} of {} receipt lines before failing: {}",
                        recorded.len(),
                        drafts.len(),
                        e
                    )));
                }
            }
        }
        if !recorded.is_empty() {
            budgets.save(&budget)?;
        }

        let mut reply = format!("Parsed {} lines.", drafts.len());
        if let Some(total) = result.total_detected {
            reply.push_str(&format!(" Detected total {}.", total));
        }
        if result.has_warnings() {
            reply.push_str(&format!(" Warnings: {}", result.warnings.len()));
        }
        Ok(reply)
    }

    fn summary(&self, window: Option<&str>) -> TallyResult<String> {
        let days = match window {
            Some(token) => match token
                .strip_suffix(['d', 'D'])
                .and_then(|n| n.parse::<u32>().ok())
            {
                Some(days) => days,
                None => return Ok(INVALID_WINDOW.to_string()),
            },
            None => self.settings.summary_window_days,
        };

        match self.ledger().window_summary(days, self.today()) {
            Ok(summary) => Ok(format!(
                "Last {}d: {} across {} transactions.",
                summary.days, summary.total, summary.count
            )),
            Err(e) if e.is_validation() => Ok(INVALID_WINDOW.to_string()),
            Err(e) => Err(e),
        }
    }

    fn recent(&self, count: Option<&str>) -> TallyResult<String> {
        let count = match count {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Ok(INVALID_COUNT.to_string()),
            },
            None => self.settings.recent_count,
        };
        Ok(recent_table(&self.ledger().recent(count)?))
    }
}
