//! Guided budget setup
//!
//! A short dialogue that runs before normal command handling for a month
//! with no budget: ask how many categories, then collect `<name> <limit>`
//! lines until `done`. The machine only decides replies; persisting the
//! collected limits is left to the caller.

use crate::models::{category, Money};

use super::intent;

pub const WELCOME_BANNER: &str = "Welcome to Tally, your Finance Tracker!
Let's set up this month's budget. How many categories do you want to track (1-10)?
Type 'start' for a guided setup, 'skip' to go straight to commands, or any command to begin.";

pub const SKIPPED: &str = "Onboarding skipped. Type 'help' to see commands.";

const COUNT_PROMPT: &str = "Enter how many categories (1-10) you want to budget.";
const COUNT_RETRY: &str = "Please enter a number 1-10, or 'skip'.";
const LINE_FORMAT: &str = "Format: <name> <limit> (e.g. groceries 300). Type 'done' when finished.";
const NOTHING_ENTERED: &str =
    "No categories entered yet. Add one as '<name> <limit>' or type 'skip'.";

const MAX_CATEGORIES: usize = 10;

/// Where the dialogue is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnboardingState {
    Inactive,
    AwaitingCount,
    Collecting {
        target: usize,
        pending: Vec<(String, Money)>,
    },
}

/// What the caller should do with an input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Not intercepted; handle as a normal command
    PassThrough,
    /// Intercepted; reply with this text
    Reply(String),
    /// `done` with limits ready; persist them, then call
    /// [`Onboarding::complete`]
    Finish(Vec<(String, Money)>),
}

#[derive(Debug, Clone)]
pub struct Onboarding {
    state: OnboardingState,
    first_checked: bool,
}

impl Default for Onboarding {
    fn default() -> Self {
        Self::new()
    }
}

impl Onboarding {
    /// A fresh dialogue waiting for the category count
    pub fn new() -> Self {
        Self {
            state: OnboardingState::AwaitingCount,
            first_checked: false,
        }
    }

    /// A dialogue that never intercepts anything
    pub fn disabled() -> Self {
        Self {
            state: OnboardingState::Inactive,
            first_checked: true,
        }
    }

    pub fn state(&self) -> &OnboardingState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != OnboardingState::Inactive
    }

    /// Whether the first-interaction check is still outstanding
    pub fn needs_first_check(&self) -> bool {
        self.is_active() && !self.first_checked
    }

    /// Record the first-interaction check; an existing budget for the
    /// current month ends the dialogue before it starts
    pub fn first_interaction(&mut self, month_has_budget: bool) {
        self.first_checked = true;
        if month_has_budget {
            self.state = OnboardingState::Inactive;
        }
    }

    /// Mark the collected limits as persisted
    pub fn complete(&mut self) {
        self.state = OnboardingState::Inactive;
    }

    /// Advance the dialogue with one input
    pub fn step(&mut self, text: &str) -> Step {
        let input = text.trim();
        match &mut self.state {
            OnboardingState::Inactive => Step::PassThrough,
            OnboardingState::AwaitingCount => self.awaiting_count(input),
            OnboardingState::Collecting { target, pending } => {
                let target = *target;
                if input.eq_ignore_ascii_case("skip") {
                    self.state = OnboardingState::Inactive;
                    return Step::Reply(SKIPPED.to_string());
                }
                if input.eq_ignore_ascii_case("done") {
                    if pending.is_empty() {
                        return Step::Reply(NOTHING_ENTERED.to_string());
                    }
                    return Step::Finish(pending.clone());
                }
                match parse_limit_line(input) {
                    Some((name, limit)) => {
                        let reply = format!("Added {} ({}).", name, limit);
                        pending.push((name, limit));
                        let entered = pending.len();
                        if entered < target {
                            Step::Reply(format!("{} {}/{} entered.", reply, entered, target))
                        } else {
                            Step::Reply(format!(
                                "{} {}/{} entered. Type 'done' to finish or add more.",
                                reply, entered, target
                            ))
                        }
                    }
                    None => Step::Reply(LINE_FORMAT.to_string()),
                }
            }
        }
    }

    fn awaiting_count(&mut self, input: &str) -> Step {
        if input.is_empty() {
            return Step::Reply(WELCOME_BANNER.to_string());
        }
        if input.eq_ignore_ascii_case("skip") {
            self.state = OnboardingState::Inactive;
            return Step::Reply(SKIPPED.to_string());
        }
        if input.eq_ignore_ascii_case("start") {
            return Step::Reply(COUNT_PROMPT.to_string());
        }
        if intent::starts_with_command(input) {
            self.state = OnboardingState::Inactive;
            return Step::PassThrough;
        }

        match input.parse::<usize>() {
            Ok(target) if (1..=MAX_CATEGORIES).contains(&target) => {
                self.state = OnboardingState::Collecting {
                    target,
                    pending: Vec::new(),
                };
                Step::Reply(format!(
                    "Now enter each category and monthly limit as '<name> <limit>' \
                     (e.g. groceries 300), one per line. 0/{} entered.",
                    target
                ))
            }
            _ => Step::Reply(COUNT_RETRY.to_string()),
        }
    }

    /// Collected (name, limit) pairs so far
    pub fn pending(&self) -> &[(String, Money)] {
        match &self.state {
            OnboardingState::Collecting { pending, .. } => pending,
            _ => &[],
        }
    }
}

/// Parse `<name> <limit>` with a non-negative limit
fn parse_limit_line(input: &str) -> Option<(String, Money)> {
    let mut parts = input.split_whitespace();
    let (name, limit) = match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(limit), None) => (name, limit),
        _ => return None,
    };
    let limit = Money::parse(limit).ok().filter(|l| !l.is_negative())?;
    Some((category::normalize(name), limit))
}
