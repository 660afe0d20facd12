//! Intent parser
//!
//! Classifies one line (or a multi-line `receipt:` paste) of user text into
//! an [`Intent`]. Rules are tried in a fixed order and the first full match
//! wins. Arguments stay raw strings; coercion happens in the orchestrator.

use std::fmt;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Name of each recognized intent, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    AddExpense,
    SetBudget,
    ShowBudget,
    Limits,
    Export,
    Receipt,
    Summary,
    Help,
    Recent,
}

impl IntentKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::AddExpense => "add_expense",
            Self::SetBudget => "set_budget",
            Self::ShowBudget => "show_budget",
            Self::Limits => "limits",
            Self::Export => "export",
            Self::Receipt => "receipt",
            Self::Summary => "summary",
            Self::Help => "help",
            Self::Recent => "recent",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified command with its raw arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    AddExpense {
        amount: String,
        category: String,
        description: Option<String>,
        date: Option<String>,
    },
    SetBudget {
        category: String,
        limit: String,
    },
    ShowBudget {
        category: Option<String>,
    },
    Limits,
    Export {
        target: String,
        path: Option<String>,
    },
    Receipt {
        body: String,
    },
    Summary {
        window: Option<String>,
    },
    Help,
    Recent {
        count: Option<String>,
    },
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Self::AddExpense { .. } => IntentKind::AddExpense,
            Self::SetBudget { .. } => IntentKind::SetBudget,
            Self::ShowBudget { .. } => IntentKind::ShowBudget,
            Self::Limits => IntentKind::Limits,
            Self::Export { .. } => IntentKind::Export,
            Self::Receipt { .. } => IntentKind::Receipt,
            Self::Summary { .. } => IntentKind::Summary,
            Self::Help => IntentKind::Help,
            Self::Recent { .. } => IntentKind::Recent,
        }
    }
}

/// Leading words that identify a command, used to let users bypass the
/// guided setup
pub const COMMAND_KEYWORDS: &[&str] = &[
    "add", "expense", "set", "budget", "limits", "export", "receipt", "summary", "help",
    "commands", "recent",
];

const RULES: &[(IntentKind, &str)] = &[
    (
        IntentKind::AddExpense,
        r"(?i)^(?:add|expense)\s+(?P<amount>\d+(?:\.\d{1,2})?)\s+(?P<category>\w+)(?:\s+(?P<desc>.*?))??(?:\s+on\s+(?P<date>\d{4}-\d{2}-\d{2}))?$",
    ),
    (
        IntentKind::SetBudget,
        r"(?i)^set\s+(?P<category>\w+)\s+(?P<limit>\S+)$",
    ),
    (
        IntentKind::ShowBudget,
        r"(?i)^budget(?:\s+(?P<category>\w+))?$",
    ),
    (IntentKind::Limits, r"(?i)^limits$"),
    (
        IntentKind::Export,
        r"(?i)^export\s+(?P<target>\w+)(?:\s+(?P<path>\S+))?$",
    ),
    (IntentKind::Receipt, r"(?i)^receipt:(?P<body>[\s\S]+)$"),
    (
        IntentKind::Summary,
        r"(?i)^summary(?:\s+(?P<window>\d+d))?$",
    ),
    (IntentKind::Help, r"(?i)^(?:help|commands)$"),
    (IntentKind::Recent, r"(?i)^recent(?:\s+(?P<count>\d+))?$"),
];

fn rules() -> &'static [(IntentKind, Regex)] {
    static COMPILED: OnceLock<Vec<(IntentKind, Regex)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .map(|(kind, pattern)| (*kind, Regex::new(pattern).expect("intent regex")))
            .collect()
    })
}

fn group(caps: &Captures<'_>, name: &str) -> Option<String> {
    caps.name(name).map(|m| m.as_str().to_string())
}

fn required(caps: &Captures<'_>, name: &str) -> String {
    group(caps, name).unwrap_or_default()
}

fn build(kind: IntentKind, caps: &Captures<'_>) -> Intent {
    match kind {
        IntentKind::AddExpense => Intent::AddExpense {
            amount: required(caps, "amount"),
            category: required(caps, "category"),
            description: group(caps, "desc").filter(|d| !d.trim().is_empty()),
            date: group(caps, "date"),
        },
        IntentKind::SetBudget => Intent::SetBudget {
            category: required(caps, "category"),
            limit: required(caps, "limit"),
        },
        IntentKind::ShowBudget => Intent::ShowBudget {
            category: group(caps, "category"),
        },
        IntentKind::Limits => Intent::Limits,
        IntentKind::Export => Intent::Export {
            target: required(caps, "target"),
            path: group(caps, "path"),
        },
        IntentKind::Receipt => Intent::Receipt {
            body: required(caps, "body"),
        },
        IntentKind::Summary => Intent::Summary {
            window: group(caps, "window"),
        },
        IntentKind::Help => Intent::Help,
        IntentKind::Recent => Intent::Recent {
            count: group(caps, "count"),
        },
    }
}

/// Classify trimmed `text`; `None` when no rule matches
pub fn parse(text: &str) -> Option<Intent> {
    let text = text.trim();
    rules()
        .iter()
        .find_map(|(kind, re)| re.captures(text).map(|caps| build(*kind, &caps)))
}

/// Whether the first word of `text` is a command keyword
pub fn starts_with_command(text: &str) -> bool {
    let first = text
        .trim()
        .split(|c: char| c.is_whitespace() || c == ':')
        .next()
        .unwrap_or_default()
        .to_lowercase();
    COMMAND_KEYWORDS.contains(&first.as_str())
}
