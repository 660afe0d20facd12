//! Category resolver
//!
//! Maps free text (receipt item descriptions) to a spending category by
//! keyword.

/// Category returned when no rule matches
pub const DEFAULT_CATEGORY: &str = "Other";

const DEFAULT_RULES: &[(&str, &str)] = &[
    ("grocery", "Groceries"),
    ("supermarket", "Groceries"),
    ("fuel", "Transport"),
    ("gas", "Transport"),
    ("uber", "Transport"),
    ("rent", "Housing"),
    ("coffee", "Dining"),
    ("restaurant", "Dining"),
    ("pharmacy", "Health"),
];

/// Ordered keyword rules; the first keyword found in the text wins
#[derive(Debug, Clone)]
pub struct CategoryResolver {
    rules: Vec<(String, String)>,
    default: String,
}

impl Default for CategoryResolver {
    fn default() -> Self {
        Self::with_rules(
            DEFAULT_RULES
                .iter()
                .map(|(kw, cat)| (kw.to_string(), cat.to_string())),
            DEFAULT_CATEGORY,
        )
    }
}

impl CategoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from custom rules. Keywords are lower-cased.
    pub fn with_rules<I>(rules: I, default: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            rules: rules
                .into_iter()
                .map(|(kw, cat)| (kw.to_lowercase(), cat))
                .collect(),
            default: default.into(),
        }
    }

    /// Same rules, different fallback
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    pub fn default_category(&self) -> &str {
        &self.default
    }

    pub fn resolve(&self, text: &str) -> &str {
        let low = text.to_lowercase();
        self.rules
            .iter()
            .find(|(kw, _)| low.contains(kw.as_str()))
            .map_or(self.default.as_str(), |(_, cat)| cat.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let resolver = CategoryResolver::new();
        assert_eq!(resolver.resolve("Coffee"), "Dining");
        assert_eq!(resolver.resolve("SUPERMARKET bag"), "Groceries");
        assert_eq!(resolver.resolve("Uber ride home"), "Transport");
        assert_eq!(resolver.resolve("Pharmacy"), "Health");
        assert_eq!(resolver.resolve("Milk"), "Other");
    }

    #[test]
    fn test_first_rule_wins() {
        // "gas" and "grocery" both appear; grocery is listed first
        let resolver = CategoryResolver::new();
        assert_eq!(resolver.resolve("gas station grocery"), "Groceries");
    }

    #[test]
    fn test_custom_rules_and_default() {
        let resolver = CategoryResolver::with_rules(
            vec![("BOOK".to_string(), "Education".to_string())],
            "Misc",
        );
        assert_eq!(resolver.resolve("Notebook"), "Education");
        assert_eq!(resolver.resolve("Milk"), "Misc");

        let resolver = CategoryResolver::new().with_default("Uncategorized");
        assert_eq!(resolver.default_category(), "Uncategorized");
        assert_eq!(resolver.resolve("Milk"), "Uncategorized");
    }
}
