//! Category name normalization
//!
//! Categories are plain names rather than entities. They are stored
//! title-cased and compared case-insensitively.

/// Category used when a transaction is recorded without one
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Title-case a category name: the first letter of every alphabetic run is
/// upper-cased, everything else lower-cased ("dining_out" -> "Dining_Out").
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_alpha = false;
    for c in name.trim().chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Normalize a raw category for storage, falling back to [`UNCATEGORIZED`]
pub fn normalize(name: &str) -> String {
    let titled = title_case(name);
    if titled.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        titled
    }
}

/// Case-insensitive category comparison
pub fn same_category(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
