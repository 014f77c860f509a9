//! Deterministic category rules for parsed descriptions.
//!
//! General groups are tried in order and the first hit wins; the delivery-app
//! overrides are then applied unconditionally.

use spendlog_core::Category;

use crate::keywords::{CATEGORY_KEYWORDS, DELIVERY_OVERRIDES};

/// Categorize a description by keyword membership (substring match on the
/// lower-cased text).
pub fn categorize(description: &str) -> Category {
    let desc = description.to_lowercase();

    let mut category = CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| contains_any(&desc, keywords))
        .map(|(cat, _)| *cat)
        .unwrap_or(Category::Uncategorized);

    for (cat, keywords) in DELIVERY_OVERRIDES {
        if contains_any(&desc, keywords) {
            category = *cat;
        }
    }

    category
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| haystack.contains(kw))
}
