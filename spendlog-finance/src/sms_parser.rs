//! Free-text transaction parser.
//!
//! Handles both casually typed entries ("Coffee $5") and pasted bank/UPI debit
//! alerts. Single pass, no state, never fails: when nothing useful is found
//! the result carries `amount = 0` and the caller decides not to record it.
//!
//! Expected shapes:
//!   Coffee $5
//!   Rs 1,250.50 Paid at BIG BASKET via UPI
//!   Paid to STARBUCKS COFFEE on 12-05 Ref 1234567 HDFC Bank A/C

use regex::{Match, Regex};
use spendlog_core::ParsedTransaction;
use std::sync::OnceLock;
use tracing::debug;

use crate::category_rules::categorize;
use crate::keywords::{
    BANK_TOKENS, BOILERPLATE_TOKENS, CURRENCY_MARKERS, MERCHANT_INTRODUCERS, MERCHANT_TERMINATORS,
};

/// Descriptions longer than this are cut and get an ellipsis
pub const MAX_DESCRIPTION_CHARS: usize = 20;
const ELLIPSIS: &str = "...";

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let markers = CURRENCY_MARKERS
            .iter()
            .map(|m| regex::escape(m))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"(?:{markers})?\s?\d[\d,]*(?:\.\d{{1,2}})?")).expect("amount regex")
    })
}

fn merchant_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let intro = word_alternation(MERCHANT_INTRODUCERS);
        let stop = word_alternation(MERCHANT_TERMINATORS);
        Regex::new(&format!(r"(?i){intro}\s+([a-z\s]+?)(?:\s+{stop}|$)")).expect("merchant regex")
    })
}

fn boilerplate_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!("(?i){}", word_alternation(BOILERPLATE_TOKENS)))
            .expect("boilerplate regex")
    })
}

fn bank_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!("(?i){}", word_alternation(BANK_TOKENS))).expect("bank regex")
    })
}

fn long_digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d{6,}\b").expect("digit run regex"))
}

fn ws_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("ws regex"))
}

/// Build `(?:\bpaid\s+to\b|\brs\.|...)` from a token table. Word boundaries
/// are only added on sides that end in a word character.
fn word_alternation(tokens: &[&str]) -> String {
    let alts = tokens
        .iter()
        .map(|token| {
            let body = token
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+");
            let starts_word = token.chars().next().is_some_and(is_word_char);
            let ends_word = token.chars().last().is_some_and(is_word_char);
            format!(
                "{}{}{}",
                if starts_word { r"\b" } else { "" },
                body,
                if ends_word { r"\b" } else { "" }
            )
        })
        .collect::<Vec<_>>()
        .join("|");
    format!("(?:{alts})")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Parse raw text into an amount, a tidy merchant label and a category.
pub fn parse_transaction(raw: &str) -> ParsedTransaction {
    let amount_match = amount_re().find(raw);
    let amount = amount_match.map(parse_amount).unwrap_or(0.0);

    let description = match merchant_phrase(raw) {
        Some(phrase) => {
            debug!(phrase, "merchant phrase matched");
            phrase.to_string()
        }
        None => {
            let cleaned = strip_noise(raw, amount_match);
            debug!(cleaned = %cleaned, "no merchant phrase, using cleaned input");
            cleaned
        }
    };

    let description = tidy_description(&description);
    let category = categorize(&description);

    ParsedTransaction {
        amount,
        description,
        category,
    }
}

/// Strip everything but digits and the decimal point, then parse.
fn parse_amount(m: Match<'_>) -> f64 {
    let digits: String = m
        .as_str()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().unwrap_or(0.0)
}

/// "Paid to STARBUCKS COFFEE on ..." → "STARBUCKS COFFEE".
/// Only letters and spaces are captured, so "7-ELEVEN" never matches here.
fn merchant_phrase(raw: &str) -> Option<&str> {
    merchant_re()
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

/// Fallback: remove the amount, notification boilerplate, reference numbers
/// and bank names from the full input.
fn strip_noise(raw: &str, amount_match: Option<Match<'_>>) -> String {
    let mut text = raw.to_string();
    if let Some(m) = amount_match {
        text.replace_range(m.range(), " ");
    }
    let text = boilerplate_re().replace_all(&text, " ");
    let text = long_digits_re().replace_all(&text, " ");
    let text = bank_re().replace_all(&text, " ");
    text.into_owned()
}

/// Collapse whitespace, cap the length and title-case anything longer than
/// two characters.
fn tidy_description(text: &str) -> String {
    let mut desc = ws_re().replace_all(text.trim(), " ").into_owned();

    if desc.chars().count() > MAX_DESCRIPTION_CHARS {
        desc = desc.chars().take(MAX_DESCRIPTION_CHARS).collect();
        desc.push_str(ELLIPSIS);
    }

    if desc.chars().count() > 2 {
        desc = desc.split(' ').map(title_word).collect::<Vec<_>>().join(" ");
    }

    desc
}

fn title_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendlog_core::Category;

    #[test]
    fn test_typed_entry() {
        let p = parse_transaction("Coffee $5");
        assert_eq!(p.amount, 5.0);
        assert_eq!(p.description, "Coffee");
        assert_eq!(p.category, Category::FoodAndDrink);
        assert!(p.is_recordable());
    }

    #[test]
    fn test_bank_alert_merchant_phrase() {
        let p = parse_transaction("Paid to STARBUCKS COFFEE on 12-05 Ref 1234567 HDFC Bank A/C");
        assert_eq!(p.description, "Starbucks Coffee");
        assert_eq!(p.category, Category::FoodAndDrink);
        // first number in the alert is the date fragment
        assert_eq!(p.amount, 12.0);
    }

    #[test]
    fn test_debit_alert_fallback_strips_noise() {
        let p = parse_transaction("Debited from A/C for UBER RIDE Ref 98765432 ICICI");
        assert!(p.description.contains("Uber Ride"), "got {:?}", p.description);
        assert_eq!(p.category, Category::Transport);
    }

    #[test]
    fn test_currency_marker_and_thousands() {
        let p = parse_transaction("Rs 1,250.50 Paid at BIG BASKET via UPI");
        assert_eq!(p.amount, 1250.5);
        assert_eq!(p.description, "Big Basket");
        assert_eq!(p.category, Category::Groceries);

        let p = parse_transaction("Spent $1,234.56 at Target");
        assert_eq!(p.amount, 1234.56);
        assert_eq!(p.description, "Target");
        assert_eq!(p.category, Category::Groceries);
    }

    #[test]
    fn test_rupee_sign_and_inr() {
        assert_eq!(parse_transaction("₹ 320 lunch").amount, 320.0);

        let p = parse_transaction("INR 499 debited for NETFLIX");
        assert_eq!(p.amount, 499.0);
        assert_eq!(p.description, "Debited Netflix");
        assert_eq!(p.category, Category::Entertainment);
    }

    #[test]
    fn test_at_most_two_decimals_kept() {
        assert_eq!(parse_transaction("Lunch 12.345").amount, 12.34);
        assert_eq!(parse_transaction("Pizza 8.5").amount, 8.5);
    }

    #[test]
    fn test_no_number_means_zero_amount() {
        let p = parse_transaction("hello");
        assert_eq!(p.amount, 0.0);
        assert_eq!(p.description, "Hello");
        assert_eq!(p.category, Category::Uncategorized);
        assert!(!p.is_recordable());

        // a lone comma is not an amount
        assert_eq!(parse_transaction("well, then").amount, 0.0);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_transaction(""), ParsedTransaction::empty());
        assert_eq!(parse_transaction("   "), ParsedTransaction::empty());
    }

    #[test]
    fn test_amount_only_is_not_recordable() {
        let p = parse_transaction("$40");
        assert_eq!(p.amount, 40.0);
        assert_eq!(p.description, "");
        assert!(!p.is_recordable());
    }

    #[test]
    fn test_long_descriptions_truncated() {
        let p = parse_transaction("Paid to THE GREAT INDIAN COFFEE HOUSE on 01-02");
        assert_eq!(p.description, "The Great Indian Cof...");
        assert_eq!(p.description.chars().count(), MAX_DESCRIPTION_CHARS + ELLIPSIS.len());

        let inputs = [
            "Debited from A/C for SOMETHING VERY VERY LONG INDEED Ref 123456789",
            "a really long typed note about groceries and snacks 45",
        ];
        for input in inputs {
            let p = parse_transaction(input);
            assert!(
                p.description.chars().count() <= MAX_DESCRIPTION_CHARS + ELLIPSIS.len(),
                "{input:?} -> {:?}",
                p.description
            );
        }
    }

    #[test]
    fn test_short_descriptions_keep_case() {
        let p = parse_transaction("tv 40");
        assert_eq!(p.description, "tv");
        assert_eq!(p.amount, 40.0);
    }

    #[test]
    fn test_numeric_merchant_falls_back() {
        let p = parse_transaction("Paid to 7-ELEVEN on 3/4");
        assert_eq!(p.amount, 7.0);
        assert_eq!(p.description, "-eleven 3/4");
        assert_eq!(p.category, Category::Uncategorized);
    }

    #[test]
    fn test_boilerplate_only_removed_as_whole_words() {
        let p = parse_transaction("Donuts at Tim Hortons $6");
        assert_eq!(p.amount, 6.0);
        // "at Tim Hortons" is followed by the amount, so the phrase strategy misses
        assert_eq!(p.description, "Donuts Tim Hortons");
    }

    #[test]
    fn test_delivery_override_from_alert() {
        let p = parse_transaction("Sent Rs 450 To ZOMATO via UPI");
        assert_eq!(p.amount, 450.0);
        assert_eq!(p.description, "Zomato");
        assert_eq!(p.category, Category::FoodAndDrink);
    }

    #[test]
    fn test_idempotent() {
        let input = "Paid to STARBUCKS COFFEE on 12-05 Ref 1234567 HDFC Bank A/C";
        assert_eq!(parse_transaction(input), parse_transaction(input));
    }

    #[test]
    fn test_serializes_category_label() {
        let json = serde_json::to_value(parse_transaction("Coffee $5")).unwrap();
        assert_eq!(json["category"], "Food & Drink");
        assert_eq!(json["description"], "Coffee");
    }

    #[test]
    fn test_word_alternation_boundaries() {
        assert_eq!(word_alternation(&["Rs.", "A/C"]), r"(?:\bRs\.|\bA/C\b)");
        assert_eq!(word_alternation(&["Paid to"]), r"(?:\bPaid\s+to\b)");
    }
}
