//! Static currency code → symbol table

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "INR")]
    Inr,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "GBP")]
    Gbp,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Usd, Currency::Inr, Currency::Eur, Currency::Gbp];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Inr => "INR",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Inr => "₹",
            Currency::Eur => "€",
            Currency::Gbp => "£",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Currency::Usd => "US Dollar",
            Currency::Inr => "Indian Rupee",
            Currency::Eur => "Euro",
            Currency::Gbp => "British Pound",
        }
    }

    pub fn from_code(code: &str) -> Option<Currency> {
        let code = code.trim();
        Currency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code))
    }
}

/// Symbol for a stored currency code; unknown codes display as dollars
pub fn symbol_for_code(code: &str) -> &'static str {
    Currency::from_code(code).unwrap_or(Currency::Usd).symbol()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_symbols() {
        assert_eq!(symbol_for_code("INR"), "₹");
        assert_eq!(symbol_for_code("eur"), "€");
        assert_eq!(symbol_for_code("GBP"), "£");
        assert_eq!(symbol_for_code("USD"), "$");
    }

    #[test]
    fn test_unknown_code_falls_back_to_dollar() {
        assert_eq!(symbol_for_code("JPY"), "$");
        assert_eq!(symbol_for_code(""), "$");
        assert!(Currency::from_code("JPY").is_none());
    }
}
