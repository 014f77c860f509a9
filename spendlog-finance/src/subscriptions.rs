//! Recurring subscription detection from transaction descriptions.

use spendlog_core::TransactionRecord;
use std::collections::HashMap;

use crate::keywords::{RECURRING_CHARGE_KEYWORDS, SUBSCRIPTION_KEYWORDS};

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionReport {
    /// Matching charges; ordering depends on which detector built the report
    pub subscriptions: Vec<TransactionRecord>,
    pub monthly_total: f64,
}

impl SubscriptionReport {
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

pub fn is_subscription(description: &str) -> bool {
    let desc = description.to_lowercase();
    SUBSCRIPTION_KEYWORDS.iter().any(|kw| desc.contains(kw))
}

/// Keep the most recent charge for each (case-insensitive) description that
/// mentions a known subscription service.
pub fn detect_subscriptions(txns: &[TransactionRecord]) -> SubscriptionReport {
    let mut latest: HashMap<String, &TransactionRecord> = HashMap::new();

    for t in txns.iter().filter(|t| is_subscription(&t.description)) {
        let key = t.description.to_lowercase();
        match latest.get(&key) {
            Some(existing) if existing.date >= t.date => {}
            _ => {
                latest.insert(key, t);
            }
        }
    }

    let mut subscriptions: Vec<TransactionRecord> = latest.into_values().cloned().collect();
    subscriptions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.description.cmp(&b.description)));
    let monthly_total = subscriptions.iter().map(|t| t.amount).sum();

    SubscriptionReport {
        subscriptions,
        monthly_total,
    }
}

pub fn is_recurring_charge(description: &str) -> bool {
    let desc = description.to_lowercase();
    RECURRING_CHARGE_KEYWORDS.iter().any(|kw| desc.contains(kw))
}

/// Every recurring charge in `txns`, in the order given and without
/// de-duplication, plus their sum.
pub fn recurring_charges(txns: &[TransactionRecord]) -> SubscriptionReport {
    let subscriptions: Vec<TransactionRecord> = txns
        .iter()
        .filter(|t| is_recurring_charge(&t.description))
        .cloned()
        .collect();
    let monthly_total = subscriptions.iter().map(|t| t.amount).sum();
    SubscriptionReport {
        subscriptions,
        monthly_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn txn(month: u32, desc: &str, amount: f64) -> TransactionRecord {
        let date = Utc.with_ymd_and_hms(2026, month, 3, 9, 0, 0).unwrap();
        TransactionRecord::new(format!("tx-{month}-{desc}"), date, desc, amount, None)
    }

    #[test]
    fn test_keywords() {
        assert!(is_subscription("NETFLIX.COM"));
        assert!(is_subscription("Apple Icloud"));
        assert!(is_subscription("Gold's Gym"));
        assert!(!is_subscription("Starbucks"));
    }

    #[test]
    fn test_dedupes_keeping_latest() {
        let txns = vec![
            txn(1, "Netflix", 15.49),
            txn(3, "netflix", 17.99),
            txn(2, "Spotify", 10.99),
            txn(2, "Coffee", 4.0),
        ];
        let report = detect_subscriptions(&txns);
        assert_eq!(report.subscriptions.len(), 2);
        assert_eq!(report.subscriptions[0].description, "netflix");
        assert_eq!(report.subscriptions[0].amount, 17.99);
        assert_eq!(report.subscriptions[1].description, "Spotify");
        assert!((report.monthly_total - 28.98).abs() < 1e-9);
    }

    #[test]
    fn test_recurring_charges_keep_every_charge() {
        let txns = vec![
            txn(3, "netflix", 17.99),
            txn(2, "Google Cloud", 5.0),
            txn(1, "Netflix", 15.49),
            txn(1, "Disney Plus", 8.0),
            txn(1, "Coffee", 4.0),
        ];
        let report = recurring_charges(&txns);
        let names: Vec<_> = report.subscriptions.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, vec!["netflix", "Google Cloud", "Netflix"]);
        assert!((report.monthly_total - 38.48).abs() < 1e-9);

        // the dashboard card has a different keyword set
        assert!(is_recurring_charge("iCloud storage"));
        assert!(!is_subscription("Google Cloud"));
        assert!(!is_recurring_charge("Disney Plus"));
    }

    #[test]
    fn test_empty_when_nothing_recurring() {
        let report = detect_subscriptions(&[txn(1, "Uber Ride", 20.0)]);
        assert!(report.is_empty());
        assert_eq!(report.monthly_total, 0.0);
    }
}
