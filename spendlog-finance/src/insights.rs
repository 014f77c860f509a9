//! Monthly overview figures: totals, month-end forecast, the smart insight
//! banner, category breakdown and per-day totals.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use spendlog_core::{Settings, TransactionRecord};
use std::collections::HashMap;

/// Spending above this share of the budget triggers the high-spending banner
pub const HIGH_SPENDING_PCT: f64 = 80.0;
/// Below this share after mid-month the user is told they're on track
pub const ON_TRACK_PCT: f64 = 50.0;
pub const MID_MONTH_DAY: u32 = 15;
/// Days above this total are highlighted in the daily view
pub const HEAVY_DAY_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub total_spent: f64,
    pub income: f64,
    pub budget: f64,
    /// income − spent
    pub balance: f64,
    /// Share of budget used, capped at 100
    pub budget_progress_pct: f64,
    pub transaction_count: usize,
}

impl MonthSummary {
    pub fn compute(txns: &[TransactionRecord], settings: &Settings) -> Self {
        let total_spent = total_spent(txns);
        Self {
            total_spent,
            income: settings.income,
            budget: settings.budget,
            balance: settings.income - total_spent,
            budget_progress_pct: spent_pct(total_spent, settings.budget).min(100.0),
            transaction_count: txns.len(),
        }
    }

    pub fn is_surplus(&self) -> bool {
        self.balance > 0.0
    }
}

pub fn total_spent(txns: &[TransactionRecord]) -> f64 {
    txns.iter().map(|t| t.amount).sum()
}

/// Percentage of `budget` already spent. A non-positive budget counts as
/// fully used as soon as anything is spent.
pub fn spent_pct(spent: f64, budget: f64) -> f64 {
    if budget > 0.0 {
        spent * 100.0 / budget
    } else if spent > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForecastStatus {
    Safe,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub daily_average: f64,
    pub predicted_total: f64,
    pub status: ForecastStatus,
}

/// Linear month-end projection from the spend so far
pub fn forecast(total_spent: f64, budget: f64, day_of_month: u32, days_in_month: u32) -> Forecast {
    let daily_average = if day_of_month > 0 {
        total_spent / day_of_month as f64
    } else {
        0.0
    };
    let predicted_total = daily_average * days_in_month as f64;
    let status = if predicted_total > budget {
        ForecastStatus::Danger
    } else {
        ForecastStatus::Safe
    };
    Forecast {
        daily_average,
        predicted_total,
        status,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Insight {
    /// Over 80% of budget used; points at the heaviest category
    HighSpending {
        category: String,
        amount: f64,
        share_pct: f64,
    },
    /// Past mid-month with under half the budget used
    OnTrack { spent_pct: f64, projected_saving: f64 },
}

/// The one banner worth showing for this month, if any
pub fn smart_insight(txns: &[TransactionRecord], budget: f64, day_of_month: u32) -> Option<Insight> {
    if txns.is_empty() {
        return None;
    }

    let spent = total_spent(txns);
    let pct = spent_pct(spent, budget);

    if pct > HIGH_SPENDING_PCT {
        let (category, amount) = category_breakdown(txns).into_iter().next()?;
        let share_pct = if spent > 0.0 { amount / spent * 100.0 } else { 0.0 };
        return Some(Insight::HighSpending {
            category,
            amount,
            share_pct,
        });
    }

    if pct < ON_TRACK_PCT && day_of_month > MID_MONTH_DAY {
        return Some(Insight::OnTrack {
            spent_pct: pct,
            projected_saving: budget - spent,
        });
    }

    None
}

/// Totals per category label, largest first (ties by name)
pub fn category_breakdown(txns: &[TransactionRecord]) -> Vec<(String, f64)> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for t in txns {
        *totals.entry(t.category_label()).or_insert(0.0) += t.amount;
    }

    let mut out: Vec<(String, f64)> = totals
        .into_iter()
        .map(|(cat, amount)| (cat.to_string(), amount))
        .collect();
    out.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub day: u32,
    pub amount: f64,
}

impl DailyTotal {
    pub fn is_heavy(&self) -> bool {
        self.amount > HEAVY_DAY_THRESHOLD
    }
}

/// One entry per day of the month (zeros included), by UTC calendar day
pub fn daily_totals(txns: &[TransactionRecord], days_in_month: u32) -> Vec<DailyTotal> {
    let mut out: Vec<DailyTotal> = (1..=days_in_month)
        .map(|day| DailyTotal { day, amount: 0.0 })
        .collect();
    for t in txns {
        let day = t.date.day();
        if let Some(slot) = out.get_mut(day as usize - 1) {
            slot.amount += t.amount;
        }
    }
    out
}

pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning"
    } else if hour < 18 {
        "Good afternoon"
    } else {
        "Good evening"
    }
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (start, end) = month_bounds_naive(year, month)?;
    u32::try_from((end - start).num_days()).ok()
}

/// Half-open UTC range covering a calendar month
pub fn month_range(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let (start, end) = month_bounds_naive(year, month)?;
    Some((
        Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0)?),
        Utc.from_utc_datetime(&end.and_hms_opt(0, 0, 0)?),
    ))
}

fn month_bounds_naive(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendlog_core::Category;

    fn txn(day: u32, desc: &str, amount: f64, category: Option<Category>) -> TransactionRecord {
        let date = Utc.with_ymd_and_hms(2026, 5, day, 10, 0, 0).unwrap();
        TransactionRecord::new(format!("tx-{day}-{desc}"), date, desc, amount, category)
    }

    #[test]
    fn test_month_summary() {
        let txns = vec![
            txn(1, "Rent", 1500.0, Some(Category::Bills)),
            txn(2, "Groceries", 700.0, Some(Category::Groceries)),
        ];
        let summary = MonthSummary::compute(&txns, &Settings::default());
        assert_eq!(summary.total_spent, 2200.0);
        assert_eq!(summary.balance, 2300.0);
        assert_eq!(summary.budget_progress_pct, 100.0);
        assert!(summary.is_surplus());
    }

    #[test]
    fn test_forecast() {
        let f = forecast(600.0, 2000.0, 10, 31);
        assert_eq!(f.daily_average, 60.0);
        assert_eq!(f.predicted_total, 1860.0);
        assert_eq!(f.status, ForecastStatus::Safe);

        let f = forecast(800.0, 2000.0, 10, 30);
        assert_eq!(f.status, ForecastStatus::Danger);

        assert_eq!(forecast(100.0, 2000.0, 0, 30).predicted_total, 0.0);
    }

    #[test]
    fn test_high_spending_insight() {
        let txns = vec![
            txn(3, "Rent", 1200.0, Some(Category::Bills)),
            txn(4, "Dinner", 300.0, Some(Category::FoodAndDrink)),
            txn(5, "Misc", 200.0, None),
        ];
        let insight = smart_insight(&txns, 2000.0, 5).unwrap();
        match insight {
            Insight::HighSpending {
                category,
                amount,
                share_pct,
            } => {
                assert_eq!(category, "Bills");
                assert_eq!(amount, 1200.0);
                assert!((share_pct - 70.588).abs() < 0.01);
            }
            other => panic!("unexpected insight {other:?}"),
        }
    }

    #[test]
    fn test_on_track_only_after_mid_month() {
        let txns = vec![txn(2, "Coffee", 100.0, Some(Category::FoodAndDrink))];
        assert_eq!(smart_insight(&txns, 2000.0, 10), None);
        assert_eq!(
            smart_insight(&txns, 2000.0, 20),
            Some(Insight::OnTrack {
                spent_pct: 5.0,
                projected_saving: 1900.0
            })
        );
    }

    #[test]
    fn test_no_insight_for_empty_or_middling() {
        assert_eq!(smart_insight(&[], 2000.0, 28), None);
        let txns = vec![txn(2, "Shoes", 1200.0, Some(Category::Shopping))];
        assert_eq!(smart_insight(&txns, 2000.0, 28), None);
    }

    #[test]
    fn test_zero_budget_counts_as_exceeded() {
        let txns = vec![txn(2, "Snack", 5.0, None)];
        assert!(matches!(
            smart_insight(&txns, 0.0, 3),
            Some(Insight::HighSpending { .. })
        ));
        assert_eq!(spent_pct(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_category_breakdown_defaults_missing_category() {
        let txns = vec![
            txn(1, "Coffee", 5.0, Some(Category::FoodAndDrink)),
            txn(1, "Thing", 7.0, None),
            txn(2, "Latte", 4.0, Some(Category::FoodAndDrink)),
        ];
        let breakdown = category_breakdown(&txns);
        assert_eq!(
            breakdown,
            vec![
                ("Food & Drink".to_string(), 9.0),
                ("Uncategorized".to_string(), 7.0)
            ]
        );
    }

    #[test]
    fn test_daily_totals() {
        let txns = vec![
            txn(1, "Coffee", 5.0, None),
            txn(1, "Lunch", 15.0, None),
            txn(31, "Dinner", 120.0, None),
        ];
        let days = daily_totals(&txns, 31);
        assert_eq!(days.len(), 31);
        assert_eq!(days[0].amount, 20.0);
        assert!(!days[0].is_heavy());
        assert_eq!(days[30].amount, 120.0);
        assert!(days[30].is_heavy());

        // records outside a shorter month are ignored
        assert_eq!(daily_totals(&txns, 30).iter().map(|d| d.amount).sum::<f64>(), 20.0);
    }

    #[test]
    fn test_greeting() {
        assert_eq!(greeting(7), "Good morning");
        assert_eq!(greeting(12), "Good afternoon");
        assert_eq!(greeting(18), "Good evening");
    }

    #[test]
    fn test_month_helpers() {
        assert_eq!(days_in_month(2026, 2), Some(28));
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2026, 12), Some(31));
        assert_eq!(days_in_month(2026, 13), None);

        let (from, to) = month_range(2026, 12).unwrap();
        assert_eq!(from, Utc.with_ymd_and_hms(2026, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap());
    }
}
