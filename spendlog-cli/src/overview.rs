use chrono::{DateTime, Datelike, Timelike, Utc};
use spendlog_core::{symbol_for_code, Settings, TransactionRecord};
use spendlog_finance::insights::{
    category_breakdown, daily_totals, days_in_month, greeting, ForecastStatus, Insight,
};
use spendlog_finance::{detect_subscriptions, forecast, smart_insight, MonthSummary};
use std::fmt::Write;

use crate::commands::format_money;

/// How far into (year, month) we are as of `now`: the current day for the
/// current month, the whole month for past months, zero for future ones.
pub fn elapsed_days(year: i32, month: u32, now: DateTime<Utc>) -> u32 {
    let days = days_in_month(year, month).unwrap_or(0);
    match (year, month).cmp(&(now.year(), now.month())) {
        std::cmp::Ordering::Equal => now.day(),
        std::cmp::Ordering::Less => days,
        std::cmp::Ordering::Greater => 0,
    }
}

/// The dashboard as plain text
pub fn render_overview(
    txns: &[TransactionRecord],
    settings: &Settings,
    year: i32,
    month: u32,
    now: DateTime<Utc>,
) -> String {
    let sym = symbol_for_code(&settings.currency);
    let money = |v: f64| format_money(sym, v);
    let mut out = String::new();

    let summary = MonthSummary::compute(txns, settings);
    let days = days_in_month(year, month).unwrap_or(0);
    let elapsed = elapsed_days(year, month, now);

    let _ = writeln!(out, "{}! Overview for {year}-{month:02}", greeting(now.hour()));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Spent {} of {} budget ({:.0}%) across {} transactions",
        money(summary.total_spent),
        money(summary.budget),
        summary.budget_progress_pct,
        summary.transaction_count
    );
    let _ = writeln!(
        out,
        "Income {}  Balance {} ({})",
        money(summary.income),
        money(summary.balance),
        if summary.is_surplus() { "surplus" } else { "deficit" }
    );

    let f = forecast(summary.total_spent, summary.budget, elapsed, days);
    let _ = writeln!(
        out,
        "Forecast: {} per day, {} by month end{}, projected savings {}",
        money(f.daily_average),
        money(f.predicted_total),
        match f.status {
            ForecastStatus::Danger => " (over budget)",
            ForecastStatus::Safe => "",
        },
        money(summary.income - f.predicted_total)
    );

    match smart_insight(txns, summary.budget, elapsed) {
        Some(Insight::HighSpending {
            category,
            amount,
            share_pct,
        }) => {
            let _ = writeln!(
                out,
                "Heads up: over 80% of your budget is gone. {category} is {} ({share_pct:.0}% of spending).",
                money(amount)
            );
        }
        Some(Insight::OnTrack {
            spent_pct,
            projected_saving,
        }) => {
            let _ = writeln!(
                out,
                "On track: only {spent_pct:.0}% of the budget used, about {} left to save.",
                money(projected_saving)
            );
        }
        None => {}
    }

    let breakdown = category_breakdown(txns);
    if !breakdown.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "By category:");
        for (cat, amount) in &breakdown {
            let _ = writeln!(out, "  {cat:<14} {}", money(*amount));
        }
    }

    let heavy: Vec<String> = daily_totals(txns, days)
        .into_iter()
        .filter(|d| d.is_heavy())
        .map(|d| format!("{} ({})", d.day, money(d.amount)))
        .collect();
    if !heavy.is_empty() {
        let _ = writeln!(out, "Heavy days: {}", heavy.join(", "));
    }

    let subs = detect_subscriptions(txns);
    if !subs.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Subscriptions ({} / month):", money(subs.monthly_total));
        for s in &subs.subscriptions {
            let _ = writeln!(out, "  {:<23} {}", s.description, money(s.amount));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use spendlog_core::Category;

    fn txn(day: u32, desc: &str, amount: f64, cat: Option<Category>) -> TransactionRecord {
        let date = Utc.with_ymd_and_hms(2026, 5, day, 12, 0, 0).unwrap();
        TransactionRecord::new(format!("tx-{day}"), date, desc, amount, cat)
    }

    #[test]
    fn test_elapsed_days() {
        let now = Utc.with_ymd_and_hms(2026, 5, 20, 9, 0, 0).unwrap();
        assert_eq!(elapsed_days(2026, 5, now), 20);
        assert_eq!(elapsed_days(2026, 4, now), 30);
        assert_eq!(elapsed_days(2025, 12, now), 31);
        assert_eq!(elapsed_days(2026, 6, now), 0);
    }

    #[test]
    fn test_render_overview() {
        let now = Utc.with_ymd_and_hms(2026, 5, 20, 9, 0, 0).unwrap();
        let settings = Settings {
            currency: "INR".into(),
            ..Settings::default()
        };
        let txns = vec![
            txn(2, "Netflix", 499.0, Some(Category::Entertainment)),
            txn(3, "Big Basket", 1250.5, Some(Category::Groceries)),
        ];
        let out = render_overview(&txns, &settings, 2026, 5, now);

        assert!(out.starts_with("Good morning! Overview for 2026-05"), "{out}");
        assert!(out.contains("Spent ₹1749.50 of ₹2000.00 budget (87%)"), "{out}");
        assert!(out.contains("Heads up"), "{out}");
        assert!(out.contains("Groceries"), "{out}");
        assert!(out.contains("Heavy days: 2 (₹499.00), 3 (₹1250.50)"), "{out}");
        assert!(out.contains("Subscriptions (₹499.00 / month):"), "{out}");
    }

    #[test]
    fn test_projected_savings_goes_negative() {
        // past month: 3100 over 31 days projects 3100, against 3000 income
        let now = Utc.with_ymd_and_hms(2026, 6, 2, 9, 0, 0).unwrap();
        let settings = Settings {
            income: 3000.0,
            ..Settings::default()
        };
        let txns = vec![txn(10, "Rent", 3100.0, Some(Category::Bills))];
        let out = render_overview(&txns, &settings, 2026, 5, now);
        assert!(
            out.contains("$3100.00 by month end (over budget), projected savings -$100.00"),
            "{out}"
        );
    }

    #[test]
    fn test_render_empty_month() {
        let now = Utc.with_ymd_and_hms(2026, 5, 20, 20, 0, 0).unwrap();
        let out = render_overview(&[], &Settings::default(), 2026, 5, now);
        assert!(out.starts_with("Good evening!"), "{out}");
        assert!(out.contains("Spent $0.00 of $2000.00 budget (0%) across 0 transactions"));
        assert!(out.contains("by month end, projected savings $4500.00"), "{out}");
        assert!(!out.contains("By category"));
        assert!(!out.contains("Subscriptions"));
    }
}
