//! Command bodies, written against [`LedgerStore`] so they can be exercised
//! with an in-memory [`spendlog_core::Ledger`].

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, Utc};
use spendlog_core::{
    net_worth, Account, AccountKind, Currency, LedgerStore, ParsedTransaction, SavingsGoal,
    Settings, TransactionRecord,
};
use spendlog_finance::insights::month_range;
use spendlog_finance::{parse_transaction, recurring_charges, respond, AdviceQuery};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Recorded(TransactionRecord),
    /// Parser found nothing worth recording
    Skipped(ParsedTransaction),
}

/// Parse free text and persist it when the parser says it is recordable
pub fn add_entry(
    store: &mut impl LedgerStore,
    text: &str,
    now: DateTime<Utc>,
) -> Result<AddOutcome> {
    let parsed = parse_transaction(text);
    if !parsed.is_recordable() {
        warn!(
            amount = parsed.amount,
            description = %parsed.description,
            "nothing to record"
        );
        return Ok(AddOutcome::Skipped(parsed));
    }
    let rec = store
        .insert_transaction(now, &parsed.description, parsed.amount, Some(parsed.category))
        .context("insert transaction")?;
    Ok(AddOutcome::Recorded(rec))
}

/// Manual entry without parsing or categorizing. Blank text or a
/// non-positive amount is ignored.
pub fn record_manual(
    store: &mut impl LedgerStore,
    text: &str,
    amount: f64,
    now: DateTime<Utc>,
) -> Result<Option<TransactionRecord>> {
    let text = text.trim();
    if text.is_empty() || !(amount > 0.0) {
        warn!(text, amount, "manual entry ignored");
        return Ok(None);
    }
    let rec = store
        .insert_transaction(now, text, amount, None)
        .context("insert transaction")?;
    Ok(Some(rec))
}

/// Pick the month to show; either part defaults to the current one
pub fn resolve_month(month: Option<u32>, year: Option<i32>, now: DateTime<Utc>) -> Result<(i32, u32)> {
    let month = month.unwrap_or_else(|| now.month());
    let year = year.unwrap_or_else(|| now.year());
    if !(1..=12).contains(&month) {
        bail!("month must be between 1 and 12 (got {month})");
    }
    Ok((year, month))
}

pub fn month_transactions(
    store: &impl LedgerStore,
    year: i32,
    month: u32,
) -> Result<Vec<TransactionRecord>> {
    let Some((from, to)) = month_range(year, month) else {
        bail!("invalid month {year}-{month:02}");
    };
    Ok(store.transactions_between(from, to)?)
}

pub fn ask(store: &impl LedgerStore, question: &str, recent_limit: usize) -> Result<String> {
    let recent = store.recent_transactions(recent_limit)?;
    let settings = store.settings()?;
    Ok(respond(&AdviceQuery::new(question, &recent, settings.budget)))
}

pub fn update_settings(
    store: &mut impl LedgerStore,
    budget: Option<f64>,
    income: Option<f64>,
    currency: Option<&str>,
) -> Result<Settings> {
    let mut settings = store.settings()?;
    if let Some(b) = budget {
        if b < 0.0 {
            bail!("budget cannot be negative");
        }
        settings.budget = b;
    }
    if let Some(i) = income {
        if i < 0.0 {
            bail!("income cannot be negative");
        }
        settings.income = i;
    }
    if let Some(code) = currency {
        settings.currency = parse_currency(code)?.code().to_string();
    }
    store.save_settings(settings.clone())?;
    info!(budget = settings.budget, income = settings.income, currency = %settings.currency, "settings updated");
    Ok(settings)
}

pub fn parse_currency(code: &str) -> Result<Currency> {
    match Currency::from_code(code) {
        Some(c) => Ok(c),
        None => {
            let known: Vec<&str> = Currency::ALL.iter().map(|c| c.code()).collect();
            bail!("unknown currency {code:?} (expected one of {})", known.join(", "))
        }
    }
}

pub fn parse_account_kind(kind: &str) -> Result<AccountKind> {
    Ok(match kind.trim().to_ascii_lowercase().as_str() {
        "cash" | "checking" => AccountKind::Cash,
        "investment" => AccountKind::Investment,
        "credit" | "card" => AccountKind::Credit,
        "loan" | "debt" => AccountKind::Loan,
        other => bail!("unknown account kind {other:?} (cash, investment, credit, loan)"),
    })
}

pub fn format_money(symbol: &str, amount: f64) -> String {
    if amount < 0.0 {
        format!("-{symbol}{:.2}", amount.abs())
    } else {
        format!("{symbol}{amount:.2}")
    }
}

pub fn render_transactions(txns: &[TransactionRecord], symbol: &str) -> String {
    if txns.is_empty() {
        return "No transactions.".to_string();
    }
    txns.iter()
        .map(|t| {
            format!(
                "{}  {}  {:<23}  {:<14}  {}",
                t.id,
                t.date.format("%Y-%m-%d"),
                t.description,
                t.category_label(),
                format_money(symbol, t.amount)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// All-time recurring charges, newest first, with their total
pub fn recurring_report(store: &impl LedgerStore) -> Result<String> {
    let all = store.recent_transactions(usize::MAX)?;
    let symbol = spendlog_core::symbol_for_code(&store.settings()?.currency);
    let report = recurring_charges(&all);
    if report.is_empty() {
        return Ok("No recurring charges found.".to_string());
    }
    let mut lines: Vec<String> = report
        .subscriptions
        .iter()
        .map(|t| {
            format!(
                "{}  {:<23}  {}",
                t.date.format("%Y-%m-%d"),
                t.description,
                format_money(symbol, t.amount)
            )
        })
        .collect();
    lines.push(format!(
        "Total: {} across {} charges",
        format_money(symbol, report.monthly_total),
        report.subscriptions.len()
    ));
    Ok(lines.join("\n"))
}

pub fn render_accounts(accounts: &[Account], symbol: &str) -> String {
    let mut lines: Vec<String> = accounts
        .iter()
        .map(|a| {
            format!(
                "{}  {:<20}  {:<16}  {}",
                a.id,
                a.name,
                a.kind.label(),
                format_money(symbol, a.balance)
            )
        })
        .collect();
    lines.push(format!("Net worth: {}", format_money(symbol, net_worth(accounts))));
    lines.join("\n")
}

pub fn render_goals(goals: &[SavingsGoal], symbol: &str) -> String {
    if goals.is_empty() {
        return "No savings jars yet.".to_string();
    }
    goals
        .iter()
        .map(|g| {
            let done = if g.is_complete() { "  done" } else { "" };
            format!(
                "{}  {} {:<18}  {} / {}  ({:.0}%){done}",
                g.id,
                g.emoji,
                g.name,
                format_money(symbol, g.current),
                format_money(symbol, g.target),
                g.progress_pct()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
