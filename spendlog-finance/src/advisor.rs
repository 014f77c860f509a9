//! Canned-response spending advisor.
//!
//! A question is matched against an ordered list of intent matchers (first
//! match wins) and answered from the caller-supplied recent transactions and
//! budget. No memory between calls; the chat transcript belongs to the caller.

use regex::Regex;
use spendlog_core::TransactionRecord;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

use crate::keywords::ADVISOR_TOPICS;

/// How many of the newest transactions callers should hand to the advisor
pub const RECENT_LIMIT: usize = 50;

/// Topic totals above this get a gentle warning
pub const TOPIC_CAUTION_THRESHOLD: f64 = 300.0;

pub const FALLBACK_REPLY: &str =
    "I'm not sure about that specific detail, but I can tell you that you're tracking your finances well!";

pub const SAVING_TIP: &str = "My best advice: Try to follow the 50/30/20 rule. 50% on needs, 30% on wants, and 20% to your savings jars! 🍯";

/// Everything the advisor needs for one answer
#[derive(Debug, Clone, Copy)]
pub struct AdviceQuery<'a> {
    pub question: &'a str,
    /// Newest first, normally capped at [`RECENT_LIMIT`]
    pub recent: &'a [TransactionRecord],
    pub budget_limit: f64,
}

impl<'a> AdviceQuery<'a> {
    pub fn new(question: &'a str, recent: &'a [TransactionRecord], budget_limit: f64) -> Self {
        Self {
            question,
            recent,
            budget_limit,
        }
    }

    fn total_spent(&self) -> f64 {
        self.recent.iter().map(|t| t.amount).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// "how much have I spent on coffee"
    TopicSpend(&'static str),
    Budget,
    Status,
    SavingTip,
}

type Matcher = fn(&str) -> Option<Intent>;

/// Evaluated in order against the lower-cased question
const INTENT_MATCHERS: &[Matcher] = &[
    match_topic_spend,
    match_budget,
    match_status,
    match_saving_tip,
];

fn topic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let topics = ADVISOR_TOPICS
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"spen[dt] on ({topics})")).expect("topic regex")
    })
}

fn match_topic_spend(q: &str) -> Option<Intent> {
    let caps = topic_re().captures(q)?;
    let topic = caps.get(1)?.as_str();
    ADVISOR_TOPICS
        .iter()
        .copied()
        .find(|t| *t == topic)
        .map(Intent::TopicSpend)
}

fn match_budget(q: &str) -> Option<Intent> {
    (q.contains("budget") || q.contains("limit") || q.contains("over")).then_some(Intent::Budget)
}

fn match_status(q: &str) -> Option<Intent> {
    ((q.contains("how") && q.contains("doing")) || q.contains("status")).then_some(Intent::Status)
}

fn match_saving_tip(q: &str) -> Option<Intent> {
    (q.contains("save") || q.contains("advice") || q.contains("help")).then_some(Intent::SavingTip)
}

/// Classify a question; None means the generic fallback reply
pub fn classify(question: &str) -> Option<Intent> {
    let q = question.to_lowercase();
    INTENT_MATCHERS.iter().find_map(|m| m(&q))
}

/// Answer a question. Pure: identical queries give identical replies.
pub fn respond(query: &AdviceQuery<'_>) -> String {
    let intent = classify(query.question);
    debug!(?intent, question = query.question, "advisor intent");

    match intent {
        Some(Intent::TopicSpend(topic)) => topic_reply(query, topic),
        Some(Intent::Budget) => budget_reply(query),
        Some(Intent::Status) => status_reply(query),
        Some(Intent::SavingTip) => SAVING_TIP.to_string(),
        None => FALLBACK_REPLY.to_string(),
    }
}

fn topic_reply(query: &AdviceQuery<'_>, topic: &str) -> String {
    let total: f64 = query
        .recent
        .iter()
        .filter(|t| {
            t.description.to_lowercase().contains(topic)
                || t.category
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(topic))
        })
        .map(|t| t.amount)
        .sum();

    let remark = if total > TOPIC_CAUTION_THRESHOLD {
        "That is quite a bit! 😅 Maybe try to cut back next week?"
    } else {
        "That is a healthy amount. Keep it up! 👍"
    };
    format!("You have spent {} on {topic} recently. {remark}", to_fixed(total, 2))
}

fn budget_reply(query: &AdviceQuery<'_>) -> String {
    let spent = query.total_spent();
    let budget = query.budget_limit;
    let remaining = budget - spent;

    if remaining < 0.0 {
        format!(
            "⚠️ Alert: You are over budget by {}. You have spent {} of your {budget} limit.",
            to_fixed(remaining.abs(), 0),
            to_fixed(spent, 0)
        )
    } else {
        format!(
            "✅ You are safe! You have spent {} of your {budget} limit. You have {} left to spend.",
            to_fixed(spent, 0),
            to_fixed(remaining, 0)
        )
    }
}

fn status_reply(query: &AdviceQuery<'_>) -> String {
    let spent = to_fixed(query.total_spent(), 0);
    match largest_expense(query.recent) {
        Some(top) => format!(
            "You have spent {spent} in total. Your biggest expense recently was {} for {}.",
            top.description, top.amount
        ),
        None => format!("You have spent {spent} in total. You haven't recorded any expenses yet."),
    }
}

/// Fixed-point text with exact halves rounded away from zero ("0.125" → "0.13")
fn to_fixed(value: f64, digits: u32) -> String {
    let scale = 10f64.powi(digits as i32);
    let rounded = (value * scale).round() / scale;
    // no "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.prec$}", prec = digits as usize)
}

/// Largest amount; on ties the earliest in list order. Leaves the slice as is.
fn largest_expense(txns: &[TransactionRecord]) -> Option<&TransactionRecord> {
    txns.iter()
        .reduce(|best, t| if t.amount > best.amount { t } else { best })
}

/// Advisor with the "thinking" pause used by the chat front end
#[derive(Debug, Clone)]
pub struct Advisor {
    delay: Duration,
}

impl Default for Advisor {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

impl Advisor {
    /// A zero delay answers immediately
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn respond(&self, query: &AdviceQuery<'_>) -> String {
        let reply = respond(query);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        reply
    }
}
