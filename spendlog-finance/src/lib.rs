//! spendlog-finance: free-text transaction parser, category rules, spending
//! advisor, monthly insights and subscription detection

pub mod advisor;
pub mod category_rules;
pub mod insights;
pub mod keywords;
pub mod sms_parser;
pub mod subscriptions;

pub use advisor::{classify, respond, AdviceQuery, Advisor, Intent, RECENT_LIMIT};
pub use category_rules::categorize;
pub use insights::{forecast, smart_insight, Forecast, ForecastStatus, Insight, MonthSummary};
pub use sms_parser::parse_transaction;
pub use subscriptions::{detect_subscriptions, recurring_charges, SubscriptionReport};
