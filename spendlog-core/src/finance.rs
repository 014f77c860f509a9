//! Finance record types for tracking transactions, accounts and savings jars

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A recorded spend, as persisted by the ledger
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    /// Unique identifier for this record
    pub id: String,
    /// When the spend was recorded
    pub date: DateTime<Utc>,
    /// Human-readable merchant/description
    pub description: String,
    /// Amount spent (always positive for recorded spends)
    pub amount: f64,
    /// Category label; manual or imported records may have none
    pub category: Option<String>,
}

impl TransactionRecord {
    /// Create a new TransactionRecord
    pub fn new(
        id: impl Into<String>,
        date: DateTime<Utc>,
        description: impl Into<String>,
        amount: f64,
        category: Option<Category>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            description: description.into(),
            amount,
            category: category.map(|c| c.as_str().to_string()),
        }
    }

    /// Category label, treating a missing category as Uncategorized
    pub fn category_label(&self) -> &str {
        self.category
            .as_deref()
            .unwrap_or(Category::Uncategorized.as_str())
    }
}

/// Spending categories assigned by keyword rules
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "Food & Drink")]
    FoodAndDrink,
    #[serde(rename = "Transport")]
    Transport,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Groceries")]
    Groceries,
    #[serde(rename = "Health")]
    Health,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Bills")]
    Bills,
    #[serde(rename = "Uncategorized")]
    Uncategorized,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::FoodAndDrink,
        Category::Transport,
        Category::Entertainment,
        Category::Groceries,
        Category::Health,
        Category::Shopping,
        Category::Bills,
        Category::Uncategorized,
    ];

    /// Display label, also the persisted form
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FoodAndDrink => "Food & Drink",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Groceries => "Groceries",
            Category::Health => "Health",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Uncategorized => "Uncategorized",
        }
    }

    /// Look up a category by its label (case-insensitive)
    pub fn from_label(label: &str) -> Option<Category> {
        let label = label.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the free-text transaction parser
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedTransaction {
    /// Extracted amount; 0 when no number was found
    pub amount: f64,
    /// Cleaned merchant label, possibly empty
    pub description: String,
    pub category: Category,
}

impl ParsedTransaction {
    /// Sentinel for "nothing extracted"
    pub fn empty() -> Self {
        Self {
            amount: 0.0,
            description: String::new(),
            category: Category::Uncategorized,
        }
    }

    /// Whether the caller should persist this result.
    /// Zero amounts and empty descriptions are treated as "nothing to record".
    pub fn is_recordable(&self) -> bool {
        self.amount > 0.0 && !self.description.is_empty()
    }
}

/// Per-user budget settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Monthly budget limit
    pub budget: f64,
    /// Monthly income
    pub income: f64,
    /// ISO currency code (USD, INR, EUR, GBP)
    pub currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            budget: 2000.0,
            income: 4500.0,
            currency: "USD".to_string(),
        }
    }
}

/// Kind of account as chosen when adding it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccountKind {
    Cash,
    Investment,
    Credit,
    Loan,
}

/// Which side of the balance sheet an account sits on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccountSide {
    Asset,
    Liability,
}

impl AccountKind {
    pub fn side(&self) -> AccountSide {
        match self {
            AccountKind::Cash | AccountKind::Investment => AccountSide::Asset,
            AccountKind::Credit | AccountKind::Loan => AccountSide::Liability,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::Cash => "Cash / Checking",
            AccountKind::Investment => "Investment",
            AccountKind::Credit => "Credit Card",
            AccountKind::Loan => "Loan / Debt",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub balance: f64,
    pub kind: AccountKind,
}

impl Account {
    pub fn side(&self) -> AccountSide {
        self.kind.side()
    }
}

/// Sum of asset balances minus sum of liability balances
pub fn net_worth(accounts: &[Account]) -> f64 {
    accounts
        .iter()
        .map(|a| match a.side() {
            AccountSide::Asset => a.balance,
            AccountSide::Liability => -a.balance,
        })
        .sum()
}

/// A savings jar with a target amount
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsGoal {
    pub id: String,
    pub name: String,
    pub target: f64,
    pub current: f64,
    pub emoji: String,
}

pub const DEFAULT_GOAL_EMOJI: &str = "💰";

impl SavingsGoal {
    /// Returns None unless the name is non-empty and the target is positive
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        target: f64,
        emoji: Option<String>,
    ) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() || !(target > 0.0) {
            return None;
        }
        Some(Self {
            id: id.into(),
            name,
            target,
            current: 0.0,
            emoji: emoji
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GOAL_EMOJI.to_string()),
        })
    }

    /// Progress towards the target, capped at 100
    pub fn progress_pct(&self) -> f64 {
        if self.target <= 0.0 {
            return 0.0;
        }
        (self.current / self.target * 100.0).min(100.0)
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.target
    }
}
