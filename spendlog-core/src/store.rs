//! Ledger persistence.
//!
//! Storage is an injected collaborator: the parser and advisor never see it.
//! Callers fetch records through [`LedgerStore`], hand plain values to the
//! finance crate, and write results back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::finance::{Account, AccountKind, Category, SavingsGoal, Settings, TransactionRecord};

/// Persistence operations used by the CLI
pub trait LedgerStore {
    fn insert_transaction(
        &mut self,
        date: DateTime<Utc>,
        description: &str,
        amount: f64,
        category: Option<Category>,
    ) -> Result<TransactionRecord>;

    /// Returns false when no record had that id
    fn delete_transaction(&mut self, id: &str) -> Result<bool>;

    /// Newest first, at most `limit` records
    fn recent_transactions(&self, limit: usize) -> Result<Vec<TransactionRecord>>;

    /// Records with `from <= date < to`, newest first
    fn transactions_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TransactionRecord>>;

    fn settings(&self) -> Result<Settings>;
    fn save_settings(&mut self, settings: Settings) -> Result<()>;

    fn add_account(&mut self, name: &str, balance: f64, kind: AccountKind) -> Result<Account>;
    /// Highest balance first
    fn accounts(&self) -> Result<Vec<Account>>;
    fn delete_account(&mut self, id: &str) -> Result<bool>;

    fn add_goal(&mut self, name: &str, target: f64, emoji: Option<String>) -> Result<SavingsGoal>;
    fn goals(&self) -> Result<Vec<SavingsGoal>>;
    fn deposit_to_goal(&mut self, id: &str, amount: f64) -> Result<SavingsGoal>;
    fn delete_goal(&mut self, id: &str) -> Result<bool>;
}

/// The whole ledger document, serialized as one JSON file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    #[serde(default)]
    pub next_id: u64,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub goals: Vec<SavingsGoal>,
}

impl Ledger {
    fn allocate_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{:04}", prefix, self.next_id)
    }

    fn sorted_newest_first(mut txns: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
        txns.sort_by(|a, b| b.date.cmp(&a.date));
        txns
    }
}

impl LedgerStore for Ledger {
    fn insert_transaction(
        &mut self,
        date: DateTime<Utc>,
        description: &str,
        amount: f64,
        category: Option<Category>,
    ) -> Result<TransactionRecord> {
        let id = self.allocate_id("tx");
        let record = TransactionRecord::new(id, date, description, amount, category);
        self.transactions.push(record.clone());
        Ok(record)
    }

    fn delete_transaction(&mut self, id: &str) -> Result<bool> {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);
        Ok(self.transactions.len() != before)
    }

    fn recent_transactions(&self, limit: usize) -> Result<Vec<TransactionRecord>> {
        let mut txns = Self::sorted_newest_first(self.transactions.clone());
        txns.truncate(limit);
        Ok(txns)
    }

    fn transactions_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TransactionRecord>> {
        let txns = self
            .transactions
            .iter()
            .filter(|t| t.date >= from && t.date < to)
            .cloned()
            .collect();
        Ok(Self::sorted_newest_first(txns))
    }

    fn settings(&self) -> Result<Settings> {
        Ok(self.settings.clone())
    }

    fn save_settings(&mut self, settings: Settings) -> Result<()> {
        self.settings = settings;
        Ok(())
    }

    fn add_account(&mut self, name: &str, balance: f64, kind: AccountKind) -> Result<Account> {
        if name.trim().is_empty() {
            return Err(Error::InvalidData("account name is empty".to_string()));
        }
        let account = Account {
            id: self.allocate_id("acct"),
            name: name.trim().to_string(),
            balance,
            kind,
        };
        self.accounts.push(account.clone());
        Ok(account)
    }

    fn accounts(&self) -> Result<Vec<Account>> {
        let mut accounts = self.accounts.clone();
        accounts.sort_by(|a, b| b.balance.total_cmp(&a.balance));
        Ok(accounts)
    }

    fn delete_account(&mut self, id: &str) -> Result<bool> {
        let before = self.accounts.len();
        self.accounts.retain(|a| a.id != id);
        Ok(self.accounts.len() != before)
    }

    fn add_goal(&mut self, name: &str, target: f64, emoji: Option<String>) -> Result<SavingsGoal> {
        let id = format!("goal-{:04}", self.next_id + 1);
        let goal = SavingsGoal::new(id, name.trim(), target, emoji).ok_or_else(|| {
            Error::InvalidData("a savings goal needs a name and a target above zero".to_string())
        })?;
        self.next_id += 1;
        self.goals.push(goal.clone());
        Ok(goal)
    }

    fn goals(&self) -> Result<Vec<SavingsGoal>> {
        Ok(self.goals.clone())
    }

    fn deposit_to_goal(&mut self, id: &str, amount: f64) -> Result<SavingsGoal> {
        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| Error::NotFound(format!("savings goal {id}")))?;
        goal.current += amount;
        Ok(goal.clone())
    }

    fn delete_goal(&mut self, id: &str) -> Result<bool> {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        Ok(self.goals.len() != before)
    }
}

/// A [`Ledger`] backed by a JSON file; every mutation is written through
#[derive(Debug)]
pub struct JsonLedger {
    path: PathBuf,
    ledger: Ledger,
}

impl JsonLedger {
    /// Open the ledger at `path`; a missing file is an empty ledger
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let ledger = if path.exists() {
            let s = fs::read_to_string(&path)?;
            serde_json::from_str(&s)?
        } else {
            debug!(path = %path.display(), "no ledger file yet, starting empty");
            Ledger::default()
        };
        Ok(Self { path, ledger })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Write to a sibling temp file, then rename over the ledger
    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(&self.ledger)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Apply `f` and write the result. Nothing is written when `f` left the
    /// ledger unchanged; on any error the in-memory ledger is rolled back.
    fn mutate<T>(&mut self, f: impl FnOnce(&mut Ledger) -> Result<T>) -> Result<T> {
        let before = self.ledger.clone();
        let out = match f(&mut self.ledger) {
            Ok(out) => out,
            Err(e) => {
                self.ledger = before;
                return Err(e);
            }
        };
        if self.ledger == before {
            debug!("ledger unchanged, skipping write");
            return Ok(out);
        }
        if let Err(e) = self.save() {
            self.ledger = before;
            return Err(e);
        }
        Ok(out)
    }
}

impl LedgerStore for JsonLedger {
    fn insert_transaction(
        &mut self,
        date: DateTime<Utc>,
        description: &str,
        amount: f64,
        category: Option<Category>,
    ) -> Result<TransactionRecord> {
        let record =
            self.mutate(|l| l.insert_transaction(date, description, amount, category))?;
        info!(id = %record.id, amount = record.amount, "recorded transaction");
        Ok(record)
    }

    fn delete_transaction(&mut self, id: &str) -> Result<bool> {
        self.mutate(|l| l.delete_transaction(id))
    }

    fn recent_transactions(&self, limit: usize) -> Result<Vec<TransactionRecord>> {
        self.ledger.recent_transactions(limit)
    }

    fn transactions_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TransactionRecord>> {
        self.ledger.transactions_between(from, to)
    }

    fn settings(&self) -> Result<Settings> {
        self.ledger.settings()
    }

    fn save_settings(&mut self, settings: Settings) -> Result<()> {
        self.mutate(|l| l.save_settings(settings))
    }

    fn add_account(&mut self, name: &str, balance: f64, kind: AccountKind) -> Result<Account> {
        self.mutate(|l| l.add_account(name, balance, kind))
    }

    fn accounts(&self) -> Result<Vec<Account>> {
        self.ledger.accounts()
    }

    fn delete_account(&mut self, id: &str) -> Result<bool> {
        self.mutate(|l| l.delete_account(id))
    }

    fn add_goal(&mut self, name: &str, target: f64, emoji: Option<String>) -> Result<SavingsGoal> {
        self.mutate(|l| l.add_goal(name, target, emoji))
    }

    fn goals(&self) -> Result<Vec<SavingsGoal>> {
        self.ledger.goals()
    }

    fn deposit_to_goal(&mut self, id: &str, amount: f64) -> Result<SavingsGoal> {
        self.mutate(|l| l.deposit_to_goal(id, amount))
    }

    fn delete_goal(&mut self, id: &str) -> Result<bool> {
        self.mutate(|l| l.delete_goal(id))
    }
}
