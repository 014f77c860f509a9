//! spendlog-core: record types, currency table and ledger persistence

pub mod currency;
pub mod error;
pub mod finance;
pub mod store;

pub use currency::{symbol_for_code, Currency};
pub use error::{Error, Result};
pub use finance::{
    net_worth, Account, AccountKind, AccountSide, Category, ParsedTransaction, SavingsGoal,
    Settings, TransactionRecord,
};
pub use store::{JsonLedger, Ledger, LedgerStore};
