use anyhow::{Context, Result};
use spendlog_core::{JsonLedger, LedgerStore, Settings};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// `$SPENDLOG_HOME` if set, else `~/.spendlog`
pub fn spendlog_home() -> Result<PathBuf> {
    resolve_home(
        std::env::var("SPENDLOG_HOME").ok(),
        std::env::var("HOME").ok(),
    )
}

fn resolve_home(override_dir: Option<String>, home: Option<String>) -> Result<PathBuf> {
    if let Some(dir) = override_dir.filter(|d| !d.trim().is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = home.context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".spendlog"))
}

pub fn ensure_spendlog_home() -> Result<PathBuf> {
    let dir = spendlog_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn ledger_path() -> Result<PathBuf> {
    Ok(ensure_spendlog_home()?.join("ledger.json"))
}

pub fn chat_dir() -> Result<PathBuf> {
    let dir = ensure_spendlog_home()?.join("chat");
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Open the ledger; a brand new one is seeded with the configured defaults.
pub fn open_ledger(defaults: Settings) -> Result<JsonLedger> {
    let path = ledger_path()?;
    let fresh = !path.exists();
    let mut ledger =
        JsonLedger::open(&path).with_context(|| format!("open ledger {}", path.display()))?;
    if fresh {
        ledger.save_settings(defaults)?;
        ledger.save()?;
        info!(path = %path.display(), "created ledger");
    }
    Ok(ledger)
}
