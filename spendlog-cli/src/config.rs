use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use spendlog_core::Settings;
use spendlog_finance::{Advisor, RECENT_LIMIT};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::state::spendlog_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub advisor: AdvisorSection,
    pub defaults: DefaultsSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorSection {
    /// Pause before each chat reply; 0 answers immediately
    pub delay_ms: u64,
    /// How many of the newest records the advisor sees
    pub recent_limit: usize,
}

/// Settings a brand new ledger starts with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsSection {
    pub budget: f64,
    pub income: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// EnvFilter directive used when RUST_LOG and --verbose are absent
    pub level: String,
}

impl Default for AdvisorSection {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            recent_limit: RECENT_LIMIT,
        }
    }
}

impl Default for DefaultsSection {
    fn default() -> Self {
        let s = Settings::default();
        Self {
            budget: s.budget,
            income: s.income,
            currency: s.currency,
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl AdvisorSection {
    pub fn advisor(&self) -> Advisor {
        Advisor::new(Duration::from_millis(self.delay_ms))
    }
}

impl DefaultsSection {
    pub fn settings(&self) -> Settings {
        Settings {
            budget: self.budget,
            income: self.income,
            currency: self.currency.clone(),
        }
    }
}

/// Resolved without creating the home directory
pub fn config_path() -> Result<PathBuf> {
    Ok(spendlog_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_to(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if init_config_at(&p)? {
        println!("Wrote {}", p.display());
    } else {
        println!("Config already exists: {}", p.display());
    }
    Ok(())
}

/// Write the default config at `p`, creating its directory. Returns false
/// when a config is already there.
pub fn init_config_at(p: &Path) -> Result<bool> {
    if p.exists() {
        return Ok(false);
    }
    if let Some(dir) = p.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    save_config_to(&Config::default(), p)?;
    Ok(true)
}
