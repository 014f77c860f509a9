use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use spendlog_core::{JsonLedger, LedgerStore};
use spendlog_finance::{AdviceQuery, Advisor};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::{add_entry, format_money, AddOutcome};

const GREETING: &str = "Hi! I'm your spending advisor. Ask me about your budget, your status, or what you spent on coffee.";

/// Daily transcript under `<home>/chat/YYYY-MM-DD.md`
pub struct ChatLog {
    path: PathBuf,
}

impl ChatLog {
    pub fn open_in(dir: &Path, now: DateTime<Utc>) -> Self {
        let today = now.format("%Y-%m-%d").to_string();
        Self {
            path: dir.join(format!("{today}.md")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, role: &str, msg: &str) -> Result<()> {
        let mut f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        writeln!(
            f,
            "- {} [{}] {}",
            Utc::now().to_rfc3339(),
            role,
            msg.replace('\n', " ")
        )?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Slash {
    Help,
    Status,
    /// Record a free-text entry without leaving the chat
    Add(String),
    Quit,
    Unknown(String),
}

pub fn parse_slash(input: &str) -> Option<Slash> {
    let s = input.trim();
    let rest = s.strip_prefix('/')?;
    let (cmd, arg) = rest.split_once(' ').unwrap_or((rest, ""));
    Some(match cmd {
        "help" => Slash::Help,
        "status" => Slash::Status,
        "add" => Slash::Add(arg.trim().to_string()),
        "quit" | "exit" => Slash::Quit,
        other => Slash::Unknown(other.to_string()),
    })
}

const HELP: &str = "Commands:\n\
- /help\n\
- /status (where the transcript and ledger live)\n\
- /add <text> (record an expense, e.g. /add Coffee $5)\n\
- /quit\n\
Anything else is a question for the advisor.";

pub async fn run_chat(
    ledger: &mut JsonLedger,
    advisor: &Advisor,
    recent_limit: usize,
    log_dir: &Path,
) -> Result<()> {
    let mut log = ChatLog::open_in(log_dir, Utc::now());
    log.append("system", "session_start")?;

    println!("{GREETING}");
    println!("(type /help for commands, /quit to leave)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        log.append("user", input)?;

        let reply = match parse_slash(input) {
            Some(Slash::Quit) => break,
            Some(Slash::Help) => HELP.to_string(),
            Some(Slash::Status) => format!(
                "Transcript: {}\nLedger: {}",
                log.path().display(),
                ledger.path().display()
            ),
            Some(Slash::Add(text)) => match add_entry(ledger, &text, Utc::now())? {
                AddOutcome::Recorded(rec) => {
                    let sym = spendlog_core::symbol_for_code(&ledger.settings()?.currency);
                    format!(
                        "Recorded {} for {} ({}).",
                        rec.description,
                        format_money(sym, rec.amount),
                        rec.category_label()
                    )
                }
                AddOutcome::Skipped(_) => {
                    "I couldn't find an amount and a description in that.".to_string()
                }
            },
            Some(Slash::Unknown(cmd)) => format!("Unknown command /{cmd}. Try /help."),
            None => {
                let recent = ledger.recent_transactions(recent_limit)?;
                let budget = ledger.settings()?.budget;
                println!("advisor is thinking...");
                advisor
                    .respond(&AdviceQuery::new(input, &recent, budget))
                    .await
            }
        };

        println!("advisor> {reply}");
        log.append("assistant", &reply)?;
    }

    log.append("system", "session_end")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_parse_slash() {
        assert_eq!(parse_slash("how am I doing?"), None);
        assert_eq!(parse_slash("/help"), Some(Slash::Help));
        assert_eq!(parse_slash(" /status "), Some(Slash::Status));
        assert_eq!(parse_slash("/exit"), Some(Slash::Quit));
        assert_eq!(
            parse_slash("/add Coffee $5"),
            Some(Slash::Add("Coffee $5".to_string()))
        );
        assert_eq!(parse_slash("/add"), Some(Slash::Add(String::new())));
        assert_eq!(parse_slash("/nope"), Some(Slash::Unknown("nope".to_string())));
    }

    #[test]
    fn test_chat_log_appends_daily_file() {
        let dir = TempDir::new().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 5, 20, 9, 0, 0).unwrap();
        let mut log = ChatLog::open_in(dir.path(), now);
        assert!(log.path().ends_with("2026-05-20.md"));

        log.append("user", "am I over\nbudget?").unwrap();
        log.append("assistant", "no").unwrap();

        let text = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[user] am I over budget?"));
        assert!(lines[1].ends_with("[assistant] no"));
    }
}
