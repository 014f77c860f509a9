use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use spendlog_core::{symbol_for_code, LedgerStore};
use spendlog_finance::parse_transaction;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod chat;
mod commands;
mod config;
mod overview;
mod state;

use commands::AddOutcome;

#[derive(Parser, Debug)]
#[command(name = "spendlog", version, about = "Expense tracker with a text parser and a rule-based advisor")]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record an expense from free text or a pasted bank alert
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Show what `add` would record, as JSON, without saving
    Parse {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Record an expense as typed, uncategorized
    Record {
        #[arg(long)]
        text: String,
        #[arg(long)]
        amount: f64,
    },

    /// List a month's transactions (default: this month)
    List {
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
    },

    /// Delete a transaction by id
    Delete { id: String },

    /// Ask the advisor one question
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Chat with the advisor
    Chat,

    /// Monthly summary, forecast and insights
    Overview {
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
    },

    /// Every recurring charge on record, all months
    Subscriptions,

    /// Show or change budget, income and currency
    Budget {
        #[arg(long)]
        budget: Option<f64>,
        #[arg(long)]
        income: Option<f64>,
        #[arg(long)]
        currency: Option<String>,
    },

    /// Set the display currency (USD, INR, EUR, GBP)
    Currency { code: String },

    /// Accounts and net worth
    Account {
        #[command(subcommand)]
        command: AccountCommand,
    },

    /// Savings jars
    Goal {
        #[command(subcommand)]
        command: GoalCommand,
    },

    /// Manage ~/.spendlog/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    Add {
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        balance: f64,
        /// cash, investment, credit or loan
        #[arg(long, default_value = "cash")]
        kind: String,
    },
    List,
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum GoalCommand {
    Add {
        name: String,
        #[arg(long)]
        target: f64,
        #[arg(long)]
        emoji: Option<String>,
    },
    Deposit {
        id: String,
        amount: f64,
    },
    List,
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.spendlog/config.toml with defaults
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;

    // Priority: RUST_LOG env var > --verbose flag > config level
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(&cfg.logging.level)
            .with_context(|| format!("bad logging.level {:?}", cfg.logging.level))?
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    if let Command::Config { command } = &cli.command {
        match command {
            ConfigCommand::Init => config::init_config()?,
        }
        return Ok(());
    }
    if let Command::Parse { text } = &cli.command {
        let parsed = parse_transaction(&text.join(" "));
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return Ok(());
    }

    let mut ledger = state::open_ledger(cfg.defaults.settings())?;
    let now = Utc::now();

    match cli.command {
        Command::Add { text } => match commands::add_entry(&mut ledger, &text.join(" "), now)? {
            AddOutcome::Recorded(rec) => {
                let sym = symbol_for_code(&ledger.settings()?.currency);
                println!(
                    "Recorded {}: {} {} [{}]",
                    rec.id,
                    rec.description,
                    commands::format_money(sym, rec.amount),
                    rec.category_label()
                );
            }
            AddOutcome::Skipped(parsed) => {
                println!(
                    "Nothing recorded (amount {:.2}, description {:?}).",
                    parsed.amount, parsed.description
                );
            }
        },

        Command::Record { text, amount } => match commands::record_manual(&mut ledger, &text, amount, now)? {
            Some(rec) => println!("Recorded {}: {}", rec.id, rec.description),
            None => println!("Nothing recorded."),
        },

        Command::List { month, year } => {
            let (year, month) = commands::resolve_month(month, year, now)?;
            let txns = commands::month_transactions(&ledger, year, month)?;
            let sym = symbol_for_code(&ledger.settings()?.currency);
            println!("{}", commands::render_transactions(&txns, sym));
        }

        Command::Delete { id } => {
            if !ledger.delete_transaction(&id)? {
                bail!("no transaction with id {id}");
            }
            println!("Deleted {id}");
        }

        Command::Ask { question } => {
            let reply = commands::ask(&ledger, &question.join(" "), cfg.advisor.recent_limit)?;
            println!("{reply}");
        }

        Command::Chat => {
            let dir = state::chat_dir()?;
            chat::run_chat(
                &mut ledger,
                &cfg.advisor.advisor(),
                cfg.advisor.recent_limit,
                &dir,
            )
            .await?;
        }

        Command::Overview { month, year } => {
            let (year, month) = commands::resolve_month(month, year, now)?;
            let txns = commands::month_transactions(&ledger, year, month)?;
            let settings = ledger.settings()?;
            print!(
                "{}",
                overview::render_overview(&txns, &settings, year, month, now)
            );
        }

        Command::Subscriptions => {
            println!("{}", commands::recurring_report(&ledger)?);
        }

        Command::Budget {
            budget,
            income,
            currency,
        } => {
            let settings = if budget.is_none() && income.is_none() && currency.is_none() {
                ledger.settings()?
            } else {
                commands::update_settings(&mut ledger, budget, income, currency.as_deref())?
            };
            let sym = symbol_for_code(&settings.currency);
            println!("Budget:   {}", commands::format_money(sym, settings.budget));
            println!("Income:   {}", commands::format_money(sym, settings.income));
            println!("Currency: {} ({sym})", settings.currency);
        }

        Command::Currency { code } => {
            let settings = commands::update_settings(&mut ledger, None, None, Some(&code))?;
            println!("Currency set to {}", settings.currency);
        }

        Command::Account { command } => match command {
            AccountCommand::Add {
                name,
                balance,
                kind,
            } => {
                let kind = commands::parse_account_kind(&kind)?;
                let acct = ledger.add_account(&name, balance, kind)?;
                println!("Added {} ({})", acct.id, acct.kind.label());
            }
            AccountCommand::List => {
                let sym = symbol_for_code(&ledger.settings()?.currency);
                println!("{}", commands::render_accounts(&ledger.accounts()?, sym));
            }
            AccountCommand::Delete { id } => {
                if !ledger.delete_account(&id)? {
                    bail!("no account with id {id}");
                }
                println!("Deleted {id}");
            }
        },

        Command::Goal { command } => match command {
            GoalCommand::Add {
                name,
                target,
                emoji,
            } => {
                let goal = ledger.add_goal(&name, target, emoji)?;
                println!("Added {} {} {}", goal.id, goal.emoji, goal.name);
            }
            GoalCommand::Deposit { id, amount } => {
                if !(amount > 0.0) {
                    bail!("deposit must be positive");
                }
                let goal = ledger.deposit_to_goal(&id, amount)?;
                info!(goal = %goal.id, amount, "deposit");
                println!("{} {}: {:.0}%", goal.emoji, goal.name, goal.progress_pct());
            }
            GoalCommand::List => {
                let sym = symbol_for_code(&ledger.settings()?.currency);
                println!("{}", commands::render_goals(&ledger.goals()?, sym));
            }
            GoalCommand::Delete { id } => {
                if !ledger.delete_goal(&id)? {
                    bail!("no goal with id {id}");
                }
                println!("Deleted {id}");
            }
        },

        Command::Parse { .. } | Command::Config { .. } => {}
    }

    Ok(())
}
