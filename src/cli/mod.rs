mod render;
mod session;

pub use render::*;
pub use session::*;

use anyhow::{Context, Result, ensure};
use chrono::Utc;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tokio::io::BufReader;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::ExpenseLedger;
use crate::domain::{YearMonth, parse_amount};

/// Pocketspend - Personal Expense Tracker
#[derive(Parser)]
#[command(name = "pocketspend")]
#[command(about = "A minimal in-memory expense tracker with monthly summaries")]
#[command(version)]
pub struct Cli {
    /// Month to show (YYYY-MM, defaults to the current month)
    #[arg(short, long, global = true)]
    pub month: Option<String>,

    /// Currency symbol printed in front of amounts
    #[arg(short, long, default_value = "$", global = true)]
    pub currency: String,

    /// Amounts offered by the entry form, comma separated
    #[arg(long, value_delimiter = ',', default_value = "5,10,15,20,50", global = true)]
    pub quick_amounts: Vec<String>,

    /// Print the expense-added signal after each successful add
    #[arg(long, global = true)]
    pub emit_signals: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive session (default)
    Shell,

    /// List the spending categories
    Categories,
}

impl Cli {
    /// Build the session settings from the command-line flags.
    pub fn session_config(&self) -> Result<SessionConfig> {
        let quick_amounts = self
            .quick_amounts
            .iter()
            .map(|value| {
                let amount = parse_amount(value)
                    .with_context(|| format!("Invalid quick amount '{}'", value))?;
                ensure!(
                    amount > Decimal::ZERO,
                    "Quick amount '{}' must be above 0",
                    value
                );
                Ok(amount)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SessionConfig {
            currency: self.currency.clone(),
            quick_amounts,
            emit_signals: self.emit_signals,
        })
    }

    /// The month selected with `--month`, or the month containing now.
    pub fn selected_month(&self) -> Result<YearMonth> {
        match &self.month {
            Some(value) => value
                .parse()
                .with_context(|| format!("Invalid month '{}'. Use YYYY-MM", value)),
            None => Ok(YearMonth::containing(Utc::now())),
        }
    }

    fn init_tracing(&self) {
        let filter = if self.verbose { "debug" } else { "warn" };
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| filter.into()),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .try_init();
    }

    pub async fn run(self) -> Result<()> {
        self.init_tracing();

        let config = self.session_config()?;
        let month = self.selected_month()?;
        let ledger = ExpenseLedger::new();

        match self.command.unwrap_or(Commands::Shell) {
            Commands::Shell => {
                debug!(%month, "Starting session");
                println!(
                    "Tracking expenses for {}. Type 'help' for commands.",
                    ledger.month_label(month)
                );
                let mut session = Session::new(&ledger, config, month);
                session
                    .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
                    .await?;
            }

            Commands::Categories => {
                print!("{}", render_categories(ledger.list_categories()));
            }
        }

        Ok(())
    }
}
