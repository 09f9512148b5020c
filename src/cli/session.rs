use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use super::render::{render_categories, render_dashboard, render_form, render_summary};
use crate::application::{ErrorKind, ExpenseLedger};
use crate::domain::{Category, YearMonth, format_money, parse_amount};
use crate::io::{ExportFormat, ExportKind, Exporter};

const PROMPT: &str = "pocketspend> ";

const HELP: &str = "\
Commands:
  categories                                   List spending categories
  dashboard                                    Categories and this month's summary
  summary [YYYY-MM] [--format table|json|csv]  Month summary, highest spend first
  month YYYY-MM                                Switch the current month
  form <category>                              Show the entry form for a category
  add <category> <amount> [--date YYYY-MM-DD]  Record an expense
  export summary|expenses [--format csv|json] [--output PATH]
  help                                         Show this help
  quit                                         Leave the session
";

/// Settings for an interactive session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Symbol printed in front of amounts
    pub currency: String,
    /// Amounts offered by the entry form
    pub quick_amounts: Vec<Decimal>,
    /// Print the expense-added signal after each successful add
    pub emit_signals: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            currency: "$".to_string(),
            quick_amounts: [5, 10, 15, 20, 50].into_iter().map(Decimal::from).collect(),
            emit_signals: false,
        }
    }
}

/// Notification sent to the client after an expense is recorded so it can
/// refresh the views for that category.
/// Serializes as `{"expenseAdded":{"category":"<id>"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Signal {
    #[serde(rename = "expenseAdded")]
    ExpenseAdded { category: String },
}

impl Signal {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to encode signal")
    }
}

/// Output of one handled command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub body: String,
    pub signal: Option<Signal>,
}

impl Reply {
    fn text(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            signal: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue(Reply),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFormat {
    Table,
    Json,
    Csv,
}

impl SummaryFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(SummaryFormat::Table),
            "json" => Some(SummaryFormat::Json),
            "csv" => Some(SummaryFormat::Csv),
            _ => None,
        }
    }
}

/// A parsed session command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Help,
    Quit,
    Categories,
    Dashboard,
    Summary {
        month: Option<YearMonth>,
        format: SummaryFormat,
    },
    Month(YearMonth),
    Form {
        category: String,
    },
    Add {
        category: String,
        amount: String,
        date: Option<NaiveDate>,
    },
    Export {
        kind: ExportKind,
        format: ExportFormat,
        output: Option<PathBuf>,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown option '--{0}'")]
    UnknownOption(String),

    #[error("Option '--{0}' needs a value")]
    MissingValue(String),

    #[error("{0}")]
    InvalidValue(String),
}

struct Args<'a> {
    positional: Vec<&'a str>,
    options: Vec<(&'a str, &'a str)>,
}

impl<'a> Args<'a> {
    fn split(tokens: &[&'a str]) -> Result<Self, CommandError> {
        let mut positional = Vec::new();
        let mut options = Vec::new();
        let mut iter = tokens.iter().copied();
        while let Some(token) = iter.next() {
            if let Some(name) = token.strip_prefix("--") {
                let value = iter
                    .next()
                    .ok_or_else(|| CommandError::MissingValue(name.to_string()))?;
                options.push((name, value));
            } else {
                positional.push(token);
            }
        }
        Ok(Self {
            positional,
            options,
        })
    }

    /// Value of an option, rejecting any option not in `allowed`.
    fn option(&self, name: &str, allowed: &[&str]) -> Result<Option<&'a str>, CommandError> {
        if let Some((unknown, _)) = self.options.iter().find(|(n, _)| !allowed.contains(n)) {
            return Err(CommandError::UnknownOption(unknown.to_string()));
        }
        Ok(self
            .options
            .iter()
            .rev()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v))
    }
}

impl SessionCommand {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((name, rest)) = tokens.split_first() else {
            return Ok(None);
        };
        let args = Args::split(rest)?;

        let command = match name.to_lowercase().as_str() {
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" => SessionCommand::Quit,
            "categories" => SessionCommand::Categories,
            "dashboard" => SessionCommand::Dashboard,
            "summary" => {
                const USAGE: &str = "summary [YYYY-MM] [--format table|json|csv]";
                let month = match args.positional.as_slice() {
                    [] => None,
                    [month] => Some(parse_month(month)?),
                    _ => return Err(CommandError::Usage(USAGE)),
                };
                let format = match args.option("format", &["format"])? {
                    Some(value) => SummaryFormat::from_str(value).ok_or_else(|| {
                        CommandError::InvalidValue(format!(
                            "Invalid format '{}'. Valid: table, json, csv",
                            value
                        ))
                    })?,
                    None => SummaryFormat::Table,
                };
                SessionCommand::Summary { month, format }
            }
            "month" => match args.positional.as_slice() {
                [month] => SessionCommand::Month(parse_month(month)?),
                _ => return Err(CommandError::Usage("month YYYY-MM")),
            },
            "form" => match args.positional.as_slice() {
                [category] => SessionCommand::Form {
                    category: category.to_string(),
                },
                _ => return Err(CommandError::Usage("form <category>")),
            },
            "add" => {
                const USAGE: &str = "add <category> <amount> [--date YYYY-MM-DD]";
                let [category, amount] = args.positional.as_slice() else {
                    return Err(CommandError::Usage(USAGE));
                };
                let date = args
                    .option("date", &["date"])?
                    .map(|value| {
                        NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                            CommandError::InvalidValue(format!(
                                "Invalid date format '{}'. Use YYYY-MM-DD",
                                value
                            ))
                        })
                    })
                    .transpose()?;
                SessionCommand::Add {
                    category: category.to_string(),
                    amount: amount.to_string(),
                    date,
                }
            }
            "export" => {
                const USAGE: &str = "export summary|expenses [--format csv|json] [--output PATH]";
                let [kind] = args.positional.as_slice() else {
                    return Err(CommandError::Usage(USAGE));
                };
                let kind = ExportKind::from_str(kind).ok_or(CommandError::Usage(USAGE))?;
                let allowed = ["format", "output"];
                let format = match args.option("format", &allowed)? {
                    Some(value) => ExportFormat::from_str(value).ok_or_else(|| {
                        CommandError::InvalidValue(format!(
                            "Invalid format '{}'. Valid: csv, json",
                            value
                        ))
                    })?,
                    None => ExportFormat::Csv,
                };
                let output = args.option("output", &allowed)?.map(PathBuf::from);
                SessionCommand::Export {
                    kind,
                    format,
                    output,
                }
            }
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn parse_month(value: &str) -> Result<YearMonth, CommandError> {
    value
        .parse::<YearMonth>()
        .map_err(|e| CommandError::InvalidValue(e.to_string()))
}

/// Interactive front end over a ledger: renders the dashboard, the summary
/// and the entry form, and records expenses.
pub struct Session<'a> {
    ledger: &'a ExpenseLedger,
    config: SessionConfig,
    month: YearMonth,
}

impl<'a> Session<'a> {
    pub fn new(ledger: &'a ExpenseLedger, config: SessionConfig, month: YearMonth) -> Self {
        Self {
            ledger,
            config,
            month,
        }
    }

    /// The month the dashboard and summary show by default.
    pub fn month(&self) -> YearMonth {
        self.month
    }

    /// Parse and handle one input line. Syntax errors and failed commands
    /// become a reply so the session keeps running.
    pub fn handle_line(&mut self, line: &str) -> Outcome {
        match SessionCommand::parse(line) {
            Ok(None) => Outcome::Continue(Reply::default()),
            Ok(Some(SessionCommand::Quit)) => Outcome::Quit,
            Ok(Some(command)) => match self.handle(command) {
                Ok(reply) => Outcome::Continue(reply),
                Err(e) => {
                    warn!(error = %format!("{:#}", e), "Command failed");
                    Outcome::Continue(Reply::text(format!("Error: {:#}\n", e)))
                }
            },
            Err(e) => Outcome::Continue(Reply::text(format!("{}\n", e))),
        }
    }

    pub fn handle(&mut self, command: SessionCommand) -> Result<Reply> {
        let reply = match command {
            SessionCommand::Help => Reply::text(HELP),
            SessionCommand::Quit => Reply::default(),
            SessionCommand::Categories => {
                Reply::text(render_categories(self.ledger.list_categories()))
            }
            SessionCommand::Dashboard => {
                let summary = self.ledger.month_summary(self.month);
                Reply::text(render_dashboard(
                    self.ledger.list_categories(),
                    &summary,
                    &self.config.currency,
                ))
            }
            SessionCommand::Summary { month, format } => {
                let month = month.unwrap_or(self.month);
                self.summary(month, format)?
            }
            SessionCommand::Month(month) => {
                self.month = month;
                Reply::text(format!("Showing {}\n", self.ledger.month_label(month)))
            }
            SessionCommand::Form { category } => match self.ledger.find_category(&category) {
                Ok(category) => Reply::text(self.form(category, None)),
                Err(e) => Reply::text(format!("{}\n", e)),
            },
            SessionCommand::Add {
                category,
                amount,
                date,
            } => self.add(&category, &amount, date)?,
            SessionCommand::Export {
                kind,
                format,
                output,
            } => self.export(kind, format, output)?,
        };
        Ok(reply)
    }

    fn form(&self, category: &Category, message: Option<&str>) -> String {
        render_form(
            category,
            &self.config.quick_amounts,
            &self.config.currency,
            message,
        )
    }

    fn summary(&self, month: YearMonth, format: SummaryFormat) -> Result<Reply> {
        let exporter = Exporter::new(self.ledger);
        let body = match format {
            SummaryFormat::Table => {
                render_summary(&self.ledger.month_summary(month), &self.config.currency)
            }
            SummaryFormat::Json => {
                let mut buf = Vec::new();
                exporter.export_summary_json(month, &mut buf)?;
                format!("{}\n", String::from_utf8(buf)?)
            }
            SummaryFormat::Csv => {
                let mut buf = Vec::new();
                exporter.export_summary_csv(month, &mut buf)?;
                String::from_utf8(buf)?
            }
        };
        Ok(Reply::text(body))
    }

    fn add(&self, category_id: &str, amount: &str, date: Option<NaiveDate>) -> Result<Reply> {
        let category = match self.ledger.find_category(category_id) {
            Ok(category) => category,
            Err(e) => return Ok(Reply::text(format!("{}\n", e))),
        };

        let input = amount.trim();
        let input = input
            .strip_prefix(self.config.currency.as_str())
            .unwrap_or(input);
        let amount = match parse_amount(input) {
            Ok(amount) => amount,
            Err(e) => {
                let message = format!("Could not read amount: {}", e);
                return Ok(Reply::text(self.form(category, Some(message.as_str()))));
            }
        };

        let result = match date {
            Some(date) => {
                let created_at = date
                    .and_hms_opt(0, 0, 0)
                    .ok_or_else(|| anyhow!("Invalid date"))?
                    .and_utc();
                self.ledger.add_expense_at(category.id, amount, created_at)
            }
            None => self.ledger.add_expense(category.id, amount),
        };

        match result {
            Ok(expense) => {
                let message = format!(
                    "Added {} to {}",
                    format_money(&self.config.currency, expense.amount),
                    category.name
                );
                let signal = Signal::ExpenseAdded {
                    category: category.id.to_string(),
                };
                debug!(signal = %signal.to_json()?, "Expense added");
                Ok(Reply {
                    body: self.form(category, Some(message.as_str())),
                    signal: Some(signal),
                })
            }
            Err(_) if amount <= Decimal::ZERO => Ok(Reply::text(
                self.form(category, Some("Enter an amount above 0.")),
            )),
            Err(e) if e.kind() == ErrorKind::InvalidArgument => {
                let message = e.to_string();
                Ok(Reply::text(self.form(category, Some(message.as_str()))))
            }
            Err(e) => Ok(Reply::text(format!("{}\n", e))),
        }
    }

    fn export(
        &self,
        kind: ExportKind,
        format: ExportFormat,
        output: Option<PathBuf>,
    ) -> Result<Reply> {
        let exporter = Exporter::new(self.ledger);
        match output {
            Some(path) => {
                let file = std::fs::File::create(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                let count = exporter.export(kind, format, self.month, file)?;
                Ok(Reply::text(format!(
                    "Exported {} {} record(s) to {}\n",
                    count,
                    kind.as_str(),
                    path.display()
                )))
            }
            None => {
                let mut buf = Vec::new();
                exporter.export(kind, format, self.month, &mut buf)?;
                let mut body = String::from_utf8(buf)?;
                if !body.ends_with('\n') {
                    body.push('\n');
                }
                Ok(Reply::text(body))
            }
        }
    }

    /// Read commands from `reader` until end of input or `quit`, writing
    /// replies to `writer`.
    pub async fn run<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        writer.write_all(PROMPT.as_bytes()).await?;
        writer.flush().await?;

        while let Some(line) = lines.next_line().await? {
            match self.handle_line(&line) {
                Outcome::Quit => break,
                Outcome::Continue(reply) => {
                    writer.write_all(reply.body.as_bytes()).await?;
                    if let Some(signal) = &reply.signal {
                        if self.config.emit_signals {
                            let line = format!("signal: {}\n", signal.to_json()?);
                            writer.write_all(line.as_bytes()).await?;
                        }
                    }
                }
            }
            writer.write_all(PROMPT.as_bytes()).await?;
            writer.flush().await?;
        }

        writer.flush().await?;
        Ok(())
    }
}
