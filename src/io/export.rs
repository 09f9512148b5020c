use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::application::{ExpenseLedger, MonthlySummary};
use crate::domain::{Expense, YearMonth, format_amount};

/// What an export contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Per-category totals for a month
    Summary,
    /// Individual expenses recorded in a month
    Expenses,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Summary => "summary",
            ExportKind::Expenses => "expenses",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "summary" => Some(ExportKind::Summary),
            "expenses" => Some(ExportKind::Expenses),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

/// Expenses of one month, as written by the JSON expense export
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub month: YearMonth,
    pub expenses: Vec<Expense>,
}

/// Exporter for converting ledger data to CSV or JSON
pub struct Exporter<'a> {
    ledger: &'a ExpenseLedger,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a ExpenseLedger) -> Self {
        Self { ledger }
    }

    /// Export in the requested kind and format. Returns the number of
    /// records written.
    pub fn export<W: Write>(
        &self,
        kind: ExportKind,
        format: ExportFormat,
        month: YearMonth,
        writer: W,
    ) -> Result<usize> {
        match (kind, format) {
            (ExportKind::Summary, ExportFormat::Csv) => self.export_summary_csv(month, writer),
            (ExportKind::Summary, ExportFormat::Json) => self
                .export_summary_json(month, writer)
                .map(|summary| summary.totals.len()),
            (ExportKind::Expenses, ExportFormat::Csv) => self.export_expenses_csv(month, writer),
            (ExportKind::Expenses, ExportFormat::Json) => self
                .export_expenses_json(month, writer)
                .map(|snapshot| snapshot.expenses.len()),
        }
    }

    /// Export the month's per-category totals to CSV format
    pub fn export_summary_csv<W: Write>(&self, month: YearMonth, writer: W) -> Result<usize> {
        let summary = self.ledger.month_summary(month);
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record(["category", "name", "count", "total"])?;

        let mut count = 0;
        for total in &summary.totals {
            let expenses = total.count.to_string();
            let amount = format_amount(total.total);
            csv_writer.write_record([
                total.category.id,
                total.category.name,
                expenses.as_str(),
                amount.as_str(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the month's expenses to CSV format, oldest first
    pub fn export_expenses_csv<W: Write>(&self, month: YearMonth, writer: W) -> Result<usize> {
        let expenses = self.ledger.expenses_in_month(month);
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "created_at", "category", "amount"])?;

        let mut count = 0;
        for expense in &expenses {
            let id = expense.id.to_string();
            let created_at = expense.created_at.to_rfc3339();
            let amount = format_amount(expense.amount);
            csv_writer.write_record([
                id.as_str(),
                created_at.as_str(),
                expense.category_id,
                amount.as_str(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the month summary as pretty-printed JSON
    pub fn export_summary_json<W: Write>(
        &self,
        month: YearMonth,
        mut writer: W,
    ) -> Result<MonthlySummary> {
        let summary = self.ledger.month_summary(month);

        let json = serde_json::to_string_pretty(&summary)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(summary)
    }

    /// Export the month's expenses as a JSON snapshot
    pub fn export_expenses_json<W: Write>(
        &self,
        month: YearMonth,
        mut writer: W,
    ) -> Result<ExpenseSnapshot> {
        let snapshot = ExpenseSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            month,
            expenses: self.ledger.expenses_in_month(month),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
