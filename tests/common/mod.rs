// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use pocketspend::ExpenseLedger;
use pocketspend::domain::YearMonth;
use rust_decimal::Decimal;

/// Helper to create an empty ledger over the built-in categories
pub fn test_ledger() -> ExpenseLedger {
    ExpenseLedger::new()
}

/// Helper to parse a date string into DateTime<Utc> at midnight
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

/// Helper to parse an RFC 3339 timestamp
pub fn parse_ts(ts: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc)
}

/// Helper to build a decimal amount from a string
pub fn amount(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn month(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).unwrap()
}

/// Test fixture: a few expenses spread over January and February 2024
pub struct StandardExpenses;

impl StandardExpenses {
    /// January: groceries 150.00 + 85.50, coffee 3.20 + 4.80, fun 40.00.
    /// February: groceries 60.00, car 45.00.
    pub fn record(ledger: &ExpenseLedger) {
        let entries = [
            ("groceries", "150.00", "2024-01-05"),
            ("groceries", "85.50", "2024-01-19"),
            ("coffee", "3.20", "2024-01-02"),
            ("coffee", "4.80", "2024-01-31"),
            ("fun", "40.00", "2024-01-20"),
            ("groceries", "60.00", "2024-02-01"),
            ("car", "45.00", "2024-02-14"),
        ];
        for (category, value, date) in entries {
            ledger
                .add_expense_at(category, amount(value), parse_date(date))
                .unwrap();
        }
    }
}
