use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::{CategoryId, YearMonth};

pub type ExpenseId = Uuid;

/// A single recorded spend. Expenses are immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expense {
    pub id: ExpenseId,
    /// Category the spend is booked against
    pub category_id: CategoryId,
    /// Positive amount with exactly two decimal places
    pub amount: Decimal,
    /// When the expense was recorded
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense. The amount must already be rounded and positive;
    /// the ledger is responsible for validating it.
    pub(crate) fn new(category_id: CategoryId, amount: Decimal, created_at: DateTime<Utc>) -> Self {
        debug_assert!(amount > Decimal::ZERO, "Expense amount must be positive");
        Self {
            id: Uuid::new_v4(),
            category_id,
            amount,
            created_at,
        }
    }

    pub fn falls_in(&self, month: &YearMonth) -> bool {
        month.contains_instant(self.created_at)
    }
}

/// Sum the amounts of the expenses that fall within a month.
pub fn sum_in_month<'a, I>(expenses: I, month: &YearMonth) -> (Decimal, usize)
where
    I: IntoIterator<Item = &'a Expense>,
{
    expenses
        .into_iter()
        .filter(|e| e.falls_in(month))
        .fold((Decimal::ZERO, 0), |(total, count), e| {
            (total.saturating_add(e.amount), count + 1)
        })
}
