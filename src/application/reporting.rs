use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::domain::{Category, YearMonth};

/// Spend for one category within a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: &'static Category,
    pub total: Decimal,
    pub count: usize,
}

/// Everything the dashboard shows for a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: YearMonth,
    pub label: String,
    /// All categories, highest spend first
    pub totals: Vec<CategoryTotal>,
    pub total_spent: Decimal,
}

impl MonthlySummary {
    /// Number of expenses counted across all categories.
    pub fn expense_count(&self) -> usize {
        self.totals.iter().map(|t| t.count).sum()
    }

    /// Share of the month's spend for a category, as a percentage.
    /// Zero when nothing was spent.
    pub fn share_of(&self, total: &CategoryTotal) -> f64 {
        if self.total_spent.is_zero() {
            return 0.0;
        }
        total
            .total
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.checked_div(self.total_spent))
            .and_then(|share| share.round_dp(1).to_f64())
            .unwrap_or(0.0)
    }
}
