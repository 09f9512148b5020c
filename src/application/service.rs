use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{
    AMOUNT_SCALE, CATEGORIES, Category, CategoryId, Expense, MAX_AMOUNT, YearMonth,
    format_amount, lookup_category, round_amount, sum_in_month,
};

use super::{AppError, CategoryTotal, MonthlySummary};

/// In-memory expense ledger. This is the primary interface for any client
/// (CLI session, exporters, tests).
///
/// The ledger is `Send + Sync`; share it behind an `Arc` to record expenses
/// from several tasks at once. Appends to one category are serialized by the
/// map's shard lock, so concurrent adds are never lost. Queries see whatever
/// was appended by the time they reach each category.
pub struct ExpenseLedger {
    categories: &'static [Category],
    expenses: DashMap<CategoryId, Vec<Expense>>,
}

impl ExpenseLedger {
    /// Create a ledger over the built-in category set.
    pub fn new() -> Self {
        Self::with_categories(&CATEGORIES)
    }

    /// Create a ledger over a custom, static category table.
    pub fn with_categories(categories: &'static [Category]) -> Self {
        Self {
            categories,
            expenses: DashMap::with_capacity(categories.len()),
        }
    }

    // ========================
    // Category operations
    // ========================

    /// All categories, in display order.
    pub fn list_categories(&self) -> &'static [Category] {
        self.categories
    }

    /// Get a category by id.
    pub fn find_category(&self, id: &str) -> Result<&'static Category, AppError> {
        lookup_category(self.categories, id)
            .ok_or_else(|| AppError::CategoryNotFound(id.to_string()))
    }

    // ========================
    // Expense operations
    // ========================

    /// Record an expense stamped with the current time.
    pub fn add_expense(&self, category_id: &str, amount: Decimal) -> Result<Expense, AppError> {
        self.add_expense_at(category_id, amount, Utc::now())
    }

    /// Record an expense with an explicit creation time.
    ///
    /// The amount is rounded half-up to two decimals before it is stored and
    /// must not exceed `MAX_AMOUNT`. Nothing is recorded when validation fails.
    pub fn add_expense_at(
        &self,
        category_id: &str,
        amount: Decimal,
        created_at: DateTime<Utc>,
    ) -> Result<Expense, AppError> {
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }

        let category = self.find_category(category_id)?;

        let amount = round_amount(amount);
        if amount.is_zero() {
            return Err(AppError::InvalidAmount(
                "Amount rounds to 0.00".to_string(),
            ));
        }
        if amount > MAX_AMOUNT || amount.scale() != AMOUNT_SCALE {
            return Err(AppError::InvalidAmount(format!(
                "Amount must not exceed {}",
                format_amount(MAX_AMOUNT)
            )));
        }

        let expense = Expense::new(category.id, amount, created_at);
        self.expenses
            .entry(category.id)
            .or_default()
            .push(expense.clone());

        debug!(
            expense_id = %expense.id,
            category = category.id,
            amount = %expense.amount,
            "Recorded expense"
        );

        Ok(expense)
    }

    /// Total number of expenses recorded, across all months.
    pub fn expense_count(&self) -> usize {
        self.expenses.iter().map(|entry| entry.value().len()).sum()
    }

    /// Every expense created within the month, oldest first.
    /// Expenses with the same timestamp keep category order.
    pub fn expenses_in_month(&self, month: YearMonth) -> Vec<Expense> {
        let mut expenses: Vec<Expense> = self
            .categories
            .iter()
            .filter_map(|category| self.expenses.get(category.id))
            .flat_map(|list| {
                list.iter()
                    .filter(|e| e.falls_in(&month))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();

        expenses.sort_by_key(|e| e.created_at);
        expenses
    }

    // ========================
    // Aggregation
    // ========================

    /// Per-category totals for the month. Every category is present, zero
    /// totals included, ordered by descending total; ties keep category order.
    pub fn totals_for_month(&self, month: YearMonth) -> Vec<CategoryTotal> {
        let mut totals: Vec<CategoryTotal> = self
            .categories
            .iter()
            .map(|category| {
                let (total, count) = self
                    .expenses
                    .get(category.id)
                    .map(|list| sum_in_month(list.iter(), &month))
                    .unwrap_or((Decimal::ZERO, 0));
                CategoryTotal {
                    category,
                    total,
                    count,
                }
            })
            .collect();

        // sort_by is stable
        totals.sort_by(|a, b| b.total.cmp(&a.total));
        totals
    }

    /// Sum of all category totals for the month.
    pub fn total_spent(&self, month: YearMonth) -> Decimal {
        sum_totals(&self.totals_for_month(month))
    }

    /// Human-readable "Month Year" label.
    pub fn month_label(&self, month: YearMonth) -> String {
        month.label()
    }

    /// Totals, grand total and label for a month, computed from one snapshot.
    pub fn month_summary(&self, month: YearMonth) -> MonthlySummary {
        let totals = self.totals_for_month(month);
        let total_spent = sum_totals(&totals);
        MonthlySummary {
            month,
            label: self.month_label(month),
            totals,
            total_spent,
        }
    }
}

fn sum_totals(totals: &[CategoryTotal]) -> Decimal {
    totals
        .iter()
        .fold(Decimal::ZERO, |sum, t| sum.saturating_add(t.total))
}

impl Default for ExpenseLedger {
    fn default() -> Self {
        Self::new()
    }
}
