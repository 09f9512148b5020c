use rust_decimal::Decimal;

use crate::application::MonthlySummary;
use crate::domain::{Category, format_money};

/// Category tiles, one per line, in display order.
pub fn render_categories(categories: &[Category]) -> String {
    let mut out = String::from("Categories\n");
    for category in categories {
        out.push_str(&format!("  {}  {:<18} [{}]\n", category.icon, category.name, category.id));
    }
    out
}

/// Month summary as a table, highest spend first.
pub fn render_summary(summary: &MonthlySummary, currency: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("Spending for {}\n\n", summary.label));
    out.push_str(&format!(
        "{:<20} {:>12} {:>8} {:>8}\n",
        "CATEGORY", "TOTAL", "COUNT", "PERCENT"
    ));
    out.push_str(&format!("{}\n", "-".repeat(51)));

    for total in &summary.totals {
        out.push_str(&format!(
            "{:<20} {:>12} {:>8} {:>7.1}%\n",
            truncate(total.category.name, 20),
            format_money(currency, total.total),
            total.count,
            summary.share_of(total)
        ));
    }

    out.push_str(&format!("{}\n", "-".repeat(51)));
    out.push_str(&format!(
        "{:<20} {:>12} {:>8}\n",
        "TOTAL",
        format_money(currency, summary.total_spent),
        summary.expense_count()
    ));
    out
}

/// Category tiles followed by the month summary.
pub fn render_dashboard(
    categories: &[Category],
    summary: &MonthlySummary,
    currency: &str,
) -> String {
    format!(
        "{}\n{}",
        render_categories(categories),
        render_summary(summary, currency)
    )
}

/// Entry form for a category: header, quick amounts and an optional message.
pub fn render_form(
    category: &Category,
    quick_amounts: &[Decimal],
    currency: &str,
    message: Option<&str>,
) -> String {
    let mut out = format!("{}\n", category.label());
    let options: Vec<String> = quick_amounts
        .iter()
        .map(|amount| format_money(currency, *amount))
        .collect();
    out.push_str(&format!("  Quick amounts: {}\n", options.join("  ")));
    out.push_str(&format!(
        "  Usage: add {} <amount> [--date YYYY-MM-DD]\n",
        category.id
    ));
    if let Some(message) = message {
        out.push_str(&format!("  {}\n", message));
    }
    out
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ExpenseLedger;
    use crate::domain::{CATEGORIES, YearMonth};

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Groceries", 20), "Groceries");
        assert_eq!(truncate("A very long category name", 10), "A very ...");
    }

    #[test]
    fn test_render_empty_summary_lists_every_category() {
        let ledger = ExpenseLedger::new();
        let summary = ledger.month_summary(YearMonth::new(2024, 1).unwrap());
        let table = render_summary(&summary, "$");

        assert!(table.starts_with("Spending for January 2024"));
        for category in &CATEGORIES {
            assert!(table.contains(category.name), "missing {}", category.name);
        }
        assert!(table.contains("$0.00"));
    }

    #[test]
    fn test_render_form_with_message() {
        let form = render_form(
            &CATEGORIES[1],
            &[Decimal::new(5, 0), Decimal::new(10, 0)],
            "$",
            Some("Enter an amount above 0."),
        );
        assert!(form.contains("Coffee & Drinks"));
        assert!(form.contains("$5.00  $10.00"));
        assert!(form.ends_with("Enter an amount above 0.\n"));
    }
}
