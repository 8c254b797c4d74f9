//! Text rendering for the expense views.
//!
//! - `list` renders every expense as a table followed by the grand total
//! - `by_category` renders one line per category total
//!
//! Both return [`NO_EXPENSES`] alone when there is nothing to show.

use crate::model::{Amount, CategoryTotal, Expense};
use std::fmt::Write;

pub const NO_EXPENSES: &str = "No expenses recorded yet.";

/// Width of the description column. Longer descriptions are cut to fit.
pub const DESCRIPTION_WIDTH: usize = 24;

pub fn list(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return format!("{NO_EXPENSES}\n");
    }

    let mut output = String::new();
    output.push_str("Your Expenses:\n");
    output.push_str("ID | Date       | Category    | Description              | Amount\n");
    output.push_str("---|------------|-------------|--------------------------|--------\n");

    for expense in expenses {
        let _ = writeln!(
            output,
            "{:<2} | {:<10} | {:<11} | {:<24} | {}",
            expense.id(),
            expense.date().format("%Y-%m-%d").to_string(),
            expense.category().as_str(),
            truncate(expense.description(), DESCRIPTION_WIDTH),
            expense.amount()
        );
    }

    let total: Amount = expenses.iter().map(Expense::amount).sum();
    let _ = write!(output, "\nTotal: {total}\n");
    output
}

pub fn by_category(totals: &[CategoryTotal]) -> String {
    if totals.is_empty() {
        return format!("{NO_EXPENSES}\n");
    }

    let mut output = String::from("Expenses by Category:\n");
    for line in totals {
        let _ = writeln!(output, "{:<15}: {}", line.category.as_str(), line.total);
    }
    output
}

/// Cuts `s` to `max_len` characters, ending in `...` when anything was removed.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
