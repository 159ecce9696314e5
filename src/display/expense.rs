//! Expense display formatting
//!
//! Provides utilities for formatting expenses for terminal display as a
//! register of rows.

use crate::models::{Couple, Expense, DEFAULT_CATEGORY_KEY};

/// Format a single expense for display (register row)
pub fn format_expense_row(expense: &Expense, couple: &Couple, symbol: &str) -> String {
    let status_icon = if expense.is_settled() { "\u{2713}" } else { " " };

    let payer = couple.member_name(expense.paid_by).unwrap_or("?");
    let category = expense
        .category_key
        .as_deref()
        .unwrap_or(DEFAULT_CATEGORY_KEY);

    let description = if expense.description.is_empty() {
        "(no description)".to_string()
    } else {
        expense.description.clone()
    };

    format!(
        "{} {} {:12} {:20} {:>12} paid by {}",
        status_icon,
        expense.date.format("%Y-%m-%d"),
        truncate(category, 12),
        truncate(&description, 20),
        format!("{}{:.2}", symbol, expense.effective_amount()),
        payer
    )
}

/// Format a list of expenses as a register
pub fn format_expense_register(expenses: &[Expense], couple: &Couple, symbol: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:3} {:10} {:12} {:20} {:>12}\n",
        "St", "Date", "Category", "Description", "Amount"
    ));
    output.push_str(&"-".repeat(72));
    output.push('\n');

    for expense in expenses {
        output.push_str(&format_expense_row(expense, couple, symbol));
        output.push('\n');
    }

    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}\u{2026}", truncated)
    }
}
