//! Settlement display formatting
//!
//! Renders a settlement record, including the analytics frozen into it at
//! creation time, for terminal output.

use crate::models::{Couple, Settlement};

/// Format a single settlement for a history listing
pub fn format_settlement_row(settlement: &Settlement, couple: &Couple, symbol: &str) -> String {
    let payer = couple.member_name(settlement.settled_by).unwrap_or("?");
    format!(
        "{} {} {:>12} by {:10} ({} expenses)",
        settlement.id,
        settlement.settled_at.format("%Y-%m-%d"),
        format!("{}{:.2}", symbol, settlement.amount),
        payer,
        settlement.expenses_settled_count
    )
}

/// Format a list of settlements as a history
pub fn format_settlement_history(
    settlements: &[Settlement],
    couple: &Couple,
    symbol: &str,
) -> String {
    if settlements.is_empty() {
        return "No settlements yet.\n".to_string();
    }

    let mut output = String::new();
    for settlement in settlements {
        output.push_str(&format_settlement_row(settlement, couple, symbol));
        output.push('\n');
    }
    output
}

/// Format the full stored summary of one settlement
pub fn format_settlement_summary(settlement: &Settlement, couple: &Couple, symbol: &str) -> String {
    let payer = couple.member_name(settlement.settled_by).unwrap_or("?");

    let mut output = String::new();
    output.push_str(&format!("Settlement {}\n", settlement.id));
    output.push_str(&"=".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "Date: {}\n",
        settlement.settled_at.format("%Y-%m-%d %H:%M")
    ));
    output.push_str(&format!("Paid: {}{:.2} by {}\n", symbol, settlement.amount, payer));
    if !settlement.note.is_empty() {
        output.push_str(&format!("Note: {}\n", settlement.note));
    }
    output.push_str(&format!(
        "Closed {} expenses totaling {}{:.2} over {} days\n",
        settlement.expenses_settled_count,
        symbol,
        settlement.total_expenses_amount,
        settlement.settlement_period_days
    ));

    if !settlement.category_breakdown.is_empty() {
        output.push('\n');
        output.push_str(&format!(
            "{:<16} {:>10} {:>6} {:>10} {:>10}\n",
            "Category",
            "Total",
            "Count",
            couple.user1_name.as_str(),
            couple.user2_name.as_str()
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for (key, entry) in &settlement.category_breakdown {
            output.push_str(&format!(
                "{:<16} {:>10} {:>6} {:>10} {:>10}\n",
                key,
                format!("{}{:.2}", symbol, entry.total_amount),
                entry.expense_count,
                format!("{}{:.2}", symbol, entry.user1_amount),
                format!("{}{:.2}", symbol, entry.user2_amount),
            ));
        }
    }

    if !settlement.top_categories.is_empty() {
        output.push('\n');
        output.push_str("Top categories:\n");
        for (rank, top) in settlement.top_categories.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} {}{:.2}\n",
                rank + 1,
                top.name,
                symbol,
                top.total_amount
            ));
        }
    }

    let budget = &settlement.budget_summary;
    if budget.included_in_budget {
        output.push('\n');
        output.push_str(&format!(
            "Budget {}: spent {}{:.2} of {}{:.2} ({}{:.2} remaining)\n",
            budget.month_year,
            symbol,
            budget.total_spent,
            symbol,
            budget.total_budget,
            symbol,
            budget.budget_remaining
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BudgetSummary, CategoryBreakdownEntry, CoupleId, SettlementId, TopCategory, UserId,
    };
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn sample() -> (Settlement, Couple) {
        let couple = Couple::new("Alice", "Bob", "USD");
        let mut breakdown = BTreeMap::new();
        breakdown.insert(
            "groceries".to_string(),
            CategoryBreakdownEntry {
                total_amount: 140.0,
                expense_count: 2,
                user1_amount: 70.0,
                user2_amount: 70.0,
            },
        );
        let settlement = Settlement {
            id: SettlementId::new(),
            couple_id: CoupleId::new(),
            user1_id: couple.user1_id,
            user2_id: couple.user2_id,
            amount: 35.0,
            settled_by: couple.user2_id,
            note: "june".to_string(),
            settled_at: Utc::now(),
            expenses_settled_count: 2,
            category_breakdown: breakdown,
            budget_summary: BudgetSummary {
                included_in_budget: true,
                total_budget: 500.0,
                total_spent: 140.0,
                budget_remaining: 360.0,
                month_year: "2025-06".to_string(),
            },
            top_categories: vec![TopCategory {
                key: "groceries".to_string(),
                name: "Groceries".to_string(),
                total_amount: 140.0,
            }],
            total_expenses_amount: 140.0,
            settlement_period_days: 12,
        };
        (settlement, couple)
    }

    #[test]
    fn test_summary_sections() {
        let (settlement, couple) = sample();
        let summary = format_settlement_summary(&settlement, &couple, "$");
        assert!(summary.contains("$35.00 by Bob"));
        assert!(summary.contains("Note: june"));
        assert!(summary.contains("groceries"));
        assert!(summary.contains("1. Groceries $140.00"));
        assert!(summary.contains("Budget 2025-06"));
        assert!(summary.contains("over 12 days"));
    }

    #[test]
    fn test_history_row() {
        let (settlement, couple) = sample();
        let row = format_settlement_row(&settlement, &couple, "$");
        assert!(row.contains("$35.00"));
        assert!(row.contains("by Bob"));
        assert!(row.contains("(2 expenses)"));
    }

    #[test]
    fn test_empty_history() {
        let (_, couple) = sample();
        assert_eq!(format_settlement_history(&[], &couple, "$"), "No settlements yet.\n");
    }
}
