//! Budget CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::error::SplitpennyResult;
use crate::models::money::format_amount;
use crate::services::{BudgetService, CategoryService, CoupleService};
use crate::storage::Storage;

/// Budget management commands
#[derive(Debug, Subcommand)]
pub enum BudgetCommands {
    /// Set one category's budget for the current month
    Set {
        /// Category key
        category: String,
        /// Budgeted amount
        amount: f64,
    },
    /// Enable budget tracking for the current month
    Enable,
    /// Disable budget tracking for the current month
    Disable,
    /// Show the current month's budget
    Show,
}

/// Handle a budget subcommand
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    command: BudgetCommands,
) -> SplitpennyResult<()> {
    let couple = CoupleService::new(storage).require_current()?;
    let service = BudgetService::new(storage);

    match command {
        BudgetCommands::Set { category, amount } => {
            let budget = service.set_category_budget(couple.id, &category, amount)?;
            println!(
                "Budget for {} set to {} ({} total)",
                category,
                format_amount(amount, &settings.currency_symbol),
                format_amount(budget.total_budget(), &settings.currency_symbol)
            );
        }
        BudgetCommands::Enable => {
            service.set_enabled(couple.id, true)?;
            println!("Budget tracking enabled for {}", service.current_month());
        }
        BudgetCommands::Disable => {
            service.set_enabled(couple.id, false)?;
            println!("Budget tracking disabled for {}", service.current_month());
        }
        BudgetCommands::Show => match service.current_budget(couple.id)? {
            Some(budget) => {
                let state = if budget.enabled { "enabled" } else { "disabled" };
                println!("Budget for {} ({})", budget.month_year, state);
                let catalog = CategoryService::new(storage).catalog()?;
                for (key, amount) in &budget.category_budgets {
                    println!(
                        "  {:<16} {}",
                        catalog.display_name(key),
                        format_amount(*amount, &settings.currency_symbol)
                    );
                }
                println!(
                    "  {:<16} {}",
                    "Total",
                    format_amount(budget.total_budget(), &settings.currency_symbol)
                );
            }
            None => println!("No budget configured for {}", service.current_month()),
        },
    }

    Ok(())
}
