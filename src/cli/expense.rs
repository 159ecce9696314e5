//! Expense CLI commands

use chrono::{NaiveDate, Utc};
use clap::Subcommand;

use super::PayerArg;
use crate::config::Settings;
use crate::display::format_expense_register;
use crate::error::{SplitpennyError, SplitpennyResult};
use crate::models::money::parse_amount;
use crate::services::{AddExpense, CoupleService, ExpenseService};
use crate::storage::Storage;

/// Expense management commands
#[derive(Debug, Subcommand)]
pub enum ExpenseCommands {
    /// Record a shared expense
    Add {
        /// Amount, e.g. "42.50"
        amount: String,
        /// Which partner paid
        #[arg(long, value_enum)]
        paid_by: PayerArg,
        /// Category key (see `splitpenny category list`)
        #[arg(short, long)]
        category: Option<String>,
        /// Your percentage of the split (even split when omitted)
        #[arg(short, long)]
        split: Option<f64>,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Expense date (YYYY-MM-DD, today when omitted)
        #[arg(long)]
        date: Option<String>,
        /// Currency the expense was paid in
        #[arg(long)]
        currency: Option<String>,
        /// Amount converted to the primary currency, for foreign expenses
        #[arg(long)]
        converted: Option<String>,
    },
    /// List expenses
    List {
        /// Include settled expenses
        #[arg(long)]
        all: bool,
    },
}

/// Handle an expense subcommand
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    command: ExpenseCommands,
) -> SplitpennyResult<()> {
    let couple = CoupleService::new(storage).require_current()?;
    let service = ExpenseService::new(storage);

    match command {
        ExpenseCommands::Add {
            amount,
            paid_by,
            category,
            split,
            description,
            date,
            currency,
            converted,
        } => {
            let amount = parse_amount(&amount)
                .map_err(|e| SplitpennyError::InvalidAmount(e.to_string()))?;
            let primary_currency_amount = converted
                .map(|raw| parse_amount(&raw))
                .transpose()
                .map_err(|e| SplitpennyError::InvalidAmount(e.to_string()))?;
            let date = match date {
                Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
                    SplitpennyError::Validation(format!("Invalid date '{}': {}", raw, e))
                })?,
                None => Utc::now().date_naive(),
            };

            let expense = service.add_expense(AddExpense {
                couple_id: couple.id,
                amount,
                currency: currency.unwrap_or_else(|| couple.primary_currency.clone()),
                primary_currency_amount,
                paid_by: paid_by.user_id(&couple),
                user1_percentage: split,
                category_key: category,
                description: description.unwrap_or_default(),
                date,
            })?;

            println!(
                "Recorded {} ({})",
                expense,
                couple.member_name(expense.paid_by).unwrap_or("?")
            );
        }
        ExpenseCommands::List { all } => {
            let expenses = if all {
                service.list_all(couple.id)?
            } else {
                service.list_unsettled(couple.id)?
            };
            print!(
                "{}",
                format_expense_register(&expenses, &couple, &settings.currency_symbol)
            );
        }
    }

    Ok(())
}
