//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the
//! clap argument parsing with the service layer.

pub mod balance;
pub mod budget;
pub mod category;
pub mod expense;
pub mod settle;

pub use balance::handle_balance_command;
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use settle::{handle_settle_command, handle_settlement_command, SettlementCommands};

use clap::ValueEnum;

use crate::models::{Couple, UserId};
use crate::services::PayerRole;

/// Which partner, as named on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PayerArg {
    /// The partner who ran `splitpenny init`
    You,
    /// The other partner
    Partner,
}

impl PayerArg {
    /// Resolve against the couple's fixed roles
    pub fn user_id(self, couple: &Couple) -> UserId {
        match self {
            Self::You => couple.user1_id,
            Self::Partner => couple.user2_id,
        }
    }
}

impl From<PayerArg> for PayerRole {
    fn from(arg: PayerArg) -> Self {
        match arg {
            PayerArg::You => PayerRole::You,
            PayerArg::Partner => PayerRole::Partner,
        }
    }
}
