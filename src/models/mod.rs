//! Core data models for Splitpenny
//!
//! This module contains all the data structures that represent the
//! shared-expense domain: couples, expenses, settlements, categories,
//! and budgets.

pub mod budget;
pub mod category;
pub mod couple;
pub mod expense;
pub mod ids;
pub mod money;
pub mod settlement;

pub use budget::Budget;
pub use category::{default_categories, Category, CategoryCatalog};
pub use couple::Couple;
pub use expense::{Expense, SplitDetails, DEFAULT_CATEGORY_KEY};
pub use ids::{CoupleId, ExpenseId, SettlementId, UserId};
pub use settlement::{BudgetSummary, CategoryBreakdownEntry, Settlement, TopCategory};
