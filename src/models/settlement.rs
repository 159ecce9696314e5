//! Settlement model
//!
//! A settlement is a historical ledger entry: it records the transfer that
//! closed out a batch of expenses, together with the analytics computed at
//! creation time. Settlements are never updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::ids::{CoupleId, SettlementId, UserId};
use super::money::is_well_formed;

/// Per-category aggregation computed when a settlement is created
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryBreakdownEntry {
    /// Total effective amount spent in this category
    pub total_amount: f64,

    /// Number of expenses in this category
    pub expense_count: usize,

    /// Responsibility share attributed to user1
    pub user1_amount: f64,

    /// Responsibility share attributed to user2
    pub user2_amount: f64,
}

/// Snapshot of budget-vs-spend for the settled period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// Whether a budget was enabled when the settlement was created
    pub included_in_budget: bool,

    /// Sum of the configured category budgets
    pub total_budget: f64,

    /// Sum of the effective amounts of the settled expenses
    pub total_spent: f64,

    /// `total_budget - total_spent`
    pub budget_remaining: f64,

    /// "YYYY-MM" label of the budget month
    pub month_year: String,
}

impl BudgetSummary {
    /// The summary used when no budget is configured or it is disabled
    pub fn not_included(month_year: impl Into<String>) -> Self {
        Self {
            included_in_budget: false,
            total_budget: 0.0,
            total_spent: 0.0,
            budget_remaining: 0.0,
            month_year: month_year.into(),
        }
    }
}

/// One entry of the ranked top-spending categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCategory {
    /// Category key
    pub key: String,

    /// Display name resolved from the category catalog at creation time
    pub name: String,

    /// Total effective amount spent in the category
    pub total_amount: f64,
}

/// A settlement ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    /// Unique identifier
    pub id: SettlementId,

    /// The couple this settlement belongs to
    pub couple_id: CoupleId,

    /// Role IDs captured at creation time
    pub user1_id: UserId,
    pub user2_id: UserId,

    /// Absolute value transferred
    pub amount: f64,

    /// Which partner performed the payment; must be user1 or user2
    pub settled_by: UserId,

    /// Free-text note
    #[serde(default)]
    pub note: String,

    /// Commit timestamp, monotonically increasing per couple
    pub settled_at: DateTime<Utc>,

    /// Number of expenses closed by this settlement
    pub expenses_settled_count: usize,

    /// Per-category aggregation of the settled batch
    pub category_breakdown: BTreeMap<String, CategoryBreakdownEntry>,

    /// Budget-vs-spend snapshot for the settled period
    pub budget_summary: BudgetSummary,

    /// Ranked top-spending categories of the settled batch
    pub top_categories: Vec<TopCategory>,

    /// Sum of the effective amounts of the settled expenses
    pub total_expenses_amount: f64,

    /// Days elapsed since the couple's previous settlement (0 for the first)
    pub settlement_period_days: i64,
}

impl Settlement {
    /// Validate the settlement record
    pub fn validate(&self) -> Result<(), SettlementValidationError> {
        if !is_well_formed(self.amount) || self.amount < 0.0 {
            return Err(SettlementValidationError::InvalidAmount(self.amount));
        }
        if self.settled_by != self.user1_id && self.settled_by != self.user2_id {
            return Err(SettlementValidationError::UnknownSettler);
        }
        if self.expenses_settled_count == 0 {
            return Err(SettlementValidationError::EmptyBatch);
        }
        Ok(())
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.2} ({} expenses)",
            self.settled_at.format("%Y-%m-%d"),
            self.amount,
            self.expenses_settled_count
        )
    }
}

/// Validation errors for settlements
#[derive(Debug, Clone, PartialEq)]
pub enum SettlementValidationError {
    InvalidAmount(f64),
    UnknownSettler,
    EmptyBatch,
}

impl fmt::Display for SettlementValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount(amount) => {
                write!(f, "Settlement amount must be a non-negative number: got {}", amount)
            }
            Self::UnknownSettler => {
                write!(f, "settled_by must be one of the couple's two members")
            }
            Self::EmptyBatch => write!(f, "A settlement must close at least one expense"),
        }
    }
}

impl std::error::Error for SettlementValidationError {}
