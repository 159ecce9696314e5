//! Monthly budget model
//!
//! A couple can configure per-category budgets for a month. The settlement
//! workflow snapshots budget-vs-spend into the settlement record.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::ids::CoupleId;
use super::money::is_well_formed;

/// Per-category budget configuration for one month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// The couple this budget belongs to
    pub couple_id: CoupleId,

    /// "YYYY-MM" month label
    pub month_year: String,

    /// Whether budget tracking is enabled for this month
    pub enabled: bool,

    /// Budgeted amount per category key
    pub category_budgets: BTreeMap<String, f64>,
}

impl Budget {
    /// Create an empty, enabled budget for a month
    pub fn new(couple_id: CoupleId, month_year: impl Into<String>) -> Self {
        Self {
            couple_id,
            month_year: month_year.into(),
            enabled: true,
            category_budgets: BTreeMap::new(),
        }
    }

    /// Sum of all configured category budgets
    pub fn total_budget(&self) -> f64 {
        self.category_budgets.values().sum()
    }

    /// Set the budgeted amount for one category
    pub fn set_category_budget(&mut self, key: impl Into<String>, amount: f64) {
        self.category_budgets.insert(key.into(), amount);
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        for (key, amount) in &self.category_budgets {
            if !is_well_formed(*amount) || *amount < 0.0 {
                return Err(BudgetValidationError::NegativeCategoryBudget(key.clone()));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} budget: {:.2} across {} categories",
            self.month_year,
            self.total_budget(),
            self.category_budgets.len()
        )
    }
}

/// "YYYY-MM" label for a date's month
pub fn month_label(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NegativeCategoryBudget(String),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeCategoryBudget(key) => {
                write!(f, "Budget for category '{}' cannot be negative", key)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_budget() {
        let mut budget = Budget::new(CoupleId::new(), "2025-06");
        budget.set_category_budget("groceries", 400.0);
        budget.set_category_budget("dining", 150.0);
        assert_eq!(budget.total_budget(), 550.0);
    }

    #[test]
    fn test_month_label() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert_eq!(month_label(date), "2025-06");

        let january = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(month_label(january), "2026-01");
    }

    #[test]
    fn test_validation() {
        let mut budget = Budget::new(CoupleId::new(), "2025-06");
        budget.set_category_budget("groceries", 400.0);
        assert!(budget.validate().is_ok());

        budget.set_category_budget("dining", -10.0);
        assert_eq!(
            budget.validate(),
            Err(BudgetValidationError::NegativeCategoryBudget(
                "dining".to_string()
            ))
        );
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut budget = Budget::new(CoupleId::new(), "2025-06");
        budget.set_category_budget("groceries", 400.0);

        let json = serde_json::to_string(&budget).unwrap();
        let deserialized: Budget = serde_json::from_str(&json).unwrap();
        assert_eq!(budget.month_year, deserialized.month_year);
        assert_eq!(budget.category_budgets, deserialized.category_budgets);
    }
}
