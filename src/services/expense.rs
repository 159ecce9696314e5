//! Expense service
//!
//! Business logic for recording and listing shared expenses: validation,
//! split resolution, category defaulting, and audit logging.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{SplitpennyError, SplitpennyResult};
use crate::models::{Couple, CoupleId, Expense, ExpenseId, SplitDetails, UserId};
use crate::services::split::{calculate_equal_split, calculate_split};
use crate::storage::Storage;

/// Inputs for recording an expense
#[derive(Debug, Clone)]
pub struct AddExpense {
    pub couple_id: CoupleId,
    pub amount: f64,
    pub currency: String,
    /// Amount in the couple's primary currency, when `currency` differs
    pub primary_currency_amount: Option<f64>,
    pub paid_by: UserId,
    /// user1's percentage of the split; even split when omitted
    pub user1_percentage: Option<f64>,
    pub category_key: Option<String>,
    pub description: String,
    pub date: NaiveDate,
}

/// Service for expense operations
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a new expense
    pub fn add_expense(&self, params: AddExpense) -> SplitpennyResult<Expense> {
        let couple = self
            .storage
            .couples
            .get(params.couple_id)?
            .ok_or_else(|| SplitpennyError::couple_not_found(params.couple_id.to_string()))?;

        if !couple.has_member(params.paid_by) {
            return Err(SplitpennyError::Validation(format!(
                "payer {} is not a member of this couple",
                params.paid_by
            )));
        }

        let mut expense = Expense::new(
            params.couple_id,
            params.amount,
            params.currency,
            params.paid_by,
            params.date,
        );
        expense.primary_currency_amount = params.primary_currency_amount;
        expense.description = params.description;
        expense.category_key = params.category_key;

        // Shares are computed over the effective amount, so a converted
        // expense splits its primary-currency value
        let effective = expense.effective_amount();
        let split = match params.user1_percentage {
            Some(percentage) => calculate_split(effective, percentage, None)?,
            None => calculate_equal_split(effective)?,
        };
        expense.split_details = Some(SplitDetails::new(split.user1_amount, split.user2_amount));

        expense
            .validate()
            .map_err(|e| SplitpennyError::Validation(e.to_string()))?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(format!("{} {:.2}", expense.date, expense.amount)),
            &expense,
        )?;

        Ok(expense)
    }

    /// Get one expense
    pub fn get(&self, id: ExpenseId) -> SplitpennyResult<Expense> {
        self.storage
            .expenses
            .get(id)?
            .ok_or_else(|| SplitpennyError::expense_not_found(id.to_string()))
    }

    /// All of a couple's expenses, newest first
    pub fn list_all(&self, couple_id: CoupleId) -> SplitpennyResult<Vec<Expense>> {
        self.storage.expenses.get_by_couple(couple_id)
    }

    /// The couple's open batch: expenses not yet closed by a settlement
    pub fn list_unsettled(&self, couple_id: CoupleId) -> SplitpennyResult<Vec<Expense>> {
        self.storage.expenses.get_unsettled_by_couple(couple_id)
    }

    /// Resolve "you"/"partner" role names against the couple
    pub fn resolve_payer(&self, couple: &Couple, role: PayerRole) -> UserId {
        match role {
            PayerRole::You => couple.user1_id,
            PayerRole::Partner => couple.user2_id,
        }
    }
}

/// Which partner paid, as entered on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayerRole {
    You,
    Partner,
}
