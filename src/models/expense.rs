//! Expense model
//!
//! Represents a shared expense with a payer, per-role responsibility shares,
//! an optional primary-currency conversion, and the one-way settled stamp.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CoupleId, ExpenseId, SettlementId, UserId};
use super::money::{amounts_equal, is_well_formed, MAX_EXPENSE_AMOUNT};

/// Category key used when an expense has no recognized category
pub const DEFAULT_CATEGORY_KEY: &str = "other";

/// Monetary responsibility shares for the couple's two fixed roles
///
/// These are shares of who owes what for the expense, independent of who
/// physically paid. They must sum to the expense's effective amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitDetails {
    /// Share owed by user1 (the partner who initiated pairing)
    pub user1_amount: f64,

    /// Share owed by user2
    pub user2_amount: f64,
}

impl SplitDetails {
    /// Create split details from two shares
    pub fn new(user1_amount: f64, user2_amount: f64) -> Self {
        Self {
            user1_amount,
            user2_amount,
        }
    }

    /// An even split of the given amount
    pub fn even(amount: f64) -> Self {
        Self {
            user1_amount: amount / 2.0,
            user2_amount: amount / 2.0,
        }
    }

    /// Both shares parse as usable numbers
    pub fn is_well_formed(&self) -> bool {
        is_well_formed(self.user1_amount) && is_well_formed(self.user2_amount)
    }
}

/// A shared expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// The couple this expense belongs to; every read and write is scoped to it
    pub couple_id: CoupleId,

    /// Face value in the original currency (positive)
    pub amount: f64,

    /// ISO currency code the expense was entered in
    pub currency: String,

    /// Amount converted to the couple's primary currency, when the expense
    /// was entered in a different one. Balance and analytics math prefers
    /// this over `amount` whenever it is present.
    pub primary_currency_amount: Option<f64>,

    /// Which partner physically paid
    pub paid_by: UserId,

    /// Responsibility shares per role; even 50/50 is assumed when absent
    pub split_details: Option<SplitDetails>,

    /// Budget category key; treated as "other" when absent or unknown
    pub category_key: Option<String>,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Business date of the expense (not the creation timestamp)
    pub date: NaiveDate,

    /// Set exactly once by a successful settlement commit
    pub settled_at: Option<DateTime<Utc>>,

    /// Back-reference to the settlement that closed this expense;
    /// always written together with `settled_at`
    pub settled_by_settlement_id: Option<SettlementId>,

    /// When the expense was created
    pub created_at: DateTime<Utc>,

    /// When the expense was last modified
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new unsettled expense
    pub fn new(
        couple_id: CoupleId,
        amount: f64,
        currency: impl Into<String>,
        paid_by: UserId,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            couple_id,
            amount,
            currency: currency.into(),
            primary_currency_amount: None,
            paid_by,
            split_details: None,
            category_key: None,
            description: String::new(),
            date,
            settled_at: None,
            settled_by_settlement_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The amount all balance and analytics math uses: the primary-currency
    /// conversion when present, the face value otherwise
    pub fn effective_amount(&self) -> f64 {
        self.primary_currency_amount.unwrap_or(self.amount)
    }

    /// Per-role responsibility shares, falling back to an even split of the
    /// effective amount when split details are absent or malformed
    pub fn shares(&self) -> (f64, f64) {
        match self.split_details {
            Some(split) if split.is_well_formed() => (split.user1_amount, split.user2_amount),
            _ => {
                let half = self.effective_amount() / 2.0;
                (half, half)
            }
        }
    }

    /// Whether this expense has been closed by a settlement
    pub fn is_settled(&self) -> bool {
        self.settled_at.is_some()
    }

    /// Stamp the expense as settled
    ///
    /// Only the settlement commit calls this; `settled_at` and
    /// `settled_by_settlement_id` are always written together.
    pub fn mark_settled(&mut self, settled_at: DateTime<Utc>, settlement_id: SettlementId) {
        self.settled_at = Some(settled_at);
        self.settled_by_settlement_id = Some(settlement_id);
        self.updated_at = Utc::now();
    }

    /// Validate the expense
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if !is_well_formed(self.amount) || self.amount <= 0.0 || self.amount > MAX_EXPENSE_AMOUNT {
            return Err(ExpenseValidationError::InvalidAmount(self.amount));
        }

        if let Some(converted) = self.primary_currency_amount {
            if !is_well_formed(converted) || converted <= 0.0 {
                return Err(ExpenseValidationError::InvalidAmount(converted));
            }
        }

        if let Some(split) = &self.split_details {
            if !split.is_well_formed() || split.user1_amount < 0.0 || split.user2_amount < 0.0 {
                return Err(ExpenseValidationError::MalformedSplit);
            }
            let total = split.user1_amount + split.user2_amount;
            if !amounts_equal(total, self.effective_amount()) {
                return Err(ExpenseValidationError::SplitMismatch {
                    expense_amount: self.effective_amount(),
                    split_total: total,
                });
            }
        }

        // settled_at and settled_by_settlement_id are set and cleared together
        if self.settled_at.is_some() != self.settled_by_settlement_id.is_some() {
            return Err(ExpenseValidationError::PartialSettledStamp);
        }

        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:.2} {}",
            self.date.format("%Y-%m-%d"),
            self.currency,
            self.amount,
            self.description
        )
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseValidationError {
    InvalidAmount(f64),
    MalformedSplit,
    SplitMismatch {
        expense_amount: f64,
        split_total: f64,
    },
    PartialSettledStamp,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount(amount) => write!(
                f,
                "Expense amount must be a positive number up to {}: got {}",
                MAX_EXPENSE_AMOUNT, amount
            ),
            Self::MalformedSplit => write!(f, "Split shares must be non-negative numbers"),
            Self::SplitMismatch {
                expense_amount,
                split_total,
            } => write!(
                f,
                "Split shares ({}) do not sum to the expense amount ({})",
                split_total, expense_amount
            ),
            Self::PartialSettledStamp => write!(
                f,
                "settled_at and settled_by_settlement_id must be set together"
            ),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
