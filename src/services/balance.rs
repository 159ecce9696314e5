//! Balance engine
//!
//! Pure functions that fold expense and settlement records into a single
//! signed balance, plus a storage-backed service for the CLI.
//!
//! Sign convention: positive means user2 owes user1, negative means user1
//! owes user2, zero means the couple is settled.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SplitpennyResult;
use crate::models::money::is_well_formed;
use crate::models::{CoupleId, Expense, Settlement, UserId};
use crate::storage::Storage;

/// Default display name for user1 when none is configured
pub const DEFAULT_USER1_NAME: &str = "You";

/// Default display name for user2 when none is configured
pub const DEFAULT_USER2_NAME: &str = "Partner";

/// Fold a list of expenses into the couple's signed balance
///
/// Malformed records never fail the computation: an expense whose amounts or
/// shares are not usable numbers, or whose payer is neither partner, simply
/// contributes zero. The function applies no settled/unsettled filtering;
/// callers pass whichever expense set they want included.
pub fn calculate_balance(expenses: &[Expense], user1_id: UserId, user2_id: UserId) -> f64 {
    let mut balance = 0.0;

    for expense in expenses {
        if !is_well_formed(expense.effective_amount()) {
            continue;
        }

        let (user1_share, user2_share) = expense.shares();

        if expense.paid_by == user1_id {
            // user2 owes user1 their share of this expense
            balance += user2_share;
        } else if expense.paid_by == user2_id {
            // user1 owes user2 their share
            balance -= user1_share;
        }
        // Unknown payers contribute nothing
    }

    balance
}

/// Fold expenses and settlement history into the couple's signed balance
///
/// Settlements are adjustments on top of [`calculate_balance`]: a payment by
/// user1 raises the signed balance by the settlement amount, a payment by
/// user2 lowers it. Records from another couple, with non-positive or
/// unusable amounts, or settled by neither partner are ignored entirely.
pub fn calculate_balance_with_settlements(
    expenses: &[Expense],
    settlements: &[Settlement],
    user1_id: UserId,
    user2_id: UserId,
    couple_id: CoupleId,
) -> f64 {
    let mut balance = calculate_balance(expenses, user1_id, user2_id);

    for settlement in settlements {
        // Cross-couple records must never affect this couple's balance
        if settlement.couple_id != couple_id {
            continue;
        }
        if !is_well_formed(settlement.amount) || settlement.amount <= 0.0 {
            continue;
        }

        if settlement.settled_by == user1_id {
            balance += settlement.amount;
        } else if settlement.settled_by == user2_id {
            balance -= settlement.amount;
        }
    }

    balance
}

/// Which way the balance points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    /// user2 owes user1
    Positive,
    /// user1 owes user2
    Negative,
    /// Nobody owes anybody
    Settled,
}

impl fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Settled => write!(f, "settled"),
        }
    }
}

/// A balance described for humans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceDisplay {
    /// Absolute amount owed
    pub amount: f64,

    /// "<debtor> owes <creditor>", or the settled message
    pub text: String,

    /// Direction of the balance
    pub status: BalanceStatus,
}

/// Describe a signed balance using the partners' display names
pub fn format_balance(balance: f64, name1: &str, name2: &str) -> BalanceDisplay {
    if balance > 0.0 {
        BalanceDisplay {
            amount: balance,
            text: format!("{} owes {}", name2, name1),
            status: BalanceStatus::Positive,
        }
    } else if balance < 0.0 {
        BalanceDisplay {
            amount: balance.abs(),
            text: format!("{} owes {}", name1, name2),
            status: BalanceStatus::Negative,
        }
    } else {
        BalanceDisplay {
            amount: 0.0,
            text: "You're all settled up!".to_string(),
            status: BalanceStatus::Settled,
        }
    }
}

/// Service computing balances from stored records
pub struct BalanceService<'a> {
    storage: &'a Storage,
}

impl<'a> BalanceService<'a> {
    /// Create a new balance service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// The couple's current balance over unsettled expenses only
    ///
    /// This is the number the settle-up workflow closes out.
    pub fn current_balance(&self, couple_id: CoupleId) -> SplitpennyResult<f64> {
        let couple = self
            .storage
            .couples
            .get(couple_id)?
            .ok_or_else(|| crate::error::SplitpennyError::couple_not_found(couple_id.to_string()))?;

        let unsettled = self.storage.expenses.get_unsettled_by_couple(couple_id)?;
        Ok(calculate_balance(
            &unsettled,
            couple.user1_id,
            couple.user2_id,
        ))
    }

    /// The couple's balance over their full history: every expense ever
    /// recorded plus every settlement. Zero means the ledger is consistent.
    pub fn lifetime_balance(&self, couple_id: CoupleId) -> SplitpennyResult<f64> {
        let couple = self
            .storage
            .couples
            .get(couple_id)?
            .ok_or_else(|| crate::error::SplitpennyError::couple_not_found(couple_id.to_string()))?;

        let expenses = self.storage.expenses.get_by_couple(couple_id)?;
        let settlements = self.storage.settlements.get_by_couple(couple_id)?;
        Ok(calculate_balance_with_settlements(
            &expenses,
            &settlements,
            couple.user1_id,
            couple.user2_id,
            couple_id,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::money::amounts_equal;
    use crate::models::{BudgetSummary, SettlementId, SplitDetails};
    use chrono::{NaiveDate, Utc};
    use std::collections::BTreeMap;

    fn expense(
        couple_id: CoupleId,
        paid_by: UserId,
        amount: f64,
        split: Option<SplitDetails>,
    ) -> Expense {
        let mut expense = Expense::new(
            couple_id,
            amount,
            "USD",
            paid_by,
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        );
        expense.split_details = split;
        expense
    }

    fn settlement(
        couple_id: CoupleId,
        user1_id: UserId,
        user2_id: UserId,
        settled_by: UserId,
        amount: f64,
    ) -> Settlement {
        Settlement {
            id: SettlementId::new(),
            couple_id,
            user1_id,
            user2_id,
            amount,
            settled_by,
            note: String::new(),
            settled_at: Utc::now(),
            expenses_settled_count: 1,
            category_breakdown: BTreeMap::new(),
            budget_summary: BudgetSummary::not_included("2025-06"),
            top_categories: Vec::new(),
            total_expenses_amount: amount,
            settlement_period_days: 0,
        }
    }

    #[test]
    fn test_empty_expenses_balance_is_zero() {
        assert_eq!(calculate_balance(&[], UserId::new(), UserId::new()), 0.0);
    }

    #[test]
    fn test_user1_pays_user2_owes_their_share() {
        let couple_id = CoupleId::new();
        let (u1, u2) = (UserId::new(), UserId::new());
        let expenses = [expense(couple_id, u1, 100.0, Some(SplitDetails::new(30.0, 70.0)))];

        assert_eq!(calculate_balance(&expenses, u1, u2), 70.0);
    }

    #[test]
    fn test_user2_pays_user1_owes_their_share() {
        let couple_id = CoupleId::new();
        let (u1, u2) = (UserId::new(), UserId::new());
        let expenses = [expense(couple_id, u2, 100.0, Some(SplitDetails::new(60.0, 40.0)))];

        assert_eq!(calculate_balance(&expenses, u1, u2), -60.0);
    }

    #[test]
    fn test_missing_split_defaults_to_even() {
        let couple_id = CoupleId::new();
        let (u1, u2) = (UserId::new(), UserId::new());
        let expenses = [expense(couple_id, u1, 80.0, None)];

        assert_eq!(calculate_balance(&expenses, u1, u2), 40.0);
    }

    #[test]
    fn test_primary_currency_amount_is_preferred() {
        let couple_id = CoupleId::new();
        let (u1, u2) = (UserId::new(), UserId::new());
        let mut exp = expense(couple_id, u1, 100.0, None);
        exp.primary_currency_amount = Some(60.0);

        assert_eq!(calculate_balance(&[exp], u1, u2), 30.0);
    }

    #[test]
    fn test_unknown_payer_contributes_nothing() {
        let couple_id = CoupleId::new();
        let (u1, u2) = (UserId::new(), UserId::new());
        let expenses = [
            expense(couple_id, UserId::new(), 500.0, None),
            expense(couple_id, u1, 100.0, None),
        ];

        assert_eq!(calculate_balance(&expenses, u1, u2), 50.0);
    }

    #[test]
    fn test_malformed_record_contributes_nothing() {
        let couple_id = CoupleId::new();
        let (u1, u2) = (UserId::new(), UserId::new());
        let mut corrupt = expense(couple_id, u1, 100.0, None);
        corrupt.primary_currency_amount = Some(f64::NAN);

        let expenses = [corrupt, expense(couple_id, u1, 40.0, None)];
        assert_eq!(calculate_balance(&expenses, u1, u2), 20.0);
    }

    #[test]
    fn test_expenses_cancel_out() {
        let couple_id = CoupleId::new();
        let (u1, u2) = (UserId::new(), UserId::new());
        let expenses = [
            expense(couple_id, u1, 100.0, None),
            expense(couple_id, u2, 100.0, None),
        ];

        assert_eq!(calculate_balance(&expenses, u1, u2), 0.0);
    }

    #[test]
    fn test_settlement_by_debtor_restores_zero() {
        let couple_id = CoupleId::new();
        let (u1, u2) = (UserId::new(), UserId::new());
        // user1 paid 100, split evenly: user2 owes 50
        let expenses = [expense(couple_id, u1, 100.0, None)];
        // user2 settles the 50
        let settlements = [settlement(couple_id, u1, u2, u2, 50.0)];

        let balance =
            calculate_balance_with_settlements(&expenses, &settlements, u1, u2, couple_id);
        assert!(amounts_equal(balance, 0.0));
    }

    #[test]
    fn test_settlement_by_user1_raises_balance() {
        let couple_id = CoupleId::new();
        let (u1, u2) = (UserId::new(), UserId::new());
        let expenses = [expense(couple_id, u2, 100.0, None)]; // balance -50
        let settlements = [settlement(couple_id, u1, u2, u1, 50.0)];

        let balance =
            calculate_balance_with_settlements(&expenses, &settlements, u1, u2, couple_id);
        assert!(amounts_equal(balance, 0.0));
    }

    #[test]
    fn test_foreign_settlements_are_ignored() {
        let couple_id = CoupleId::new();
        let (u1, u2) = (UserId::new(), UserId::new());
        let expenses = [expense(couple_id, u1, 100.0, None)];
        let settlements = [
            settlement(CoupleId::new(), u1, u2, u2, 50.0), // other couple
            settlement(couple_id, u1, u2, UserId::new(), 10.0), // unknown settler
        ];

        let balance =
            calculate_balance_with_settlements(&expenses, &settlements, u1, u2, couple_id);
        assert_eq!(balance, 50.0);
    }

    #[test]
    fn test_non_positive_settlement_amounts_are_ignored() {
        let couple_id = CoupleId::new();
        let (u1, u2) = (UserId::new(), UserId::new());
        let mut zero = settlement(couple_id, u1, u2, u2, 0.0);
        zero.amount = 0.0;
        let mut nan = settlement(couple_id, u1, u2, u2, 1.0);
        nan.amount = f64::NAN;

        let balance = calculate_balance_with_settlements(&[], &[zero, nan], u1, u2, couple_id);
        assert_eq!(balance, 0.0);
    }

    #[test]
    fn test_format_positive_balance() {
        let display = format_balance(50.0, "Alice", "Bob");
        assert_eq!(display.amount, 50.0);
        assert_eq!(display.text, "Bob owes Alice");
        assert_eq!(display.status, BalanceStatus::Positive);
    }

    #[test]
    fn test_format_negative_balance() {
        let display = format_balance(-25.5, "Alice", "Bob");
        assert_eq!(display.amount, 25.5);
        assert_eq!(display.text, "Alice owes Bob");
        assert_eq!(display.status, BalanceStatus::Negative);
    }

    #[test]
    fn test_format_settled_balance() {
        let display = format_balance(0.0, "Alice", "Bob");
        assert_eq!(display.amount, 0.0);
        assert_eq!(display.text, "You're all settled up!");
        assert_eq!(display.status, BalanceStatus::Settled);
    }

    #[test]
    fn test_default_names() {
        let display = format_balance(10.0, DEFAULT_USER1_NAME, DEFAULT_USER2_NAME);
        assert_eq!(display.text, "Partner owes You");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(BalanceStatus::Positive.to_string(), "positive");
        assert_eq!(BalanceStatus::Settled.to_string(), "settled");
    }
}
