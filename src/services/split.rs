//! Split calculator
//!
//! Pure share math: turns an amount and a percentage allocation into the two
//! partners' monetary shares. No rounding is applied here; display code
//! rounds for currency output.

use crate::error::{SplitpennyError, SplitpennyResult};
use crate::models::money::MAX_EXPENSE_AMOUNT;

/// The two shares produced by a split, with the percentages that made them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitResult {
    pub user1_amount: f64,
    pub user2_amount: f64,
    pub user1_percentage: f64,
    pub user2_percentage: f64,
}

/// Calculate both partners' shares of an amount
///
/// `percentage2` defaults to `100 - percentage1` when omitted. Validation,
/// in order:
/// 1. the amount must be a positive number no greater than
///    [`MAX_EXPENSE_AMOUNT`],
/// 2. each percentage must lie in `[0, 100]`,
/// 3. the percentages must total exactly 100.
pub fn calculate_split(
    amount: f64,
    percentage1: f64,
    percentage2: Option<f64>,
) -> SplitpennyResult<SplitResult> {
    if !amount.is_finite() || amount <= 0.0 || amount > MAX_EXPENSE_AMOUNT {
        return Err(SplitpennyError::InvalidAmount(format!(
            "expected a positive number up to {}, got {}",
            MAX_EXPENSE_AMOUNT, amount
        )));
    }

    let percentage2 = percentage2.unwrap_or(100.0 - percentage1);

    for percentage in [percentage1, percentage2] {
        if !percentage.is_finite() || !(0.0..=100.0).contains(&percentage) {
            return Err(SplitpennyError::InvalidPercentage(format!(
                "expected a number between 0 and 100, got {}",
                percentage
            )));
        }
    }

    if percentage1 + percentage2 != 100.0 {
        return Err(SplitpennyError::PercentagesNotComplementary {
            percentage1,
            percentage2,
        });
    }

    Ok(SplitResult {
        user1_amount: amount * percentage1 / 100.0,
        user2_amount: amount * percentage2 / 100.0,
        user1_percentage: percentage1,
        user2_percentage: percentage2,
    })
}

/// Split an amount evenly between both partners
pub fn calculate_equal_split(amount: f64) -> SplitpennyResult<SplitResult> {
    calculate_split(amount, 50.0, Some(50.0))
}
