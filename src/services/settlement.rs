//! Settlement service
//!
//! Implements the settle-up workflow: filter the unsettled batch, compute
//! the analytics that get frozen into the settlement record (category
//! breakdown, budget summary, top categories, period length), and commit
//! everything atomically.

use chrono::{Duration, Utc};
use std::collections::BTreeMap;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{SplitpennyError, SplitpennyResult};
use crate::models::money::is_well_formed;
use crate::models::{
    Budget, BudgetSummary, CategoryBreakdownEntry, CategoryCatalog, Couple, CoupleId, Expense,
    Settlement, SettlementId, TopCategory, UserId,
};
use crate::services::balance::calculate_balance;
use crate::storage::{ExpenseStamp, Storage};

/// How many top-spending categories a settlement ranks by default
pub const DEFAULT_TOP_CATEGORIES_LIMIT: usize = 3;

/// Inputs for creating a settlement
#[derive(Debug, Clone)]
pub struct CreateSettlement<'a> {
    pub couple_id: CoupleId,
    pub user1_id: UserId,
    pub user2_id: UserId,
    /// Absolute amount transferred by `settled_by`
    pub amount: f64,
    /// Which partner performed the payment
    pub settled_by: UserId,
    pub note: String,
    /// Candidate expenses; only the unsettled ones are closed
    pub expenses: Vec<Expense>,
    /// Catalog used to resolve category keys and display names
    pub categories: &'a CategoryCatalog,
    /// The couple's budget for the current period, if configured
    pub current_budget: Option<Budget>,
    /// Ranking size for `top_categories`
    pub top_categories_limit: usize,
}

/// Service for the settle-up workflow
pub struct SettlementService<'a> {
    storage: &'a Storage,
}

impl<'a> SettlementService<'a> {
    /// Create a new settlement service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a settlement and close out the unsettled batch
    ///
    /// Fails with [`SplitpennyError::NoUnsettledExpenses`] before any write
    /// when the candidate list holds nothing to settle. A failure during the
    /// commit leaves prior state entirely unchanged and surfaces as
    /// [`SplitpennyError::SettlementCommitFailed`]; the caller may retry the
    /// whole operation, which re-runs this precondition.
    pub fn create_settlement(&self, params: CreateSettlement<'_>) -> SplitpennyResult<Settlement> {
        if !is_well_formed(params.amount) || params.amount < 0.0 {
            return Err(SplitpennyError::InvalidAmount(format!(
                "settlement amount must be a non-negative number, got {}",
                params.amount
            )));
        }
        if params.settled_by != params.user1_id && params.settled_by != params.user2_id {
            return Err(SplitpennyError::Validation(
                "settled_by must be one of the couple's two members".to_string(),
            ));
        }

        // Step 1: the unsettled batch; a hard precondition, checked before
        // any write is attempted
        let unsettled: Vec<Expense> = params
            .expenses
            .iter()
            .filter(|e| !e.is_settled())
            .cloned()
            .collect();
        if unsettled.is_empty() {
            return Err(SplitpennyError::NoUnsettledExpenses);
        }

        let couple = self
            .storage
            .couples
            .get(params.couple_id)?
            .ok_or_else(|| SplitpennyError::couple_not_found(params.couple_id.to_string()))?;

        // Steps 2-5: analytics frozen into the settlement record
        let category_breakdown = build_category_breakdown(
            &unsettled,
            params.user1_id,
            params.user2_id,
            params.categories,
        );
        let total_expenses_amount: f64 = category_breakdown
            .values()
            .map(|entry| entry.total_amount)
            .sum();
        let budget_summary = build_budget_summary(&unsettled, params.current_budget.as_ref());
        let top_categories = rank_top_categories(
            &category_breakdown,
            params.categories,
            params.top_categories_limit,
        );
        let settled_at = next_settlement_timestamp(&couple);
        let settlement_period_days = settlement_period_days(&couple, settled_at);

        let settlement = Settlement {
            id: SettlementId::new(),
            couple_id: params.couple_id,
            user1_id: params.user1_id,
            user2_id: params.user2_id,
            amount: params.amount,
            settled_by: params.settled_by,
            note: params.note,
            settled_at,
            expenses_settled_count: unsettled.len(),
            category_breakdown,
            budget_summary,
            top_categories,
            total_expenses_amount,
            settlement_period_days,
        };

        // Step 6: all-or-nothing commit
        let stamps: Vec<ExpenseStamp> = unsettled
            .iter()
            .map(|expense| ExpenseStamp {
                expense_id: expense.id,
                settled_at,
                settlement_id: settlement.id,
            })
            .collect();
        let committed = self.storage.commit_settlement(settlement, &stamps)?;

        // The commit is durable at this point; a failed audit write must not
        // read as a failed settlement
        if let Err(err) = self.log_settlement(&committed, &unsettled) {
            eprintln!("warning: failed to write audit log: {}", err);
        }

        Ok(committed)
    }

    /// Settle the couple's current balance over their unsettled expenses
    ///
    /// Convenience wrapper that assembles the inputs from storage: the
    /// amount is the absolute current balance and `settled_by` defaults to
    /// the partner who owes it.
    pub fn settle_up(
        &self,
        couple_id: CoupleId,
        settled_by: Option<UserId>,
        note: String,
        top_categories_limit: usize,
    ) -> SplitpennyResult<Settlement> {
        let couple = self
            .storage
            .couples
            .get(couple_id)?
            .ok_or_else(|| SplitpennyError::couple_not_found(couple_id.to_string()))?;

        let expenses = self.storage.expenses.get_unsettled_by_couple(couple_id)?;
        let balance = calculate_balance(&expenses, couple.user1_id, couple.user2_id);

        // Positive balance: user2 owes and is the default payer
        let debtor = if balance >= 0.0 {
            couple.user2_id
        } else {
            couple.user1_id
        };

        self.create_settlement(CreateSettlement {
            couple_id,
            user1_id: couple.user1_id,
            user2_id: couple.user2_id,
            amount: balance.abs(),
            settled_by: settled_by.unwrap_or(debtor),
            note,
            expenses,
            categories: &self.storage.categories.catalog()?,
            current_budget: self
                .storage
                .budgets
                .get(couple_id, &crate::models::budget::month_label(Utc::now().date_naive()))?,
            top_categories_limit,
        })
    }

    fn log_settlement(&self, settlement: &Settlement, closed: &[Expense]) -> SplitpennyResult<()> {
        let mut entries = vec![AuditEntry::create(
            EntityType::Settlement,
            settlement.id.to_string(),
            Some(format!(
                "{} expenses, {:.2}",
                settlement.expenses_settled_count, settlement.amount
            )),
            settlement,
        )?];
        for expense in closed {
            entries.push(AuditEntry::update(
                EntityType::Expense,
                expense.id.to_string(),
                None,
                &serde_json::json!({ "settled_at": null }),
                &serde_json::json!({
                    "settled_at": settlement.settled_at,
                    "settled_by_settlement_id": settlement.id,
                }),
                Some("settled".to_string()),
            )?);
        }
        self.storage.audit.log_batch(&entries)
    }
}

/// Group the batch by category, with payer-aware per-partner attribution
///
/// Each expense's shares are taken from its split details (half/half when
/// absent), and always land on the breakdown field of the role that owes
/// them: `user1_amount` accumulates user1's responsibility, never simply
/// "the payer's" share. An expense paid by neither partner is split evenly
/// across both fields.
fn build_category_breakdown(
    expenses: &[Expense],
    user1_id: UserId,
    user2_id: UserId,
    categories: &CategoryCatalog,
) -> BTreeMap<String, CategoryBreakdownEntry> {
    let mut breakdown: BTreeMap<String, CategoryBreakdownEntry> = BTreeMap::new();

    for expense in expenses {
        let amount = expense.effective_amount();
        if !is_well_formed(amount) {
            continue;
        }

        let key = categories.resolve_key(expense.category_key.as_deref());
        let entry = breakdown.entry(key.to_string()).or_default();

        entry.total_amount += amount;
        entry.expense_count += 1;

        if expense.paid_by == user1_id || expense.paid_by == user2_id {
            let (user1_share, user2_share) = expense.shares();
            entry.user1_amount += user1_share;
            entry.user2_amount += user2_share;
        } else {
            // Unknown payer: split the amount evenly as a safety net
            entry.user1_amount += amount / 2.0;
            entry.user2_amount += amount / 2.0;
        }
    }

    breakdown
}

/// Snapshot budget-vs-spend for the batch
fn build_budget_summary(expenses: &[Expense], budget: Option<&Budget>) -> BudgetSummary {
    let current_month = crate::models::budget::month_label(Utc::now().date_naive());

    let budget = match budget {
        Some(budget) if budget.enabled => budget,
        _ => return BudgetSummary::not_included(current_month),
    };

    let total_budget = budget.total_budget();
    let total_spent: f64 = expenses
        .iter()
        .map(Expense::effective_amount)
        .filter(|amount| is_well_formed(*amount))
        .sum();

    BudgetSummary {
        included_in_budget: true,
        total_budget,
        total_spent,
        budget_remaining: total_budget - total_spent,
        month_year: budget.month_year.clone(),
    }
}

/// Rank breakdown entries by spend, descending
fn rank_top_categories(
    breakdown: &BTreeMap<String, CategoryBreakdownEntry>,
    categories: &CategoryCatalog,
    limit: usize,
) -> Vec<TopCategory> {
    let mut ranked: Vec<TopCategory> = breakdown
        .iter()
        .map(|(key, entry)| TopCategory {
            key: key.clone(),
            name: categories.display_name(key).to_string(),
            total_amount: entry.total_amount,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.total_amount
            .partial_cmp(&a.total_amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(limit);
    ranked
}

/// Commit timestamp, kept monotonically increasing per couple
fn next_settlement_timestamp(couple: &Couple) -> chrono::DateTime<Utc> {
    let now = Utc::now();
    match couple.last_settlement_at {
        Some(last) if now <= last => last + Duration::milliseconds(1),
        _ => now,
    }
}

/// Whole days since the couple's previous settlement, 0 for the first
fn settlement_period_days(couple: &Couple, settled_at: chrono::DateTime<Utc>) -> i64 {
    match couple.last_settlement_at {
        Some(last) => (settled_at - last).num_days().max(0),
        None => 0,
    }
}
