//! Storage layer for Splitpenny
//!
//! Provides JSON file storage with atomic writes, plus the all-or-nothing
//! settlement commit the settle-up workflow relies on.

pub mod budgets;
pub mod categories;
pub mod couples;
pub mod expenses;
pub mod file_io;
pub mod settlements;

pub use budgets::BudgetRepository;
pub use categories::CategoryRepository;
pub use couples::CoupleRepository;
pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use settlements::SettlementRepository;

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::SplitpennyPaths;
use crate::error::{SplitpennyError, SplitpennyResult};
use crate::models::{Couple, Expense, ExpenseId, Settlement, SettlementId};

/// One expense update applied by a settlement commit
///
/// `settled_at` and `settlement_id` are stamped onto the expense together;
/// there is no way to apply one without the other.
#[derive(Debug, Clone, Copy)]
pub struct ExpenseStamp {
    pub expense_id: ExpenseId,
    pub settled_at: DateTime<Utc>,
    pub settlement_id: SettlementId,
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: SplitpennyPaths,
    pub couples: CoupleRepository,
    pub expenses: ExpenseRepository,
    pub settlements: SettlementRepository,
    pub categories: CategoryRepository,
    pub budgets: BudgetRepository,
    pub audit: AuditLogger,
    /// Serializes settlement commits: at most one writer per process
    commit_lock: Mutex<()>,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: SplitpennyPaths) -> Result<Self, SplitpennyError> {
        // Ensure directories exist
        paths.ensure_directories()?;

        Ok(Self {
            couples: CoupleRepository::new(paths.couples_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            settlements: SettlementRepository::new(paths.settlements_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
            commit_lock: Mutex::new(()),
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &SplitpennyPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), SplitpennyError> {
        self.couples.load()?;
        self.expenses.load()?;
        self.settlements.load()?;
        self.categories.load()?;
        self.budgets.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), SplitpennyError> {
        self.couples.save()?;
        self.expenses.save()?;
        self.settlements.save()?;
        self.categories.save()?;
        self.budgets.save()?;
        Ok(())
    }

    /// Check if storage has been initialized (has any data)
    pub fn is_initialized(&self) -> bool {
        self.paths.settings_file().exists()
    }

    /// Log a create operation to the audit log
    pub fn log_create<T: serde::Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        after: &T,
    ) -> SplitpennyResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, after)?)
    }

    /// Log an update operation to the audit log
    pub fn log_update<T: serde::Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        summary: Option<String>,
    ) -> SplitpennyResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            summary,
        )?)
    }

    /// Atomically commit a settlement
    ///
    /// Applies, as a single all-or-nothing operation:
    /// - insertion of the settlement record,
    /// - the settled stamp on every expense in `stamps`,
    /// - the couple's `last_settlement_at` marker.
    ///
    /// Every stamped expense must exist, belong to the settlement's couple,
    /// and still be unsettled; a concurrent settle-up that already claimed
    /// one of them makes this commit fail with [`SplitpennyError::SettlementCommitFailed`]
    /// and prior state fully intact. Commits are serialized per process by
    /// an internal lock.
    pub fn commit_settlement(
        &self,
        settlement: Settlement,
        stamps: &[ExpenseStamp],
    ) -> SplitpennyResult<Settlement> {
        let _guard = self
            .commit_lock
            .lock()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire commit lock: {}", e)))?;

        // Validate everything up front, before any mutation
        let prior_couple = self
            .couples
            .get(settlement.couple_id)?
            .ok_or_else(|| SplitpennyError::couple_not_found(settlement.couple_id.to_string()))?;

        let mut prior_expenses: Vec<Expense> = Vec::with_capacity(stamps.len());
        for stamp in stamps {
            let expense = self.expenses.get(stamp.expense_id)?.ok_or_else(|| {
                SplitpennyError::SettlementCommitFailed(format!(
                    "expense {} no longer exists",
                    stamp.expense_id
                ))
            })?;
            if expense.couple_id != settlement.couple_id {
                return Err(SplitpennyError::SettlementCommitFailed(format!(
                    "expense {} belongs to another couple",
                    stamp.expense_id
                )));
            }
            if expense.is_settled() {
                return Err(SplitpennyError::SettlementCommitFailed(format!(
                    "expense {} was already settled",
                    stamp.expense_id
                )));
            }
            prior_expenses.push(expense);
        }

        // Apply in memory
        self.settlements.insert(settlement.clone())?;
        for (stamp, prior) in stamps.iter().zip(&prior_expenses) {
            let mut updated = prior.clone();
            updated.mark_settled(stamp.settled_at, stamp.settlement_id);
            self.expenses.upsert(updated)?;
        }
        let mut updated_couple = prior_couple.clone();
        updated_couple.record_settlement(settlement.settled_at);
        self.couples.upsert(updated_couple)?;

        // Persist; on any failure restore memory and disk to the prior state
        if let Err(err) = self
            .settlements
            .save()
            .and_then(|_| self.expenses.save())
            .and_then(|_| self.couples.save())
        {
            self.rollback_settlement(&settlement, &prior_expenses, &prior_couple);
            return Err(SplitpennyError::SettlementCommitFailed(err.to_string()));
        }

        Ok(settlement)
    }

    /// Undo an in-memory settlement commit and re-persist the restored state
    fn rollback_settlement(
        &self,
        settlement: &Settlement,
        prior_expenses: &[Expense],
        prior_couple: &Couple,
    ) {
        let restore = || -> SplitpennyResult<()> {
            self.settlements.remove(settlement.id)?;
            for prior in prior_expenses {
                self.expenses.upsert(prior.clone())?;
            }
            self.couples.upsert(prior_couple.clone())?;
            self.settlements.save()?;
            self.expenses.save()?;
            self.couples.save()?;
            Ok(())
        };
        // A failing restore means the disk write failed twice in a row;
        // in-memory state is already back to the pre-commit snapshot.
        if let Err(err) = restore() {
            eprintln!("warning: rollback could not re-persist prior state: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetSummary, UserId};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitpennyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn seeded_couple(storage: &Storage) -> Couple {
        let couple = Couple::new("Alice", "Bob", "USD");
        storage.couples.upsert(couple.clone()).unwrap();
        storage.couples.save().unwrap();
        couple
    }

    fn unsettled_expense(couple: &Couple, amount: f64) -> Expense {
        Expense::new(
            couple.id,
            amount,
            "USD",
            couple.user1_id,
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        )
    }

    fn settlement_for(couple: &Couple, count: usize) -> Settlement {
        Settlement {
            id: SettlementId::new(),
            couple_id: couple.id,
            user1_id: couple.user1_id,
            user2_id: couple.user2_id,
            amount: 25.0,
            settled_by: couple.user2_id,
            note: String::new(),
            settled_at: Utc::now(),
            expenses_settled_count: count,
            category_breakdown: BTreeMap::new(),
            budget_summary: BudgetSummary::not_included("2025-06"),
            top_categories: Vec::new(),
            total_expenses_amount: 0.0,
            settlement_period_days: 0,
        }
    }

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitpennyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_commit_settlement_applies_everything() {
        let (_temp_dir, storage) = create_test_storage();
        let couple = seeded_couple(&storage);

        let expense = unsettled_expense(&couple, 50.0);
        let expense_id = expense.id;
        storage.expenses.upsert(expense).unwrap();
        storage.expenses.save().unwrap();

        let settlement = settlement_for(&couple, 1);
        let settled_at = settlement.settled_at;
        let stamps = [ExpenseStamp {
            expense_id,
            settled_at,
            settlement_id: settlement.id,
        }];

        let committed = storage.commit_settlement(settlement, &stamps).unwrap();

        let stored_expense = storage.expenses.get(expense_id).unwrap().unwrap();
        assert_eq!(stored_expense.settled_at, Some(settled_at));
        assert_eq!(stored_expense.settled_by_settlement_id, Some(committed.id));

        let stored_couple = storage.couples.get(couple.id).unwrap().unwrap();
        assert_eq!(stored_couple.last_settlement_at, Some(settled_at));

        assert!(storage.settlements.get(committed.id).unwrap().is_some());
    }

    #[test]
    fn test_commit_rejects_already_settled_expense() {
        let (_temp_dir, storage) = create_test_storage();
        let couple = seeded_couple(&storage);

        let mut expense = unsettled_expense(&couple, 50.0);
        expense.mark_settled(Utc::now(), SettlementId::new());
        let expense_id = expense.id;
        storage.expenses.upsert(expense).unwrap();

        let settlement = settlement_for(&couple, 1);
        let settlement_id = settlement.id;
        let stamps = [ExpenseStamp {
            expense_id,
            settled_at: settlement.settled_at,
            settlement_id,
        }];

        let err = storage.commit_settlement(settlement, &stamps).unwrap_err();
        assert!(matches!(err, SplitpennyError::SettlementCommitFailed(_)));

        // Nothing was applied
        assert!(storage.settlements.get(settlement_id).unwrap().is_none());
        let stored_couple = storage.couples.get(couple.id).unwrap().unwrap();
        assert!(stored_couple.last_settlement_at.is_none());
    }

    #[test]
    fn test_commit_rejects_foreign_expense() {
        let (_temp_dir, storage) = create_test_storage();
        let couple = seeded_couple(&storage);

        let other = Couple::new("Carol", "Dan", "USD");
        storage.couples.upsert(other.clone()).unwrap();
        let foreign = Expense::new(
            other.id,
            10.0,
            "USD",
            other.user1_id,
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        );
        let foreign_id = foreign.id;
        storage.expenses.upsert(foreign).unwrap();

        let settlement = settlement_for(&couple, 1);
        let stamps = [ExpenseStamp {
            expense_id: foreign_id,
            settled_at: settlement.settled_at,
            settlement_id: settlement.id,
        }];

        let err = storage.commit_settlement(settlement, &stamps).unwrap_err();
        assert!(matches!(err, SplitpennyError::SettlementCommitFailed(_)));

        // The foreign expense is untouched
        let stored = storage.expenses.get(foreign_id).unwrap().unwrap();
        assert!(!stored.is_settled());
    }

    #[test]
    fn test_commit_rejects_missing_couple() {
        let (_temp_dir, storage) = create_test_storage();
        let couple = Couple::new("Alice", "Bob", "USD"); // never stored

        let settlement = settlement_for(&couple, 1);
        let err = storage.commit_settlement(settlement, &[]).unwrap_err();
        assert!(err.is_not_found());
    }
}
