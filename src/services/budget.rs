//! Budget service
//!
//! Manages the couple's monthly category budgets. The settlement workflow
//! reads the current month's budget to snapshot budget-vs-spend.

use chrono::Utc;

use crate::audit::EntityType;
use crate::error::{SplitpennyError, SplitpennyResult};
use crate::models::budget::month_label;
use crate::models::{Budget, CoupleId};
use crate::storage::Storage;

/// Service for budget operations
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// The label of the month budgets currently apply to
    pub fn current_month(&self) -> String {
        month_label(Utc::now().date_naive())
    }

    /// The couple's budget for the current month, if one is configured
    pub fn current_budget(&self, couple_id: CoupleId) -> SplitpennyResult<Option<Budget>> {
        self.storage.budgets.get(couple_id, &self.current_month())
    }

    /// Set one category's budget for the current month
    pub fn set_category_budget(
        &self,
        couple_id: CoupleId,
        category_key: &str,
        amount: f64,
    ) -> SplitpennyResult<Budget> {
        if !self.storage.categories.catalog()?.contains(category_key) {
            return Err(SplitpennyError::category_not_found(category_key));
        }

        let month = self.current_month();
        let mut budget = self
            .storage
            .budgets
            .get(couple_id, &month)?
            .unwrap_or_else(|| Budget::new(couple_id, month.clone()));
        let before = budget.clone();

        budget.set_category_budget(category_key, amount);
        budget
            .validate()
            .map_err(|e| SplitpennyError::Validation(e.to_string()))?;

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_update(
            EntityType::Budget,
            format!("{}/{}", couple_id, month),
            None,
            &before,
            &budget,
            Some(format!("{}: {:.2}", category_key, amount)),
        )?;

        Ok(budget)
    }

    /// Enable or disable budget tracking for the current month
    pub fn set_enabled(&self, couple_id: CoupleId, enabled: bool) -> SplitpennyResult<Budget> {
        let month = self.current_month();
        let mut budget = self
            .storage
            .budgets
            .get(couple_id, &month)?
            .unwrap_or_else(|| Budget::new(couple_id, month.clone()));
        let before = budget.clone();

        budget.enabled = enabled;

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_update(
            EntityType::Budget,
            format!("{}/{}", couple_id, month),
            None,
            &before,
            &budget,
            Some(format!("enabled: {}", enabled)),
        )?;

        Ok(budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SplitpennyPaths;
    use crate::models::default_categories;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitpennyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        storage.categories.replace_all(default_categories()).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_set_category_budget_creates_month() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let couple_id = CoupleId::new();

        assert!(service.current_budget(couple_id).unwrap().is_none());

        let budget = service
            .set_category_budget(couple_id, "groceries", 400.0)
            .unwrap();
        assert_eq!(budget.category_budgets["groceries"], 400.0);
        assert!(budget.enabled);

        let current = service.current_budget(couple_id).unwrap().unwrap();
        assert_eq!(current.total_budget(), 400.0);
    }

    #[test]
    fn test_set_unknown_category_fails() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        let err = service
            .set_category_budget(CoupleId::new(), "spelunking", 100.0)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_negative_budget_fails() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        let err = service
            .set_category_budget(CoupleId::new(), "groceries", -1.0)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_disable_and_reenable() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let couple_id = CoupleId::new();

        service
            .set_category_budget(couple_id, "groceries", 400.0)
            .unwrap();
        let disabled = service.set_enabled(couple_id, false).unwrap();
        assert!(!disabled.enabled);
        // Category amounts survive the toggle
        assert_eq!(disabled.category_budgets["groceries"], 400.0);

        assert!(service.set_enabled(couple_id, true).unwrap().enabled);
    }
}
