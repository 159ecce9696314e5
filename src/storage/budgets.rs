//! Budget repository for JSON storage
//!
//! Budgets are keyed by couple and month label.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitpennyError;
use crate::models::{Budget, CoupleId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable budget data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    budgets: Vec<Budget>,
}

/// Repository for monthly budgets
pub struct BudgetRepository {
    path: PathBuf,
    data: RwLock<HashMap<(CoupleId, String), Budget>>,
}

impl BudgetRepository {
    /// Create a new budget repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load budgets from disk
    pub fn load(&self) -> Result<(), SplitpennyError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for budget in file_data.budgets {
            data.insert((budget.couple_id, budget.month_year.clone()), budget);
        }

        Ok(())
    }

    /// Save budgets to disk
    pub fn save(&self) -> Result<(), SplitpennyError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut budgets: Vec<_> = data.values().cloned().collect();
        budgets.sort_by(|a, b| a.month_year.cmp(&b.month_year));

        let file_data = BudgetData { budgets };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get the budget for a couple and month
    pub fn get(
        &self,
        couple_id: CoupleId,
        month_year: &str,
    ) -> Result<Option<Budget>, SplitpennyError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&(couple_id, month_year.to_string())).cloned())
    }

    /// Insert or update a budget
    pub fn upsert(&self, budget: Budget) -> Result<(), SplitpennyError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert((budget.couple_id, budget.month_year.clone()), budget);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_is_scoped_by_couple_and_month() {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        repo.load().unwrap();

        let couple_id = CoupleId::new();
        let mut budget = Budget::new(couple_id, "2025-06");
        budget.set_category_budget("groceries", 400.0);
        repo.upsert(budget).unwrap();

        assert!(repo.get(couple_id, "2025-06").unwrap().is_some());
        assert!(repo.get(couple_id, "2025-07").unwrap().is_none());
        assert!(repo.get(CoupleId::new(), "2025-06").unwrap().is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");
        let repo = BudgetRepository::new(path.clone());
        repo.load().unwrap();

        let couple_id = CoupleId::new();
        repo.upsert(Budget::new(couple_id, "2025-06")).unwrap();
        repo.save().unwrap();

        let repo2 = BudgetRepository::new(path);
        repo2.load().unwrap();
        assert!(repo2.get(couple_id, "2025-06").unwrap().is_some());
    }
}
