//! Expense repository for JSON storage
//!
//! Manages loading and saving expenses to expenses.json, indexed by couple.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitpennyError;
use crate::models::{CoupleId, Expense, ExpenseId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable expense data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Repository for expense persistence with a per-couple index
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
    /// Index: couple_id -> expense_ids
    by_couple: RwLock<HashMap<CoupleId, Vec<ExpenseId>>>,
}

impl ExpenseRepository {
    /// Create a new expense repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_couple: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk and build the couple index
    pub fn load(&self) -> Result<(), SplitpennyError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_couple = self
            .by_couple
            .write()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_couple.clear();

        for expense in file_data.expenses {
            by_couple
                .entry(expense.couple_id)
                .or_default()
                .push(expense.id);
            data.insert(expense.id, expense);
        }

        Ok(())
    }

    /// Save expenses to disk
    pub fn save(&self) -> Result<(), SplitpennyError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        let file_data = ExpenseData { expenses };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, SplitpennyError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all expenses for a couple, newest first
    pub fn get_by_couple(&self, couple_id: CoupleId) -> Result<Vec<Expense>, SplitpennyError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_couple = self
            .by_couple
            .read()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_couple
            .get(&couple_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut expenses: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(expenses)
    }

    /// Get a couple's unsettled expenses, newest first
    pub fn get_unsettled_by_couple(
        &self,
        couple_id: CoupleId,
    ) -> Result<Vec<Expense>, SplitpennyError> {
        Ok(self
            .get_by_couple(couple_id)?
            .into_iter()
            .filter(|e| !e.is_settled())
            .collect())
    }

    /// Insert or update an expense
    pub fn upsert(&self, expense: Expense) -> Result<(), SplitpennyError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_couple = self
            .by_couple
            .write()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        // Remove from the old index entry if the couple changed
        if let Some(old) = data.get(&expense.id) {
            if old.couple_id != expense.couple_id {
                if let Some(ids) = by_couple.get_mut(&old.couple_id) {
                    ids.retain(|&id| id != expense.id);
                }
            }
        }

        let index = by_couple.entry(expense.couple_id).or_default();
        if !index.contains(&expense.id) {
            index.push(expense.id);
        }

        data.insert(expense.id, expense);
        Ok(())
    }

    /// Count expenses
    pub fn count(&self) -> Result<usize, SplitpennyError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
