//! Settlement repository for JSON storage
//!
//! Settlements are append-only ledger entries; the repository exposes no
//! update path. Removal exists only for commit rollback.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitpennyError;
use crate::models::{CoupleId, Settlement, SettlementId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable settlement data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct SettlementData {
    settlements: Vec<Settlement>,
}

/// Repository for settlement persistence with a per-couple index
pub struct SettlementRepository {
    path: PathBuf,
    data: RwLock<HashMap<SettlementId, Settlement>>,
    /// Index: couple_id -> settlement_ids
    by_couple: RwLock<HashMap<CoupleId, Vec<SettlementId>>>,
}

impl SettlementRepository {
    /// Create a new settlement repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_couple: RwLock::new(HashMap::new()),
        }
    }

    /// Load settlements from disk and build the couple index
    pub fn load(&self) -> Result<(), SplitpennyError> {
        let file_data: SettlementData = read_json(&self.path)?;

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

        for settlement in file_data.settlements {
            by_couple
                .entry(settlement.couple_id)
                .or_default()
                .push(settlement.id);
            data.insert(settlement.id, settlement);
        }

        Ok(())
    }

    /// Save settlements to disk
    pub fn save(&self) -> Result<(), SplitpennyError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut settlements: Vec<_> = data.values().cloned().collect();
        settlements.sort_by(|a, b| b.settled_at.cmp(&a.settled_at));

        let file_data = SettlementData { settlements };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a settlement by ID
    pub fn get(&self, id: SettlementId) -> Result<Option<Settlement>, SplitpennyError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all settlements for a couple, newest first
    pub fn get_by_couple(&self, couple_id: CoupleId) -> Result<Vec<Settlement>, SplitpennyError> {
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
        let mut settlements: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        settlements.sort_by(|a, b| b.settled_at.cmp(&a.settled_at));
        Ok(settlements)
    }

    /// The most recent settlement for a couple, if any
    pub fn latest_for_couple(
        &self,
        couple_id: CoupleId,
    ) -> Result<Option<Settlement>, SplitpennyError> {
        Ok(self.get_by_couple(couple_id)?.into_iter().next())
    }

    /// Insert a settlement
    pub fn insert(&self, settlement: Settlement) -> Result<(), SplitpennyError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_couple = self
            .by_couple
            .write()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        by_couple
            .entry(settlement.couple_id)
            .or_default()
            .push(settlement.id);
        data.insert(settlement.id, settlement);
        Ok(())
    }

    /// Remove a settlement; used only to roll back a failed commit
    pub(crate) fn remove(&self, id: SettlementId) -> Result<(), SplitpennyError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_couple = self
            .by_couple
            .write()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(settlement) = data.remove(&id) {
            if let Some(ids) = by_couple.get_mut(&settlement.couple_id) {
                ids.retain(|&sid| sid != id);
            }
        }
        Ok(())
    }

    /// Count settlements
    pub fn count(&self) -> Result<usize, SplitpennyError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetSummary, UserId};
    use chrono::{Duration, Utc};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, SettlementRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settlements.json");
        let repo = SettlementRepository::new(path);
        (temp_dir, repo)
    }

    fn test_settlement(couple_id: CoupleId, days_ago: i64) -> Settlement {
        let user1_id = UserId::new();
        let user2_id = UserId::new();
        Settlement {
            id: SettlementId::new(),
            couple_id,
            user1_id,
            user2_id,
            amount: 10.0,
            settled_by: user1_id,
            note: String::new(),
            settled_at: Utc::now() - Duration::days(days_ago),
            expenses_settled_count: 1,
            category_breakdown: BTreeMap::new(),
            budget_summary: BudgetSummary::not_included("2025-06"),
            top_categories: Vec::new(),
            total_expenses_amount: 10.0,
            settlement_period_days: 0,
        }
    }

    #[test]
    fn test_latest_for_couple() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let couple_id = CoupleId::new();
        let older = test_settlement(couple_id, 30);
        let newer = test_settlement(couple_id, 2);
        repo.insert(older).unwrap();
        repo.insert(newer.clone()).unwrap();
        repo.insert(test_settlement(CoupleId::new(), 0)).unwrap();

        let latest = repo.latest_for_couple(couple_id).unwrap().unwrap();
        assert_eq!(latest.id, newer.id);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let settlement = test_settlement(CoupleId::new(), 0);
        let id = settlement.id;
        repo.insert(settlement).unwrap();
        repo.save().unwrap();

        let repo2 = SettlementRepository::new(temp_dir.path().join("settlements.json"));
        repo2.load().unwrap();
        assert!(repo2.get(id).unwrap().is_some());
    }

    #[test]
    fn test_remove_for_rollback() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let couple_id = CoupleId::new();
        let settlement = test_settlement(couple_id, 0);
        let id = settlement.id;
        repo.insert(settlement).unwrap();
        repo.remove(id).unwrap();

        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.latest_for_couple(couple_id).unwrap().is_none());
    }
}
