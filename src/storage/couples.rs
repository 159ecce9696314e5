//! Couple repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitpennyError;
use crate::models::{Couple, CoupleId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable couple data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CoupleData {
    couples: Vec<Couple>,
}

/// Repository for couple persistence
pub struct CoupleRepository {
    path: PathBuf,
    data: RwLock<HashMap<CoupleId, Couple>>,
}

impl CoupleRepository {
    /// Create a new couple repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load couples from disk
    pub fn load(&self) -> Result<(), SplitpennyError> {
        let file_data: CoupleData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for couple in file_data.couples {
            data.insert(couple.id, couple);
        }

        Ok(())
    }

    /// Save couples to disk
    pub fn save(&self) -> Result<(), SplitpennyError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut couples: Vec<_> = data.values().cloned().collect();
        couples.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let file_data = CoupleData { couples };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a couple by ID
    pub fn get(&self, id: CoupleId) -> Result<Option<Couple>, SplitpennyError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get the first couple on record (a single install tracks one couple)
    pub fn first(&self) -> Result<Option<Couple>, SplitpennyError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .min_by_key(|c| c.created_at)
            .cloned())
    }

    /// Insert or update a couple
    pub fn upsert(&self, couple: Couple) -> Result<(), SplitpennyError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(couple.id, couple);
        Ok(())
    }

    /// Count couples
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
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CoupleRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("couples.json");
        let repo = CoupleRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let couple = Couple::new("Alice", "Bob", "USD");
        let id = couple.id;
        repo.upsert(couple).unwrap();

        let retrieved = repo.get(id).unwrap().unwrap();
        assert_eq!(retrieved.user1_name, "Alice");
    }

    #[test]
    fn test_first_returns_oldest() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let mut older = Couple::new("Alice", "Bob", "USD");
        older.created_at = older.created_at - chrono::Duration::days(1);
        let older_id = older.id;
        repo.upsert(older).unwrap();
        repo.upsert(Couple::new("Carol", "Dan", "EUR")).unwrap();

        assert_eq!(repo.first().unwrap().unwrap().id, older_id);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let couple = Couple::new("Alice", "Bob", "USD");
        let id = couple.id;
        repo.upsert(couple).unwrap();
        repo.save().unwrap();

        let repo2 = CoupleRepository::new(temp_dir.path().join("couples.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.get(id).unwrap().unwrap().user2_name, "Bob");
    }
}
