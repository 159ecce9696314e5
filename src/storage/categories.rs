//! Category repository for JSON storage
//!
//! The catalog is seeded once by an explicit `CategoryService::ensure_initialized`
//! call; reads never mutate it.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitpennyError;
use crate::models::{Category, CategoryCatalog};

use super::file_io::{read_json, write_json_atomic};

/// Serializable category data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CategoryData {
    categories: Vec<Category>,
}

/// Repository for the category catalog
pub struct CategoryRepository {
    path: PathBuf,
    data: RwLock<Vec<Category>>,
}

impl CategoryRepository {
    /// Create a new category repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load the catalog from disk
    pub fn load(&self) -> Result<(), SplitpennyError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = file_data.categories;
        Ok(())
    }

    /// Save the catalog to disk
    pub fn save(&self) -> Result<(), SplitpennyError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = CategoryData {
            categories: data.clone(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// All categories, in stored order
    pub fn get_all(&self) -> Result<Vec<Category>, SplitpennyError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.clone())
    }

    /// Build a keyed catalog over the stored categories
    pub fn catalog(&self) -> Result<CategoryCatalog, SplitpennyError> {
        Ok(CategoryCatalog::from_categories(self.get_all()?))
    }

    /// Whether the catalog has been seeded
    pub fn is_empty(&self) -> Result<bool, SplitpennyError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.is_empty())
    }

    /// Replace the entire catalog (used by seeding)
    pub fn replace_all(&self, categories: Vec<Category>) -> Result<(), SplitpennyError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| SplitpennyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = categories;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_categories;
    use tempfile::TempDir;

    #[test]
    fn test_seed_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.json");

        let repo = CategoryRepository::new(path.clone());
        repo.load().unwrap();
        assert!(repo.is_empty().unwrap());

        repo.replace_all(default_categories()).unwrap();
        repo.save().unwrap();

        let repo2 = CategoryRepository::new(path);
        repo2.load().unwrap();
        assert!(!repo2.is_empty().unwrap());
        assert!(repo2.catalog().unwrap().contains("groceries"));
    }
}
