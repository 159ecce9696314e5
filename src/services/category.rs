//! Category service
//!
//! Owns the category catalog. The catalog is seeded by one explicit
//! `ensure_initialized` call at init time; reads never mutate state.

use crate::error::SplitpennyResult;
use crate::models::{default_categories, Category, CategoryCatalog};
use crate::storage::Storage;

/// Service for category operations
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Seed the default catalog if none exists yet
    ///
    /// Callers invoke this once during initialization; it is idempotent and
    /// the only write path into the catalog.
    pub fn ensure_initialized(&self) -> SplitpennyResult<()> {
        if self.storage.categories.is_empty()? {
            self.storage.categories.replace_all(default_categories())?;
            self.storage.categories.save()?;
        }
        Ok(())
    }

    /// All categories in display order
    pub fn list(&self) -> SplitpennyResult<Vec<Category>> {
        let mut categories = self.storage.categories.get_all()?;
        categories.sort_by_key(|c| c.sort_order);
        Ok(categories)
    }

    /// Keyed catalog for lookups
    pub fn catalog(&self) -> SplitpennyResult<CategoryCatalog> {
        self.storage.categories.catalog()
    }
}
