//! Category catalog model
//!
//! Expense categories are a small keyed catalog shared by both partners.
//! Unknown or missing keys resolve to the "other" category.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::expense::DEFAULT_CATEGORY_KEY;

/// A budget category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable key expenses reference ("groceries", "dining", ...)
    pub key: String,

    /// Display name
    pub name: String,

    /// Emoji icon for terminal display
    pub icon: String,

    /// Sort order for display
    pub sort_order: i32,
}

impl Category {
    /// Create a new category
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        sort_order: i32,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            icon: icon.into(),
            sort_order,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon, self.name)
    }
}

/// Keyed lookup over the category catalog
#[derive(Debug, Clone, Default)]
pub struct CategoryCatalog {
    by_key: BTreeMap<String, Category>,
}

impl CategoryCatalog {
    /// Build a catalog from a list of categories
    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            by_key: categories.into_iter().map(|c| (c.key.clone(), c)).collect(),
        }
    }

    /// Look up a category by key
    pub fn get(&self, key: &str) -> Option<&Category> {
        self.by_key.get(key)
    }

    /// Whether a key names a known category
    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Resolve an optional expense category key to a known key,
    /// falling back to "other" for absent or unknown keys
    pub fn resolve_key<'a>(&self, key: Option<&'a str>) -> &'a str {
        match key {
            Some(k) if self.by_key.contains_key(k) => k,
            _ => DEFAULT_CATEGORY_KEY,
        }
    }

    /// Display name for a key, falling back to the key itself
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.by_key.get(key).map(|c| c.name.as_str()).unwrap_or(key)
    }

    /// All categories in display order
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        let mut categories: Vec<&Category> = self.by_key.values().collect();
        categories.sort_by_key(|c| c.sort_order);
        categories.into_iter()
    }

    /// Number of categories in the catalog
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether the catalog has no categories
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// The default catalog seeded on first initialization
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("groceries", "Groceries", "\u{1F6D2}", 0),
        Category::new("dining", "Dining Out", "\u{1F37D}", 1),
        Category::new("transport", "Transport", "\u{1F68C}", 2),
        Category::new("utilities", "Utilities", "\u{1F4A1}", 3),
        Category::new("entertainment", "Entertainment", "\u{1F3AC}", 4),
        Category::new("travel", "Travel", "\u{2708}", 5),
        Category::new("health", "Health", "\u{1FA7A}", 6),
        Category::new("home", "Home", "\u{1F3E0}", 7),
        Category::new(DEFAULT_CATEGORY_KEY, "Other", "\u{1F4E6}", 8),
    ]
}
