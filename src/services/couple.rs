//! Couple service
//!
//! Creates and looks up the couple profile. A single install tracks one
//! couple; the profile's `last_settlement_at` marker is written only by the
//! settlement commit.

use crate::audit::EntityType;
use crate::error::{SplitpennyError, SplitpennyResult};
use crate::models::{Couple, CoupleId};
use crate::storage::Storage;

/// Service for couple profile operations
pub struct CoupleService<'a> {
    storage: &'a Storage,
}

impl<'a> CoupleService<'a> {
    /// Create a new couple service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create the couple profile
    pub fn create(
        &self,
        user1_name: impl Into<String>,
        user2_name: impl Into<String>,
        primary_currency: impl Into<String>,
    ) -> SplitpennyResult<Couple> {
        if let Some(existing) = self.storage.couples.first()? {
            return Err(SplitpennyError::Duplicate {
                entity_type: "Couple",
                identifier: existing.to_string(),
            });
        }

        let couple = Couple::new(user1_name, user2_name, primary_currency);
        couple
            .validate()
            .map_err(|e| SplitpennyError::Validation(e.to_string()))?;

        self.storage.couples.upsert(couple.clone())?;
        self.storage.couples.save()?;

        self.storage.log_create(
            EntityType::Couple,
            couple.id.to_string(),
            Some(couple.to_string()),
            &couple,
        )?;

        Ok(couple)
    }

    /// Get a couple by ID
    pub fn get(&self, id: CoupleId) -> SplitpennyResult<Couple> {
        self.storage
            .couples
            .get(id)?
            .ok_or_else(|| SplitpennyError::couple_not_found(id.to_string()))
    }

    /// The install's couple profile, failing when none has been created
    pub fn require_current(&self) -> SplitpennyResult<Couple> {
        self.storage
            .couples
            .first()?
            .ok_or_else(|| SplitpennyError::couple_not_found("run 'splitpenny init' first"))
    }
}
