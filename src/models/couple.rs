//! Couple profile model
//!
//! A couple has exactly two fixed roles: user1 is the partner who initiated
//! pairing, user2 is the other. All expense splits and balance signs are
//! expressed in terms of these roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CoupleId, UserId};

/// A couple sharing expenses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Couple {
    /// Unique identifier
    pub id: CoupleId,

    /// The partner who initiated pairing
    pub user1_id: UserId,

    /// The other partner
    pub user2_id: UserId,

    /// Display name for user1
    pub user1_name: String,

    /// Display name for user2
    pub user2_name: String,

    /// ISO currency code all balances are kept in
    pub primary_currency: String,

    /// When the couple last settled up; None before the first settlement
    pub last_settlement_at: Option<DateTime<Utc>>,

    /// When the couple was created
    pub created_at: DateTime<Utc>,

    /// When the couple was last modified
    pub updated_at: DateTime<Utc>,
}

impl Couple {
    /// Create a new couple with fresh role IDs
    pub fn new(
        user1_name: impl Into<String>,
        user2_name: impl Into<String>,
        primary_currency: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CoupleId::new(),
            user1_id: UserId::new(),
            user2_id: UserId::new(),
            user1_name: user1_name.into(),
            user2_name: user2_name.into(),
            primary_currency: primary_currency.into(),
            last_settlement_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether a user ID belongs to this couple
    pub fn has_member(&self, user_id: UserId) -> bool {
        user_id == self.user1_id || user_id == self.user2_id
    }

    /// Get the display name for one of the couple's members
    pub fn member_name(&self, user_id: UserId) -> Option<&str> {
        if user_id == self.user1_id {
            Some(&self.user1_name)
        } else if user_id == self.user2_id {
            Some(&self.user2_name)
        } else {
            None
        }
    }

    /// Record a settlement timestamp (written only by the settlement commit)
    pub fn record_settlement(&mut self, settled_at: DateTime<Utc>) {
        self.last_settlement_at = Some(settled_at);
        self.updated_at = Utc::now();
    }

    /// Validate the couple profile
    pub fn validate(&self) -> Result<(), CoupleValidationError> {
        if self.user1_id == self.user2_id {
            return Err(CoupleValidationError::DuplicateMember);
        }
        if self.user1_name.trim().is_empty() || self.user2_name.trim().is_empty() {
            return Err(CoupleValidationError::EmptyName);
        }
        Ok(())
    }
}

impl fmt::Display for Couple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} & {}", self.user1_name, self.user2_name)
    }
}

/// Validation errors for couple profiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoupleValidationError {
    DuplicateMember,
    EmptyName,
}

impl fmt::Display for CoupleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateMember => write!(f, "A couple needs two distinct members"),
            Self::EmptyName => write!(f, "Partner names cannot be empty"),
        }
    }
}

impl std::error::Error for CoupleValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_couple() {
        let couple = Couple::new("Alice", "Bob", "USD");
        assert_ne!(couple.user1_id, couple.user2_id);
        assert!(couple.last_settlement_at.is_none());
        assert!(couple.validate().is_ok());
    }

    #[test]
    fn test_member_lookup() {
        let couple = Couple::new("Alice", "Bob", "USD");
        assert!(couple.has_member(couple.user1_id));
        assert!(couple.has_member(couple.user2_id));
        assert!(!couple.has_member(UserId::new()));

        assert_eq!(couple.member_name(couple.user1_id), Some("Alice"));
        assert_eq!(couple.member_name(couple.user2_id), Some("Bob"));
        assert_eq!(couple.member_name(UserId::new()), None);
    }

    #[test]
    fn test_record_settlement() {
        let mut couple = Couple::new("Alice", "Bob", "USD");
        let at = Utc::now();
        couple.record_settlement(at);
        assert_eq!(couple.last_settlement_at, Some(at));
    }

    #[test]
    fn test_validate_empty_name() {
        let couple = Couple::new("  ", "Bob", "USD");
        assert_eq!(couple.validate(), Err(CoupleValidationError::EmptyName));
    }
}
