//! Audit logging system for Splitpenny
//!
//! Records create and update operations with before/after values in an
//! append-only audit log. Entries are line-delimited JSON (JSONL); a
//! settlement commit writes its whole batch in one append.

pub mod entry;
pub mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
