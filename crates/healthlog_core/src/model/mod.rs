//! Domain model for the health log categories.
//!
//! # Responsibility
//! - Define canonical records for fluid intake, mood log and user profile.
//! - Own the text codecs for dates and timestamps stored as SQLite TEXT.
//!
//! # Invariants
//! - Every stored record is identified by a store-assigned `EntryId`.
//! - Ids are unique within one category and never reused after delete.
//! - Deletion is permanent; no tombstones or prior versions are kept.

pub mod category;
pub mod fluid;
pub mod mood;
pub mod profile;
pub mod time;

pub use category::Category;

/// Store-assigned row id (`INTEGER PRIMARY KEY AUTOINCREMENT`).
pub type EntryId = i64;
