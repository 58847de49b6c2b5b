//! Date presence index for calendar marking.
//!
//! # Responsibility
//! - Derive a date -> marker map from a full scan of one category.
//! - Merge the selected-date attribute onto that map for display.
//!
//! # Invariants
//! - The index is rebuilt from scratch after every mutation and on load;
//!   it is never patched incrementally and never persisted.
//! - Rebuild cost is linear in the number of stored entries.

pub mod date_index;

pub use date_index::{DateIndex, DateMark, MarkPalette, FLUID_PALETTE, MOOD_PALETTE};
