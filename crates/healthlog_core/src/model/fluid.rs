//! Fluid intake records.
//!
//! # Invariants
//! - `amount` is kept as the text the user typed; numeric interpretation
//!   happens at aggregation time and never rejects a write.
//! - The calendar day of an entry is the date portion of `timestamp`.

use super::time::{format_time_of_day, DATE_FORMAT};
use super::EntryId;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// One persisted fluid intake row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidIntakeEntry {
    pub id: EntryId,
    /// Volume in millilitres, stored as text.
    pub amount: String,
    /// Local wall-clock instant, second precision.
    pub timestamp: NaiveDateTime,
}

/// Field set for insert/update; full replacement on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidIntakeDraft {
    pub amount: String,
    pub timestamp: NaiveDateTime,
}

impl FluidIntakeDraft {
    pub fn new(amount: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            amount: amount.into(),
            timestamp,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

impl FluidIntakeEntry {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Numeric amount; anything that does not parse as a finite number is 0.
    pub fn amount_value(&self) -> f64 {
        parse_amount(&self.amount)
    }

    /// `HH:MM` used to prefill the edit form.
    pub fn time_of_day(&self) -> String {
        format_time_of_day(self.timestamp)
    }

    pub fn date_label(&self) -> String {
        self.timestamp.format(DATE_FORMAT).to_string()
    }

    pub fn to_draft(&self) -> FluidIntakeDraft {
        FluidIntakeDraft {
            amount: self.amount.clone(),
            timestamp: self.timestamp,
        }
    }
}

/// Lenient numeric read of a stored amount.
pub fn parse_amount(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}
