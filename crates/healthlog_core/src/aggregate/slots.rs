//! Fixed 2-hour slot aggregation of one day's fluid intake.
//!
//! # Responsibility
//! - Sum entry amounts into six windows `[8,10) .. [18,20)` by local hour.
//! - Keep "no entries" distinct from "entries that sum to zero".
//!
//! # Invariants
//! - An entry with hour in `[8,20)` lands in exactly one slot.
//! - Entries outside `[8,20)` are excluded from every slot and counted in
//!   `excluded`.
//! - Entries dated on another day are never bucketed; they are counted in
//!   `other_dates` so a caller handing over the wrong rows can see it.
//! - Unparseable amounts contribute zero but still count as present.

use crate::model::fluid::FluidIntakeEntry;
use chrono::NaiveDate;
use log::{debug, warn};
use serde::Serialize;

pub const SLOT_COUNT: usize = 6;
pub const SLOT_START_HOURS: [u32; SLOT_COUNT] = [8, 10, 12, 14, 16, 18];
pub const SLOT_WIDTH_HOURS: u32 = 2;
pub const SLOT_LABELS: [&str; SLOT_COUNT] = ["8AM", "10AM", "12PM", "2PM", "4PM", "6PM"];

/// Tri-state content of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum SlotReading {
    /// No entry fell into this window.
    Absent,
    /// Entries exist but their amounts sum to zero.
    Zero,
    /// Entries exist with a non-zero total.
    Value(f64),
}

impl SlotReading {
    /// Chart value; absent and zero both plot as 0.
    pub fn value(self) -> f64 {
        match self {
            Self::Value(value) => value,
            Self::Absent | Self::Zero => 0.0,
        }
    }

    pub fn is_present(self) -> bool {
        !matches!(self, Self::Absent)
    }
}

/// Slot totals for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayAggregate {
    pub date: NaiveDate,
    pub slots: [SlotReading; SLOT_COUNT],
    /// Entries that landed in a slot.
    pub included: usize,
    /// Entries of this date whose hour is outside every slot.
    pub excluded: usize,
    /// Entries handed in whose local date is not `date`.
    pub other_dates: usize,
}

impl DayAggregate {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            slots: [SlotReading::Absent; SLOT_COUNT],
            included: 0,
            excluded: 0,
            other_dates: 0,
        }
    }

    /// Plain 6-number chart series.
    pub fn series(&self) -> [f64; SLOT_COUNT] {
        self.slots.map(SlotReading::value)
    }

    pub fn total(&self) -> f64 {
        self.series().iter().sum()
    }

    /// Whether the date has any fluid entry, in or out of the slot range.
    pub fn has_entries(&self) -> bool {
        self.included + self.excluded > 0
    }

    /// Whether any slot has an entry.
    pub fn has_slot_data(&self) -> bool {
        self.slots.iter().any(|slot| slot.is_present())
    }
}

/// Slot index containing `hour`, or `None` outside `[8,20)`.
pub fn slot_index(hour: u32) -> Option<usize> {
    SLOT_START_HOURS
        .iter()
        .position(|start| hour >= *start && hour < start + SLOT_WIDTH_HOURS)
}

/// Buckets `entries` of `date` into the six time-of-day slots.
///
/// Entries dated on another day stay out of every slot and are counted in
/// `other_dates`.
pub fn aggregate_day(date: NaiveDate, entries: &[FluidIntakeEntry]) -> DayAggregate {
    let mut sums = [0.0_f64; SLOT_COUNT];
    let mut counts = [0_usize; SLOT_COUNT];
    let mut aggregate = DayAggregate::empty(date);

    for entry in entries {
        if entry.date() != date {
            aggregate.other_dates += 1;
            continue;
        }
        match slot_index(entry.hour()) {
            Some(idx) => {
                sums[idx] += entry.amount_value();
                counts[idx] += 1;
                aggregate.included += 1;
            }
            None => aggregate.excluded += 1,
        }
    }

    for idx in 0..SLOT_COUNT {
        aggregate.slots[idx] = match (counts[idx], sums[idx]) {
            (0, _) => SlotReading::Absent,
            (_, sum) if sum == 0.0 => SlotReading::Zero,
            (_, sum) => SlotReading::Value(sum),
        };
    }

    if aggregate.other_dates > 0 {
        warn!(
            "event=aggregate_day module=aggregate status=mismatch date={} other_dates={}",
            date, aggregate.other_dates
        );
    }
    debug!(
        "event=aggregate_day module=aggregate status=ok included={} excluded={}",
        aggregate.included, aggregate.excluded
    );
    aggregate
}
