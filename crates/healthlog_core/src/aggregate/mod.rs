//! Time-of-day aggregation for chart series.

pub mod slots;

pub use slots::{
    aggregate_day, slot_index, DayAggregate, SlotReading, SLOT_COUNT, SLOT_LABELS,
    SLOT_START_HOURS, SLOT_WIDTH_HOURS,
};
