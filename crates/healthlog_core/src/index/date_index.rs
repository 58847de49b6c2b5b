//! Date index builder and selection overlay.

use crate::model::fluid::FluidIntakeEntry;
use crate::model::mood::MoodLogEntry;
use crate::model::time::format_date;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Fixed display colors for one category's calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkPalette {
    pub dot_color: &'static str,
    pub selected_color: &'static str,
}

pub const FLUID_PALETTE: MarkPalette = MarkPalette {
    dot_color: "blue",
    selected_color: "blue",
};

pub const MOOD_PALETTE: MarkPalette = MarkPalette {
    dot_color: "#FFA500",
    selected_color: "#FFA500",
};

/// Calendar marker for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateMark {
    /// The date has at least one stored entry.
    pub marked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dot_color: Option<&'static str>,
    /// The date is the current calendar selection.
    pub selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<&'static str>,
}

impl DateMark {
    fn presence(palette: MarkPalette) -> Self {
        Self {
            marked: true,
            dot_color: Some(palette.dot_color),
            selected: false,
            selected_color: None,
        }
    }

    /// Adds the selection attribute, keeping any presence attribute.
    fn select(mut self, palette: MarkPalette) -> Self {
        self.selected = true;
        self.selected_color = Some(palette.selected_color);
        self
    }
}

/// Date -> presence map derived from a full category scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateIndex {
    palette: MarkPalette,
    marks: BTreeMap<NaiveDate, DateMark>,
}

impl DateIndex {
    /// Builds the index from every stored date; duplicates collapse.
    pub fn build(dates: impl IntoIterator<Item = NaiveDate>, palette: MarkPalette) -> Self {
        let marks = dates
            .into_iter()
            .map(|date| (date, DateMark::presence(palette)))
            .collect();
        Self { palette, marks }
    }

    pub fn from_fluid_entries(entries: &[FluidIntakeEntry]) -> Self {
        Self::build(entries.iter().map(FluidIntakeEntry::date), FLUID_PALETTE)
    }

    pub fn from_mood_entries(entries: &[MoodLogEntry]) -> Self {
        Self::build(entries.iter().map(|entry| entry.date), MOOD_PALETTE)
    }

    pub fn empty(palette: MarkPalette) -> Self {
        Self::build(std::iter::empty(), palette)
    }

    pub fn palette(&self) -> MarkPalette {
        self.palette
    }

    pub fn is_marked(&self, date: NaiveDate) -> bool {
        self.marks.get(&date).is_some_and(|mark| mark.marked)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DateMark> {
        self.marks.get(&date)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.marks.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Display map with `selected` merged in.
    ///
    /// A selected date that also has data keeps `marked = true`; a selected
    /// date without data appears with `marked = false`.
    pub fn with_selection(&self, selected: NaiveDate) -> BTreeMap<NaiveDate, DateMark> {
        let mut marks = self.marks.clone();
        let base = marks.remove(&selected).unwrap_or(DateMark {
            marked: false,
            dot_color: None,
            selected: false,
            selected_color: None,
        });
        marks.insert(selected, base.select(self.palette));
        marks
    }

    /// Same as `with_selection`, keyed by `YYYY-MM-DD` for the calendar.
    pub fn marked_dates(&self, selected: NaiveDate) -> BTreeMap<String, DateMark> {
        self.with_selection(selected)
            .into_iter()
            .map(|(date, mark)| (format_date(date), mark))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{DateIndex, FLUID_PALETTE, MOOD_PALETTE};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn build_collapses_duplicate_dates() {
        let index = DateIndex::build([day(1), day(1), day(3)], FLUID_PALETTE);
        assert_eq!(index.len(), 2);
        assert!(index.is_marked(day(1)));
        assert!(!index.is_marked(day(2)));
        assert_eq!(index.get(day(3)).unwrap().dot_color, Some("blue"));
    }

    #[test]
    fn selection_merges_with_presence() {
        let index = DateIndex::build([day(1)], MOOD_PALETTE);
        let merged = index.with_selection(day(1));
        let mark = &merged[&day(1)];
        assert!(mark.marked);
        assert!(mark.selected);
        assert_eq!(mark.dot_color, Some("#FFA500"));
        assert_eq!(mark.selected_color, Some("#FFA500"));
    }

    #[test]
    fn selection_without_data_is_not_marked() {
        let index = DateIndex::build([day(1)], FLUID_PALETTE);
        let merged = index.marked_dates(day(2));
        assert_eq!(merged.len(), 2);
        assert!(!merged["2024-01-02"].marked);
        assert!(merged["2024-01-02"].selected);
        assert!(merged["2024-01-01"].marked);
        assert!(!merged["2024-01-01"].selected);
    }
}
