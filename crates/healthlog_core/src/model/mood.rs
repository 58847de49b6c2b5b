//! Mood log records and the fixed mood scale.
//!
//! # Invariants
//! - `date` is the user-selected calendar day, independent of time of day.
//! - `mood` is stored as its emoji and must map back to a `MoodLevel`.
//! - A blank comment is the same as no comment.

use super::EntryId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fixed mood scale, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodLevel {
    Sad,
    Neutral,
    Happy,
    Excited,
}

impl MoodLevel {
    pub const ALL: [MoodLevel; 4] = [
        MoodLevel::Sad,
        MoodLevel::Neutral,
        MoodLevel::Happy,
        MoodLevel::Excited,
    ];

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Sad => "😢",
            Self::Neutral => "😐",
            Self::Happy => "😊",
            Self::Excited => "😄",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Sad => "Sad",
            Self::Neutral => "Neutral",
            Self::Happy => "Happy",
            Self::Excited => "Excited",
        }
    }

    /// Resolves either the stored emoji or the label (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL.into_iter().find(|level| {
            level.emoji() == trimmed || level.label().eq_ignore_ascii_case(trimmed)
        })
    }
}

/// One persisted mood log row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodLogEntry {
    pub id: EntryId,
    pub date: NaiveDate,
    pub mood: MoodLevel,
    pub comment: Option<String>,
}

/// Field set for insert/update; full replacement on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodDraft {
    pub date: NaiveDate,
    pub mood: MoodLevel,
    pub comment: Option<String>,
}

impl MoodDraft {
    pub fn new(date: NaiveDate, mood: MoodLevel, comment: Option<String>) -> Self {
        Self {
            date,
            mood,
            comment: normalize_comment(comment),
        }
    }
}

impl MoodLogEntry {
    pub fn to_draft(&self) -> MoodDraft {
        MoodDraft {
            date: self.date,
            mood: self.mood,
            comment: self.comment.clone(),
        }
    }
}

pub(crate) fn normalize_comment(comment: Option<String>) -> Option<String> {
    comment.filter(|value| !value.trim().is_empty())
}
