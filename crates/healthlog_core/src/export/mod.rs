//! Report export boundary.
//!
//! # Responsibility
//! - Flatten stored entries into ordered row tuples plus a report title.
//! - Hand the table to an external `ReportSink` (document rendering and
//!   platform sharing live outside the core).
//! - Turn sink failures into a generic user-facing alert.
//!
//! # Invariants
//! - Row order equals the order of the entries passed in.
//! - Every row has exactly `REPORT_COLUMNS` cells.

use crate::model::fluid::FluidIntakeEntry;
use crate::model::mood::MoodLogEntry;
use crate::model::time::format_date;
use log::{error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub const REPORT_COLUMNS: usize = 3;

/// Alert text shown when the sink reports failure.
pub const EXPORT_FAILED_ALERT: &str = "Failed to generate or share the report.";

/// One flattened report row.
pub type ReportRow = [String; REPORT_COLUMNS];

/// Which report is being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    FluidIntake,
    Mood,
}

impl ReportKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::FluidIntake => "Fluid Intake Report",
            Self::Mood => "Mood Report",
        }
    }

    /// Suggested file name for the rendered document.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::FluidIntake => "fluid_intake_report.pdf",
            Self::Mood => "mood_tracker_report.pdf",
        }
    }

    pub fn columns(self) -> [&'static str; REPORT_COLUMNS] {
        match self {
            Self::FluidIntake => ["Date", "Time", "Amount"],
            Self::Mood => ["Date", "Mood", "Comment"],
        }
    }
}

/// Title, header and rows handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTable {
    pub kind: ReportKind,
    pub title: &'static str,
    pub columns: [&'static str; REPORT_COLUMNS],
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    fn new(kind: ReportKind, rows: Vec<ReportRow>) -> Self {
        Self {
            kind,
            title: kind.title(),
            columns: kind.columns(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Fluid rows: date / time / `<amount> ml`.
pub fn fluid_report(entries: &[FluidIntakeEntry]) -> ReportTable {
    let rows = entries
        .iter()
        .map(|entry| {
            [
                format_date(entry.date()),
                entry.timestamp.format("%H:%M:%S").to_string(),
                format!("{} ml", entry.amount),
            ]
        })
        .collect();
    ReportTable::new(ReportKind::FluidIntake, rows)
}

/// Mood rows: date / mood emoji / comment (empty when absent).
pub fn mood_report(entries: &[MoodLogEntry]) -> ReportTable {
    let rows = entries
        .iter()
        .map(|entry| {
            [
                format_date(entry.date),
                entry.mood.emoji().to_string(),
                entry.comment.clone().unwrap_or_default(),
            ]
        })
        .collect();
    ReportTable::new(ReportKind::Mood, rows)
}

/// Failure reported by the external renderer/sharer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportError {
    pub message: String,
}

impl ExportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "report export failed: {}", self.message)
    }
}

impl Error for ExportError {}

/// External collaborator that renders a report and shares it.
pub trait ReportSink {
    fn publish(&mut self, report: &ReportTable) -> Result<(), ExportError>;
}

/// Result of one export request, as surfaced to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportOutcome {
    Shared { rows: usize },
    Failed { alert: &'static str },
}

impl ExportOutcome {
    pub fn is_shared(&self) -> bool {
        matches!(self, Self::Shared { .. })
    }
}

/// Hands `report` to `sink`, logging the outcome.
pub fn publish_report(sink: &mut dyn ReportSink, report: &ReportTable) -> ExportOutcome {
    let started_at = Instant::now();
    let kind = report.kind;
    match sink.publish(report) {
        Ok(()) => {
            info!(
                "event=export module=export status=ok kind={kind:?} rows={} duration_ms={}",
                report.rows.len(),
                started_at.elapsed().as_millis()
            );
            ExportOutcome::Shared {
                rows: report.rows.len(),
            }
        }
        Err(err) => {
            error!(
                "event=export module=export status=error kind={kind:?} duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            ExportOutcome::Failed {
                alert: EXPORT_FAILED_ALERT,
            }
        }
    }
}
