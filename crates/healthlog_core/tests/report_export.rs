use chrono::NaiveDate;
use healthlog_core::db::open_db_in_memory;
use healthlog_core::export::EXPORT_FAILED_ALERT;
use healthlog_core::{
    ExportError, ExportOutcome, FluidIntakeDraft, FluidTracker, ReportKind, ReportSink,
    ReportTable,
};
use std::sync::Arc;

#[derive(Default)]
struct RecordingSink {
    published: Vec<ReportTable>,
}

impl ReportSink for RecordingSink {
    fn publish(&mut self, report: &ReportTable) -> Result<(), ExportError> {
        self.published.push(report.clone());
        Ok(())
    }
}

struct FailingSink;

impl ReportSink for FailingSink {
    fn publish(&mut self, _report: &ReportTable) -> Result<(), ExportError> {
        Err(ExportError::new("share sheet dismissed"))
    }
}

fn tracker_with_entries() -> FluidTracker {
    let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let db = Arc::new(open_db_in_memory().unwrap());
    let mut tracker = FluidTracker::open(db, today).unwrap();
    tracker
        .add_entry(&FluidIntakeDraft::new(
            "250",
            day.and_hms_opt(9, 5, 7).unwrap(),
        ))
        .unwrap();
    tracker
        .add_entry(&FluidIntakeDraft::new(
            "120",
            day.and_hms_opt(18, 0, 0).unwrap(),
        ))
        .unwrap();
    tracker
}

#[test]
fn fluid_export_hands_every_row_to_the_sink() {
    let tracker = tracker_with_entries();
    let mut sink = RecordingSink::default();

    let outcome = tracker.export(&mut sink);

    assert_eq!(outcome, ExportOutcome::Shared { rows: 2 });
    let report = &sink.published[0];
    assert_eq!(report.kind, ReportKind::FluidIntake);
    assert_eq!(report.title, "Fluid Intake Report");
    assert_eq!(report.kind.file_name(), "fluid_intake_report.pdf");
    assert_eq!(report.rows[0], ["2024-06-01", "18:00:00", "120 ml"]);
    assert_eq!(report.rows[1], ["2024-06-01", "09:05:07", "250 ml"]);
}

#[test]
fn sink_failure_surfaces_the_export_alert() {
    let tracker = tracker_with_entries();

    let outcome = tracker.export(&mut FailingSink);

    assert_eq!(
        outcome,
        ExportOutcome::Failed {
            alert: EXPORT_FAILED_ALERT
        }
    );
    assert!(!outcome.is_shared());
}

#[test]
fn empty_store_still_exports_a_titled_table() {
    let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    let tracker = FluidTracker::open(Arc::new(open_db_in_memory().unwrap()), today).unwrap();
    let mut sink = RecordingSink::default();

    let outcome = tracker.export(&mut sink);

    assert_eq!(outcome, ExportOutcome::Shared { rows: 0 });
    assert!(sink.published[0].is_empty());
    assert_eq!(sink.published[0].columns, ["Date", "Time", "Amount"]);
}
