//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose fluid, mood and profile use-cases to Dart via FRB.
//! - Translate core errors into the blocking alert text shown by the UI.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One shared database handle per process, opened on first use.
//! - Dates cross the boundary as `YYYY-MM-DD`, times as `HH:MM`.

use chrono::NaiveDate;
use healthlog_core::model::time::{format_date, format_timestamp, today};
use healthlog_core::{
    core_version as core_version_inner, format_dob_input as format_dob_input_inner,
    init_logging as init_logging_inner, open_db, validate_form_date, CoreConfig, Database,
    DateMark, DayAggregate, FluidIntakeEntry, FluidTracker, MoodJournal, MoodLogEntry,
    ProfileDraft, ProfileService, ReportTable, ServiceError, SlotReading,
};
use log::error;
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static DATABASE: OnceCell<Arc<Database>> = OnceCell::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the database file used by every later call.
///
/// Must run before the first data call; otherwise `HEALTHLOG_DB_PATH` or the
/// temp-dir default applies. Returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "db path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = DB_PATH.get_or_init(|| requested.clone());
    if *active != requested {
        return format!(
            "database already configured at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        );
    }
    String::new()
}

/// Action response envelope for save/delete/register calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation was applied.
    pub ok: bool,
    /// Id of the written entry, when one exists.
    pub id: Option<i64>,
    /// Delete not applied yet; ask the user and call again with `confirmed`.
    pub needs_confirmation: bool,
    /// Alert or status text for the UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<i64>) -> Self {
        Self {
            ok: true,
            id,
            needs_confirmation: false,
            message: message.into(),
        }
    }

    fn confirm(id: i64) -> Self {
        Self {
            ok: false,
            id: Some(id),
            needs_confirmation: true,
            message: "Are you sure you want to delete this entry?".to_string(),
        }
    }

    fn failure(err: &ServiceError) -> Self {
        Self {
            ok: false,
            id: None,
            needs_confirmation: false,
            message: err.alert_message(),
        }
    }
}

/// Calendar marker for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedDateItem {
    pub date: String,
    pub marked: bool,
    pub dot_color: Option<String>,
    pub selected: bool,
    pub selected_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FluidEntryItem {
    pub id: i64,
    pub amount: String,
    pub timestamp: String,
    /// `HH:MM` for list display and edit prefill.
    pub time_of_day: String,
}

/// One chart bar; `value` is `None` when no entry fell into the window.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotItem {
    pub label: String,
    pub value: Option<f64>,
}

/// Selected-day view for the fluid list, chart and calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct FluidDayResponse {
    pub ok: bool,
    pub message: String,
    pub date: String,
    pub entries: Vec<FluidEntryItem>,
    pub slots: Vec<SlotItem>,
    /// Entries of this date outside the charted hours.
    pub excluded: u32,
    pub marked_dates: Vec<MarkedDateItem>,
}

impl FluidDayResponse {
    fn failure(date: String, err: &ServiceError) -> Self {
        Self {
            ok: false,
            message: err.alert_message(),
            date,
            entries: Vec::new(),
            slots: Vec::new(),
            excluded: 0,
            marked_dates: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodEntryItem {
    pub id: i64,
    pub date: String,
    pub mood: String,
    pub comment: Option<String>,
}

/// Mood list plus calendar markers for the selected date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodListResponse {
    pub ok: bool,
    pub message: String,
    pub date: String,
    /// Full log, most recent first.
    pub entries: Vec<MoodEntryItem>,
    pub day_entries: Vec<MoodEntryItem>,
    pub marked_dates: Vec<MarkedDateItem>,
}

impl MoodListResponse {
    fn failure(date: String, err: &ServiceError) -> Self {
        Self {
            ok: false,
            message: err.alert_message(),
            date,
            entries: Vec::new(),
            day_entries: Vec::new(),
            marked_dates: Vec::new(),
        }
    }
}

/// Flattened report handed to the Dart-side renderer/sharer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportResponse {
    pub ok: bool,
    pub message: String,
    pub title: String,
    pub file_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportResponse {
    fn failure(err: &ServiceError) -> Self {
        Self {
            ok: false,
            message: err.alert_message(),
            title: String::new(),
            file_name: String::new(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }
}

/// Selects `date` in the fluid tracker and returns its entries and slots.
#[flutter_rust_bridge::frb(sync)]
pub fn fluid_select_date(date: String) -> FluidDayResponse {
    match with_fluid(&date, |_| Ok(())) {
        Ok((tracker, ())) => to_fluid_day_response(&tracker),
        Err(err) => FluidDayResponse::failure(date, &err),
    }
}

/// Adds (no `editing_id`) or edits a fluid entry on `date`.
///
/// `time_of_day` is `HH:MM`; the amount is stored as typed.
#[flutter_rust_bridge::frb(sync)]
pub fn fluid_save(
    date: String,
    editing_id: Option<i64>,
    amount: String,
    time_of_day: String,
) -> ActionResponse {
    let result = with_fluid(&date, |tracker| {
        if let Some(id) = editing_id {
            tracker.begin_edit(id)?;
        }
        let form = tracker.form_mut();
        form.amount = amount;
        form.time_of_day = time_of_day;
        tracker.save_form()
    });
    match result {
        Ok((_, id)) => ActionResponse::success("Fluid intake saved.", Some(id)),
        Err(err) => ActionResponse::failure(&err),
    }
}

/// Deletes fluid entry `id` once `confirmed` is true.
#[flutter_rust_bridge::frb(sync)]
pub fn fluid_delete(id: i64, confirmed: bool) -> ActionResponse {
    let result = shared_database().and_then(|db| {
        let mut tracker = FluidTracker::open(db, today())?;
        let pending = tracker.request_delete(id)?;
        if !confirmed {
            return Ok(false);
        }
        tracker.confirm_delete(pending)?;
        Ok(true)
    });
    delete_response(id, result)
}

#[flutter_rust_bridge::frb(sync)]
pub fn fluid_report() -> ReportResponse {
    let result = shared_database().and_then(|db| FluidTracker::open(db, today())?.report());
    match result {
        Ok(report) => to_report_response(report),
        Err(err) => ReportResponse::failure(&err),
    }
}

/// Loads the mood log and selects `date`.
#[flutter_rust_bridge::frb(sync)]
pub fn mood_select_date(date: String) -> MoodListResponse {
    match with_mood(&date, |_| Ok(())) {
        Ok((journal, ())) => to_mood_list_response(&journal),
        Err(err) => MoodListResponse::failure(date, &err),
    }
}

/// Adds (no `editing_id`) or edits a mood entry.
///
/// `mood` is the emoji or its label; a blank comment is stored as absent.
#[flutter_rust_bridge::frb(sync)]
pub fn mood_save(
    date: String,
    editing_id: Option<i64>,
    mood: String,
    comment: String,
) -> ActionResponse {
    let result = with_mood(&date, |journal| {
        let selected = journal.selected_date();
        if let Some(id) = editing_id {
            journal.begin_edit(id)?;
        }
        let form = journal.form_mut();
        form.date = selected;
        form.mood = mood;
        form.comment = comment;
        journal.save_form()
    });
    match result {
        Ok((_, id)) => ActionResponse::success("Mood saved.", Some(id)),
        Err(err) => ActionResponse::failure(&err),
    }
}

/// Deletes mood entry `id` once `confirmed` is true.
#[flutter_rust_bridge::frb(sync)]
pub fn mood_delete(id: i64, confirmed: bool) -> ActionResponse {
    let result = shared_database().and_then(|db| {
        let mut journal = MoodJournal::open(db, today())?;
        let pending = journal.request_delete(id)?;
        if !confirmed {
            return Ok(false);
        }
        journal.confirm_delete(pending)?;
        Ok(true)
    });
    delete_response(id, result)
}

#[flutter_rust_bridge::frb(sync)]
pub fn mood_report() -> ReportResponse {
    match shared_database().and_then(|db| MoodJournal::open(db, today())) {
        Ok(journal) => to_report_response(journal.report()),
        Err(err) => ReportResponse::failure(&err),
    }
}

/// Validates and stores the registration form.
///
/// On failure `message` carries the first violated rule's alert text.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_register(
    full_name: String,
    contact: String,
    blood_type: String,
    email: String,
    dob: String,
) -> ActionResponse {
    let draft = ProfileDraft {
        full_name,
        contact,
        blood_type,
        email,
        dob,
    };
    let result = shared_database().and_then(|db| ProfileService::new(db).register(&draft));
    match result {
        Ok(profile) => ActionResponse::success("Profile saved.", Some(profile.id)),
        Err(err) => ActionResponse::failure(&err),
    }
}

/// Greeting name for the home view; `Guest` when unavailable.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_display_name() -> String {
    match shared_database() {
        Ok(db) => ProfileService::new(db).display_name(),
        Err(_) => healthlog_core::model::profile::DEFAULT_DISPLAY_NAME.to_string(),
    }
}

/// Reformats raw DOB keystrokes into `YYYY-MM-DD` as the user types.
#[flutter_rust_bridge::frb(sync)]
pub fn format_dob_input(raw: String) -> String {
    format_dob_input_inner(raw.as_str())
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| CoreConfig::from_env().db_path)
        .clone()
}

fn shared_database() -> Result<Arc<Database>, ServiceError> {
    DATABASE
        .get_or_try_init(|| open_db(resolve_db_path()).map(Arc::new))
        .map(Arc::clone)
        .map_err(|err| {
            error!("event=ffi_db_open module=ffi status=error error={err}");
            ServiceError::from(err)
        })
}

fn parse_date_arg(date: &str) -> Result<NaiveDate, ServiceError> {
    Ok(validate_form_date(date)?)
}

fn with_fluid<T>(
    date: &str,
    f: impl FnOnce(&mut FluidTracker) -> Result<T, ServiceError>,
) -> Result<(FluidTracker, T), ServiceError> {
    let date = parse_date_arg(date)?;
    let today = today();
    let mut tracker = FluidTracker::open(shared_database()?, today)?;
    tracker.select_date(date, today)?;
    let value = f(&mut tracker)?;
    Ok((tracker, value))
}

fn with_mood<T>(
    date: &str,
    f: impl FnOnce(&mut MoodJournal) -> Result<T, ServiceError>,
) -> Result<(MoodJournal, T), ServiceError> {
    let date = parse_date_arg(date)?;
    let today = today();
    let mut journal = MoodJournal::open(shared_database()?, today)?;
    journal.select_date(date, today)?;
    let value = f(&mut journal)?;
    Ok((journal, value))
}

fn delete_response(id: i64, result: Result<bool, ServiceError>) -> ActionResponse {
    match result {
        Ok(true) => ActionResponse::success("Entry deleted.", Some(id)),
        Ok(false) => ActionResponse::confirm(id),
        Err(err) => ActionResponse::failure(&err),
    }
}

fn to_marked_items(marks: BTreeMap<String, DateMark>) -> Vec<MarkedDateItem> {
    marks
        .into_iter()
        .map(|(date, mark)| MarkedDateItem {
            date,
            marked: mark.marked,
            dot_color: mark.dot_color.map(str::to_string),
            selected: mark.selected,
            selected_color: mark.selected_color.map(str::to_string),
        })
        .collect()
}

fn to_fluid_item(entry: &FluidIntakeEntry) -> FluidEntryItem {
    FluidEntryItem {
        id: entry.id,
        amount: entry.amount.clone(),
        timestamp: format_timestamp(entry.timestamp),
        time_of_day: entry.time_of_day(),
    }
}

fn to_slot_items(aggregate: &DayAggregate) -> Vec<SlotItem> {
    healthlog_core::aggregate::SLOT_LABELS
        .iter()
        .zip(aggregate.slots.iter())
        .map(|(label, reading)| SlotItem {
            label: (*label).to_string(),
            value: match reading {
                SlotReading::Absent => None,
                SlotReading::Zero => Some(0.0),
                SlotReading::Value(value) => Some(*value),
            },
        })
        .collect()
}

fn to_fluid_day_response(tracker: &FluidTracker) -> FluidDayResponse {
    let day = tracker.day();
    FluidDayResponse {
        ok: true,
        message: String::new(),
        date: format_date(day.date),
        entries: day.entries.iter().map(to_fluid_item).collect(),
        slots: to_slot_items(&day.aggregate),
        excluded: u32::try_from(day.aggregate.excluded).unwrap_or(u32::MAX),
        marked_dates: to_marked_items(tracker.marked_dates()),
    }
}

fn to_mood_item(entry: &MoodLogEntry) -> MoodEntryItem {
    MoodEntryItem {
        id: entry.id,
        date: format_date(entry.date),
        mood: entry.mood.emoji().to_string(),
        comment: entry.comment.clone(),
    }
}

fn to_mood_list_response(journal: &MoodJournal) -> MoodListResponse {
    MoodListResponse {
        ok: true,
        message: String::new(),
        date: format_date(journal.selected_date()),
        entries: journal.entries().iter().map(to_mood_item).collect(),
        day_entries: journal.day_entries().iter().map(to_mood_item).collect(),
        marked_dates: to_marked_items(journal.marked_dates()),
    }
}

fn to_report_response(report: ReportTable) -> ReportResponse {
    ReportResponse {
        ok: true,
        message: String::new(),
        title: report.title.to_string(),
        file_name: report.kind.file_name().to_string(),
        columns: report.columns.iter().map(|c| (*c).to_string()).collect(),
        rows: report.rows.into_iter().map(Vec::from).collect(),
    }
}
