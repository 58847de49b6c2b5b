//! Core domain logic for the personal health log.
//! This crate is the single source of truth for record, index and slot
//! invariants; UI hosts reach it through `healthlog_ffi`.

pub mod aggregate;
pub mod config;
pub mod db;
pub mod export;
pub mod index;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use aggregate::{aggregate_day, DayAggregate, SlotReading};
pub use config::{CoreConfig, LogLevel};
pub use db::{open_db, open_db_in_memory, Database, DbError, DbResult};
pub use export::{ExportError, ExportOutcome, ReportKind, ReportSink, ReportTable};
pub use index::{DateIndex, DateMark};
pub use logging::{init_logging, init_logging_from_config, logging_status, LoggingError};
pub use model::fluid::{FluidIntakeDraft, FluidIntakeEntry};
pub use model::mood::{MoodDraft, MoodLevel, MoodLogEntry};
pub use model::profile::{BloodType, ProfileDraft, UserProfile};
pub use model::{Category, EntryId};
pub use repo::{RepoError, RepoResult};
pub use service::fluid_service::{FluidDay, FluidForm, FluidTracker};
pub use service::mood_service::{MoodForm, MoodJournal};
pub use service::profile_service::ProfileService;
pub use service::{PendingDelete, ServiceError, ServiceResult};
pub use validation::{format_dob_input, validate_form_date, FormError, ProfileValidationError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
