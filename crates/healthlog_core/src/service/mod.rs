//! Core use-case services shared by list, chart and calendar views.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Recompute the date index (and the selected day's slots) inside the
//!   same write gate as the mutation that triggered it.
//! - Keep UI/FFI layers decoupled from storage details.
//!
//! # Invariants
//! - At most one mutation per category is in flight.
//! - A mutation is settled only after its index/slot recompute is visible.
//! - Deletes require a `PendingDelete` token from `request_delete`.

use crate::db::DbError;
use crate::model::{Category, EntryId};
use crate::repo::RepoError;
use crate::validation::{FormError, ProfileValidationError};
use chrono::NaiveDate;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub mod fluid_service;
pub mod mood_service;
pub mod profile_service;

/// Generic blocking alert for store failures.
pub const STORE_FAILURE_ALERT: &str = "Something went wrong while saving your data. Please try again.";
pub const FUTURE_DATE_ALERT: &str = "You cannot add data for future dates.";
pub const MISSING_ENTRY_ALERT: &str = "This entry no longer exists.";

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for health log use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Profile form violated a rule; nothing was written.
    Validation(ProfileValidationError),
    /// Fluid/mood form rejected; nothing was written.
    Form(FormError),
    /// Selected date is after today.
    FutureDate(NaiveDate),
    /// Target entry does not exist.
    NotFound { category: Category, id: EntryId },
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl ServiceError {
    /// User-facing text for the blocking alert.
    pub fn alert_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Form(err) => err.to_string(),
            Self::FutureDate(_) => FUTURE_DATE_ALERT.to_string(),
            Self::NotFound { .. } => MISSING_ENTRY_ALERT.to_string(),
            Self::Repo(_) | Self::InconsistentState(_) => STORE_FAILURE_ALERT.to_string(),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Form(err) => write!(f, "{err}"),
            Self::FutureDate(date) => write!(f, "date {date} is in the future"),
            Self::NotFound { category, id } => {
                write!(f, "{} entry not found: {id}", category.as_str())
            }
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Form(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { category, id } => Self::NotFound { category, id },
            other => Self::Repo(other),
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

impl From<ProfileValidationError> for ServiceError {
    fn from(value: ProfileValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<FormError> for ServiceError {
    fn from(value: FormError) -> Self {
        Self::Form(value)
    }
}

/// Confirmation token for a permanent delete.
///
/// Only `request_delete` on a service creates one, after checking the entry
/// exists.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a delete only happens when the token is confirmed"]
pub struct PendingDelete {
    category: Category,
    id: EntryId,
}

impl PendingDelete {
    pub(crate) fn new(category: Category, id: EntryId) -> Self {
        Self { category, id }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub(crate) fn expect_category(&self, category: Category) -> ServiceResult<EntryId> {
        if self.category != category {
            return Err(ServiceError::InconsistentState(
                "delete token belongs to another category",
            ));
        }
        Ok(self.id)
    }
}

pub(crate) fn ensure_not_future(date: NaiveDate, today: NaiveDate) -> ServiceResult<()> {
    if date > today {
        return Err(ServiceError::FutureDate(date));
    }
    Ok(())
}

pub(crate) fn log_mutation<T>(event: &str, started_at: Instant, result: &ServiceResult<T>) {
    match result {
        Ok(_) => info!(
            "event={event} module=service status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event={event} module=service status=error duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
}
