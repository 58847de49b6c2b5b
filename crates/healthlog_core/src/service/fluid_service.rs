//! Fluid intake use-case service.
//!
//! # Responsibility
//! - Hold the state shared by the fluid list, chart and calendar views:
//!   selected date, that day's entries and slot aggregate, the date index,
//!   and the add/edit form.
//! - Apply add/edit/delete and recompute derived state before returning.
//!
//! # Invariants
//! - The date index is rebuilt from a full scan after every mutation.
//! - The selected day's entries/slots are reloaded whenever a mutation
//!   touches the selected date (old or new timestamp).
//! - Saving the form writes the entry on the selected date.

use super::{ensure_not_future, log_mutation, PendingDelete, ServiceError, ServiceResult};
use crate::aggregate::{aggregate_day, DayAggregate};
use crate::db::Database;
use crate::export::{fluid_report, publish_report, ExportOutcome, ReportSink, ReportTable};
use crate::index::{DateIndex, DateMark};
use crate::model::fluid::{FluidIntakeDraft, FluidIntakeEntry};
use crate::model::{Category, EntryId};
use crate::repo::fluid_repo::{FluidIntakeRepository, SqliteFluidRepository};
use crate::repo::RepoResult;
use crate::validation::validate_fluid_form;
use chrono::NaiveDate;
use log::{error, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Default time prefilled in the add form.
pub const DEFAULT_TIME_OF_DAY: &str = "12:00";

/// Entries and slot totals of the selected date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FluidDay {
    pub date: NaiveDate,
    pub entries: Vec<FluidIntakeEntry>,
    pub aggregate: DayAggregate,
}

impl FluidDay {
    fn load(repo: &impl FluidIntakeRepository, date: NaiveDate) -> RepoResult<Self> {
        let entries = repo.list_by_date(date)?;
        let aggregate = aggregate_day(date, &entries);
        Ok(Self {
            date,
            entries,
            aggregate,
        })
    }
}

/// Add/edit form state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FluidForm {
    /// `Some` while editing an existing entry.
    pub editing_id: Option<EntryId>,
    pub amount: String,
    /// `HH:MM`.
    pub time_of_day: String,
}

impl Default for FluidForm {
    fn default() -> Self {
        Self {
            editing_id: None,
            amount: String::new(),
            time_of_day: DEFAULT_TIME_OF_DAY.to_string(),
        }
    }
}

impl FluidForm {
    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }
}

/// Fluid tracker facade over the shared database handle.
pub struct FluidTracker {
    db: Arc<Database>,
    index: DateIndex,
    day: FluidDay,
    form: FluidForm,
}

impl FluidTracker {
    /// Loads the date index and selects `today`.
    pub fn open(db: Arc<Database>, today: NaiveDate) -> ServiceResult<Self> {
        let (index, day) = db.with_conn(|conn| -> ServiceResult<_> {
            let repo = SqliteFluidRepository::try_new(conn)?;
            let index = DateIndex::from_fluid_entries(&repo.list_all()?);
            let day = FluidDay::load(&repo, today)?;
            Ok((index, day))
        })?;
        info!(
            "event=fluid_open module=service status=ok marked_dates={}",
            index.len()
        );
        Ok(Self {
            db,
            index,
            day,
            form: FluidForm::default(),
        })
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.day.date
    }

    pub fn day(&self) -> &FluidDay {
        &self.day
    }

    pub fn index(&self) -> &DateIndex {
        &self.index
    }

    pub fn form(&self) -> &FluidForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FluidForm {
        &mut self.form
    }

    /// Calendar map with the selected date merged in.
    pub fn marked_dates(&self) -> BTreeMap<String, DateMark> {
        self.index.marked_dates(self.day.date)
    }

    /// Selects `date`, reloads its entries/slots and resets the form.
    ///
    /// # Errors
    /// - `FutureDate` when `date` is after `today`.
    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> ServiceResult<&FluidDay> {
        ensure_not_future(date, today)?;
        let day = self.db.with_conn(|conn| -> ServiceResult<_> {
            let repo = SqliteFluidRepository::try_new(conn)?;
            Ok(FluidDay::load(&repo, date)?)
        })?;
        self.day = day;
        self.form = FluidForm::default();
        Ok(&self.day)
    }

    /// Full reload of the index and the selected day.
    pub fn refresh(&mut self) -> ServiceResult<()> {
        let date = self.day.date;
        let (index, day) = self.db.with_conn(|conn| -> ServiceResult<_> {
            let repo = SqliteFluidRepository::try_new(conn)?;
            let index = DateIndex::from_fluid_entries(&repo.list_all()?);
            Ok((index, FluidDay::load(&repo, date)?))
        })?;
        self.index = index;
        self.day = day;
        Ok(())
    }

    /// Resets the form for a new entry on the selected date.
    pub fn begin_add(&mut self) -> &mut FluidForm {
        self.form = FluidForm::default();
        &mut self.form
    }

    /// Prefills the form from an existing entry.
    pub fn begin_edit(&mut self, id: EntryId) -> ServiceResult<&mut FluidForm> {
        let entry = self
            .db
            .with_conn(|conn| SqliteFluidRepository::try_new(conn)?.get_entry(id))?
            .ok_or(ServiceError::NotFound {
                category: Category::FluidIntake,
                id,
            })?;
        self.form = FluidForm {
            editing_id: Some(entry.id),
            amount: entry.amount.clone(),
            time_of_day: entry.time_of_day(),
        };
        Ok(&mut self.form)
    }

    pub fn cancel_form(&mut self) {
        self.form = FluidForm::default();
    }

    /// Validates the form and inserts or updates on the selected date.
    ///
    /// Returns the id of the written entry. The form is reset on success and
    /// kept as-is on failure.
    pub fn save_form(&mut self) -> ServiceResult<EntryId> {
        let draft = validate_fluid_form(
            self.day.date,
            self.form.amount.as_str(),
            self.form.time_of_day.as_str(),
        )?;
        let id = match self.form.editing_id {
            Some(id) => {
                self.update_entry(id, &draft)?;
                id
            }
            None => self.add_entry(&draft)?,
        };
        self.form = FluidForm::default();
        Ok(id)
    }

    /// Inserts one entry and returns its store-assigned id.
    pub fn add_entry(&mut self, draft: &FluidIntakeDraft) -> ServiceResult<EntryId> {
        let started_at = Instant::now();
        let result = self.mutate(|repo| {
            let id = repo.insert_entry(draft)?;
            Ok((id, vec![draft.date()]))
        });
        log_mutation("fluid_insert", started_at, &result);
        result
    }

    /// Replaces every field of entry `id`.
    pub fn update_entry(&mut self, id: EntryId, draft: &FluidIntakeDraft) -> ServiceResult<()> {
        let started_at = Instant::now();
        let result = self.mutate(|repo| {
            let previous = repo.get_entry(id)?;
            repo.update_entry(id, draft)?;
            let mut affected = vec![draft.date()];
            affected.extend(previous.map(|entry| entry.date()));
            Ok((id, affected))
        });
        log_mutation("fluid_update", started_at, &result);
        result.map(|_| ())
    }

    /// First step of delete: checks the entry exists and returns a token.
    pub fn request_delete(&self, id: EntryId) -> ServiceResult<PendingDelete> {
        let exists = self
            .db
            .with_conn(|conn| SqliteFluidRepository::try_new(conn)?.get_entry(id))?
            .is_some();
        if !exists {
            return Err(ServiceError::NotFound {
                category: Category::FluidIntake,
                id,
            });
        }
        Ok(PendingDelete::new(Category::FluidIntake, id))
    }

    /// Second step of delete: permanently removes the confirmed entry.
    pub fn confirm_delete(&mut self, pending: PendingDelete) -> ServiceResult<()> {
        let id = pending.expect_category(Category::FluidIntake)?;
        let started_at = Instant::now();
        let result = self.mutate(|repo| {
            let previous = repo.get_entry(id)?;
            repo.delete_entry(id)?;
            Ok((id, previous.map(|entry| entry.date()).into_iter().collect()))
        });
        log_mutation("fluid_delete", started_at, &result);
        if self.form.editing_id == Some(id) {
            self.form = FluidForm::default();
        }
        result.map(|_| ())
    }

    /// All entries, most recent first, flattened for the report sink.
    pub fn report(&self) -> ServiceResult<ReportTable> {
        let entries = self
            .db
            .with_conn(|conn| SqliteFluidRepository::try_new(conn)?.list_all())?;
        Ok(fluid_report(&entries))
    }

    /// Builds the report and hands it to `sink`.
    pub fn export(&self, sink: &mut dyn ReportSink) -> ExportOutcome {
        match self.report() {
            Ok(report) => publish_report(sink, &report),
            Err(err) => {
                error!("event=export module=service status=error kind=fluid error={err}");
                ExportOutcome::Failed {
                    alert: crate::export::EXPORT_FAILED_ALERT,
                }
            }
        }
    }

    /// Runs `op` under the fluid write gate, then rebuilds the index and, if
    /// one of the affected dates is selected, the selected day.
    fn mutate<T>(
        &mut self,
        op: impl FnOnce(&SqliteFluidRepository<'_>) -> RepoResult<(T, Vec<NaiveDate>)>,
    ) -> ServiceResult<T> {
        let db = Arc::clone(&self.db);
        let _gate = db.write_gate(Category::FluidIntake);
        let selected = self.day.date;

        let (value, index, day) = db.with_conn(|conn| -> ServiceResult<_> {
            let repo = SqliteFluidRepository::try_new(conn)?;
            let (value, affected) = op(&repo)?;
            let index = DateIndex::from_fluid_entries(&repo.list_all()?);
            let day = if affected.contains(&selected) {
                Some(FluidDay::load(&repo, selected)?)
            } else {
                None
            };
            Ok((value, index, day))
        })?;

        self.index = index;
        if let Some(day) = day {
            self.day = day;
        }
        Ok(value)
    }
}
