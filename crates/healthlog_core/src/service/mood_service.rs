//! Mood journal use-case service.
//!
//! # Responsibility
//! - Hold the mood list, the selected day's entries, the date index and
//!   the add/edit form.
//! - Apply add/edit/delete and recompute derived state before returning.
//!
//! # Invariants
//! - `entries` is the full log ordered `date DESC, id DESC`.
//! - The date index is rebuilt from that full scan after every mutation.
//! - Editing replaces date, mood and comment together.

use super::{ensure_not_future, log_mutation, PendingDelete, ServiceError, ServiceResult};
use crate::db::Database;
use crate::export::{mood_report, publish_report, ExportOutcome, ReportSink, ReportTable};
use crate::index::{DateIndex, DateMark};
use crate::model::mood::{MoodDraft, MoodLogEntry};
use crate::model::{Category, EntryId};
use crate::repo::mood_repo::{MoodLogRepository, SqliteMoodRepository};
use crate::repo::RepoResult;
use crate::validation::validate_mood_form;
use chrono::NaiveDate;
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Add/edit form state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodForm {
    /// `Some` while editing an existing entry.
    pub editing_id: Option<EntryId>,
    pub date: NaiveDate,
    /// Selected emoji (or label); empty when nothing is selected.
    pub mood: String,
    pub comment: String,
}

impl MoodForm {
    fn blank(date: NaiveDate) -> Self {
        Self {
            editing_id: None,
            date,
            mood: String::new(),
            comment: String::new(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }
}

/// Mood journal facade over the shared database handle.
pub struct MoodJournal {
    db: Arc<Database>,
    selected: NaiveDate,
    entries: Vec<MoodLogEntry>,
    day_entries: Vec<MoodLogEntry>,
    index: DateIndex,
    form: MoodForm,
}

impl MoodJournal {
    /// Loads the full log and selects `today`.
    pub fn open(db: Arc<Database>, today: NaiveDate) -> ServiceResult<Self> {
        let (entries, day_entries) = db.with_conn(|conn| -> ServiceResult<_> {
            let repo = SqliteMoodRepository::try_new(conn)?;
            Ok((repo.list_all()?, repo.list_by_date(today)?))
        })?;
        let index = DateIndex::from_mood_entries(&entries);
        info!(
            "event=mood_open module=service status=ok entries={} marked_dates={}",
            entries.len(),
            index.len()
        );
        Ok(Self {
            db,
            selected: today,
            entries,
            day_entries,
            index,
            form: MoodForm::blank(today),
        })
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected
    }

    /// Full log, most recent first.
    pub fn entries(&self) -> &[MoodLogEntry] {
        &self.entries
    }

    /// Entries of the selected date.
    pub fn day_entries(&self) -> &[MoodLogEntry] {
        &self.day_entries
    }

    pub fn index(&self) -> &DateIndex {
        &self.index
    }

    pub fn form(&self) -> &MoodForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut MoodForm {
        &mut self.form
    }

    /// Calendar map with the selected date merged in.
    pub fn marked_dates(&self) -> BTreeMap<String, DateMark> {
        self.index.marked_dates(self.selected)
    }

    /// Selects `date` and reloads its entries.
    ///
    /// # Errors
    /// - `FutureDate` when `date` is after `today`.
    pub fn select_date(
        &mut self,
        date: NaiveDate,
        today: NaiveDate,
    ) -> ServiceResult<&[MoodLogEntry]> {
        ensure_not_future(date, today)?;
        let day_entries = self
            .db
            .with_conn(|conn| SqliteMoodRepository::try_new(conn)?.list_by_date(date))?;
        self.selected = date;
        self.day_entries = day_entries;
        if !self.form.is_editing() {
            self.form.date = date;
        }
        Ok(&self.day_entries)
    }

    /// Full reload of the log, the index and the selected day.
    pub fn refresh(&mut self) -> ServiceResult<()> {
        let selected = self.selected;
        let (entries, day_entries) = self.db.with_conn(|conn| -> ServiceResult<_> {
            let repo = SqliteMoodRepository::try_new(conn)?;
            Ok((repo.list_all()?, repo.list_by_date(selected)?))
        })?;
        self.index = DateIndex::from_mood_entries(&entries);
        self.entries = entries;
        self.day_entries = day_entries;
        Ok(())
    }

    /// Resets the form for a new entry on the selected date.
    pub fn begin_add(&mut self) -> &mut MoodForm {
        self.form = MoodForm::blank(self.selected);
        &mut self.form
    }

    /// Prefills the form from an existing entry and selects its date.
    pub fn begin_edit(&mut self, id: EntryId) -> ServiceResult<&mut MoodForm> {
        let entry = self
            .db
            .with_conn(|conn| SqliteMoodRepository::try_new(conn)?.get_entry(id))?
            .ok_or(ServiceError::NotFound {
                category: Category::MoodEntry,
                id,
            })?;
        if entry.date != self.selected {
            let date = entry.date;
            self.day_entries = self
                .db
                .with_conn(|conn| SqliteMoodRepository::try_new(conn)?.list_by_date(date))?;
            self.selected = date;
        }
        self.form = MoodForm {
            editing_id: Some(entry.id),
            date: entry.date,
            mood: entry.mood.emoji().to_string(),
            comment: entry.comment.unwrap_or_default(),
        };
        Ok(&mut self.form)
    }

    pub fn cancel_form(&mut self) {
        self.form = MoodForm::blank(self.selected);
    }

    /// Validates the form and inserts or updates.
    ///
    /// The form is reset on success and kept as-is on failure.
    pub fn save_form(&mut self) -> ServiceResult<EntryId> {
        let comment = Some(self.form.comment.clone());
        let draft = validate_mood_form(self.form.date, self.form.mood.as_str(), comment)?;
        let id = match self.form.editing_id {
            Some(id) => {
                self.update_entry(id, &draft)?;
                id
            }
            None => self.add_entry(&draft)?,
        };
        self.form = MoodForm::blank(self.selected);
        Ok(id)
    }

    pub fn add_entry(&mut self, draft: &MoodDraft) -> ServiceResult<EntryId> {
        let started_at = Instant::now();
        let result = self.mutate(|repo| {
            let id = repo.insert_entry(draft)?;
            Ok((id, vec![draft.date]))
        });
        log_mutation("mood_insert", started_at, &result);
        result
    }

    /// Replaces every field of entry `id`.
    pub fn update_entry(&mut self, id: EntryId, draft: &MoodDraft) -> ServiceResult<()> {
        let started_at = Instant::now();
        let result = self.mutate(|repo| {
            let previous = repo.get_entry(id)?;
            repo.update_entry(id, draft)?;
            let mut affected = vec![draft.date];
            affected.extend(previous.map(|entry| entry.date));
            Ok((id, affected))
        });
        log_mutation("mood_update", started_at, &result);
        result.map(|_| ())
    }

    /// First step of delete: checks the entry exists and returns a token.
    pub fn request_delete(&self, id: EntryId) -> ServiceResult<PendingDelete> {
        let exists = self
            .db
            .with_conn(|conn| SqliteMoodRepository::try_new(conn)?.get_entry(id))?
            .is_some();
        if !exists {
            return Err(ServiceError::NotFound {
                category: Category::MoodEntry,
                id,
            });
        }
        Ok(PendingDelete::new(Category::MoodEntry, id))
    }

    /// Second step of delete: permanently removes the confirmed entry.
    pub fn confirm_delete(&mut self, pending: PendingDelete) -> ServiceResult<()> {
        let id = pending.expect_category(Category::MoodEntry)?;
        let started_at = Instant::now();
        let result = self.mutate(|repo| {
            let previous = repo.get_entry(id)?;
            repo.delete_entry(id)?;
            Ok((id, previous.map(|entry| entry.date).into_iter().collect()))
        });
        log_mutation("mood_delete", started_at, &result);
        if self.form.editing_id == Some(id) {
            self.form = MoodForm::blank(self.selected);
        }
        result.map(|_| ())
    }

    /// The full log in list order, flattened for the report sink.
    pub fn report(&self) -> ReportTable {
        mood_report(&self.entries)
    }

    pub fn export(&self, sink: &mut dyn ReportSink) -> ExportOutcome {
        publish_report(sink, &self.report())
    }

    fn mutate<T>(
        &mut self,
        op: impl FnOnce(&SqliteMoodRepository<'_>) -> RepoResult<(T, Vec<NaiveDate>)>,
    ) -> ServiceResult<T> {
        let db = Arc::clone(&self.db);
        let _gate = db.write_gate(Category::MoodEntry);
        let selected = self.selected;

        let (value, entries, day_entries) = db.with_conn(|conn| -> ServiceResult<_> {
            let repo = SqliteMoodRepository::try_new(conn)?;
            let (value, affected) = op(&repo)?;
            let entries = repo.list_all()?;
            let day_entries = if affected.contains(&selected) {
                Some(repo.list_by_date(selected)?)
            } else {
                None
            };
            Ok((value, entries, day_entries))
        })?;

        self.index = DateIndex::from_mood_entries(&entries);
        self.entries = entries;
        if let Some(day_entries) = day_entries {
            self.day_entries = day_entries;
        }
        Ok(value)
    }
}
