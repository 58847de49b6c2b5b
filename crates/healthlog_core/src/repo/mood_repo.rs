//! Mood log repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `list_all` is ordered `date DESC, id DESC` (most recent first).
//! - `list_by_date` returns the same ordering restricted to one day.
//! - Updates replace `date`, `mood` and `comment` together.

use super::{ensure_changed, RepoError, RepoResult};
use crate::db::schema::ensure_schema;
use crate::model::mood::{normalize_comment, MoodDraft, MoodLevel, MoodLogEntry};
use crate::model::time::{format_date, parse_date};
use crate::model::{Category, EntryId};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const MOOD_SELECT_SQL: &str = "SELECT
    id,
    date,
    mood,
    comment
FROM mood_log";

/// Repository interface for mood log CRUD.
pub trait MoodLogRepository {
    fn insert_entry(&self, draft: &MoodDraft) -> RepoResult<EntryId>;
    fn update_entry(&self, id: EntryId, draft: &MoodDraft) -> RepoResult<()>;
    fn delete_entry(&self, id: EntryId) -> RepoResult<()>;
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<MoodLogEntry>>;
    fn list_all(&self) -> RepoResult<Vec<MoodLogEntry>>;
    fn list_by_date(&self, date: NaiveDate) -> RepoResult<Vec<MoodLogEntry>>;
}

/// SQLite-backed mood log repository.
pub struct SqliteMoodRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMoodRepository<'conn> {
    /// Constructs a repository after ensuring `mood_log` exists.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn, Category::MoodEntry)?;
        Ok(Self { conn })
    }

    fn query_entries(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Vec<MoodLogEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_mood_row(row)?);
        }
        Ok(entries)
    }
}

impl MoodLogRepository for SqliteMoodRepository<'_> {
    fn insert_entry(&self, draft: &MoodDraft) -> RepoResult<EntryId> {
        self.conn.execute(
            "INSERT INTO mood_log (date, mood, comment) VALUES (?1, ?2, ?3);",
            params![
                format_date(draft.date),
                draft.mood.emoji(),
                draft.comment.as_deref(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_entry(&self, id: EntryId, draft: &MoodDraft) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE mood_log
             SET
                date = ?1,
                mood = ?2,
                comment = ?3
             WHERE id = ?4;",
            params![
                format_date(draft.date),
                draft.mood.emoji(),
                draft.comment.as_deref(),
                id,
            ],
        )?;
        ensure_changed(changed, Category::MoodEntry, id)
    }

    fn delete_entry(&self, id: EntryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM mood_log WHERE id = ?1;", [id])?;
        ensure_changed(changed, Category::MoodEntry, id)
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<MoodLogEntry>> {
        let mut entries = self.query_entries(&format!("{MOOD_SELECT_SQL} WHERE id = ?1;"), [id])?;
        Ok(entries.pop())
    }

    fn list_all(&self) -> RepoResult<Vec<MoodLogEntry>> {
        self.query_entries(
            &format!("{MOOD_SELECT_SQL} ORDER BY date DESC, id DESC;"),
            [],
        )
    }

    fn list_by_date(&self, date: NaiveDate) -> RepoResult<Vec<MoodLogEntry>> {
        self.query_entries(
            &format!("{MOOD_SELECT_SQL} WHERE date = ?1 ORDER BY id DESC;"),
            [format_date(date)],
        )
    }
}

fn parse_mood_row(row: &Row<'_>) -> RepoResult<MoodLogEntry> {
    let id: EntryId = row.get("id")?;

    let date_text: Option<String> = row.get("date")?;
    let date = date_text.as_deref().and_then(parse_date).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid date `{}` in mood_log.date (id={id})",
            date_text.as_deref().unwrap_or("NULL")
        ))
    })?;

    let mood_text: Option<String> = row.get("mood")?;
    let mood = mood_text
        .as_deref()
        .and_then(MoodLevel::parse)
        .ok_or_else(|| {
            RepoError::InvalidData(format!("invalid mood in mood_log.mood (id={id})"))
        })?;

    Ok(MoodLogEntry {
        id,
        date,
        mood,
        comment: normalize_comment(row.get("comment")?),
    })
}
