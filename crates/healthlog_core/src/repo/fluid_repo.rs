//! Fluid intake repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `list_by_date` matches on the local date of the parsed `timestamp`, the
//!   same date the index and slot aggregation use. RFC 3339 rows written in
//!   UTC can therefore belong to the neighbouring day of their text prefix.
//! - Ordering compares parsed timestamps, not stored text, since legacy UTC
//!   strings and local strings do not sort together.
//! - `list_all` is ordered most-recent-first (`timestamp DESC, id DESC`).
//! - Updates replace both `amount` and `timestamp`.

use super::{ensure_changed, RepoError, RepoResult};
use crate::db::schema::ensure_schema;
use crate::model::fluid::{FluidIntakeDraft, FluidIntakeEntry};
use crate::model::time::{format_date, format_timestamp, parse_timestamp};
use crate::model::{Category, EntryId};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const FLUID_SELECT_SQL: &str = "SELECT
    id,
    amount,
    timestamp
FROM water_intake";

/// Repository interface for fluid intake CRUD.
pub trait FluidIntakeRepository {
    fn insert_entry(&self, draft: &FluidIntakeDraft) -> RepoResult<EntryId>;
    fn update_entry(&self, id: EntryId, draft: &FluidIntakeDraft) -> RepoResult<()>;
    fn delete_entry(&self, id: EntryId) -> RepoResult<()>;
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<FluidIntakeEntry>>;
    fn list_all(&self) -> RepoResult<Vec<FluidIntakeEntry>>;
    fn list_by_date(&self, date: NaiveDate) -> RepoResult<Vec<FluidIntakeEntry>>;
}

/// SQLite-backed fluid intake repository.
pub struct SqliteFluidRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFluidRepository<'conn> {
    /// Constructs a repository after ensuring `water_intake` exists.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn, Category::FluidIntake)?;
        Ok(Self { conn })
    }

    fn query_entries(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Vec<FluidIntakeEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_fluid_row(row)?);
        }
        Ok(entries)
    }
}

impl FluidIntakeRepository for SqliteFluidRepository<'_> {
    fn insert_entry(&self, draft: &FluidIntakeDraft) -> RepoResult<EntryId> {
        self.conn.execute(
            "INSERT INTO water_intake (amount, timestamp) VALUES (?1, ?2);",
            params![draft.amount.as_str(), format_timestamp(draft.timestamp)],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_entry(&self, id: EntryId, draft: &FluidIntakeDraft) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE water_intake
             SET
                amount = ?1,
                timestamp = ?2
             WHERE id = ?3;",
            params![draft.amount.as_str(), format_timestamp(draft.timestamp), id],
        )?;
        ensure_changed(changed, Category::FluidIntake, id)
    }

    fn delete_entry(&self, id: EntryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM water_intake WHERE id = ?1;", [id])?;
        ensure_changed(changed, Category::FluidIntake, id)
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<FluidIntakeEntry>> {
        let mut entries =
            self.query_entries(&format!("{FLUID_SELECT_SQL} WHERE id = ?1;"), [id])?;
        Ok(entries.pop())
    }

    fn list_all(&self) -> RepoResult<Vec<FluidIntakeEntry>> {
        let mut entries = self.query_entries(FLUID_SELECT_SQL, [])?;
        entries.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }

    fn list_by_date(&self, date: NaiveDate) -> RepoResult<Vec<FluidIntakeEntry>> {
        // A UTC offset never moves an instant by more than one calendar day.
        let first = date.pred_opt().unwrap_or(date);
        let last = date.succ_opt().unwrap_or(date);
        let mut entries = self.query_entries(
            &format!("{FLUID_SELECT_SQL} WHERE substr(timestamp, 1, 10) BETWEEN ?1 AND ?2;"),
            [format_date(first), format_date(last)],
        )?;
        entries.retain(|entry| entry.date() == date);
        entries.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(entries)
    }
}

fn parse_fluid_row(row: &Row<'_>) -> RepoResult<FluidIntakeEntry> {
    let id: EntryId = row.get("id")?;
    let timestamp_text: Option<String> = row.get("timestamp")?;
    let timestamp = timestamp_text
        .as_deref()
        .and_then(parse_timestamp)
        .ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid timestamp `{}` in water_intake.timestamp (id={id})",
                timestamp_text.as_deref().unwrap_or("NULL")
            ))
        })?;
    let amount = read_amount(row)?;

    Ok(FluidIntakeEntry {
        id,
        amount,
        timestamp,
    })
}

/// `amount` may hold TEXT, INTEGER or REAL depending on the writer.
fn read_amount(row: &Row<'_>) -> RepoResult<String> {
    use rusqlite::types::ValueRef;

    let amount = match row.get_ref("amount")? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(value) => value.to_string(),
        ValueRef::Real(value) => value.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            String::from_utf8_lossy(bytes).into_owned()
        }
    };
    Ok(amount)
}
