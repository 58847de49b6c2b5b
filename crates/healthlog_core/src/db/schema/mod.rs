//! Per-category table creation.
//!
//! # Responsibility
//! - Register the DDL for every category table.
//! - Create tables with `IF NOT EXISTS` so activation can call this freely.
//!
//! # Invariants
//! - `ensure_schema` is idempotent: N calls leave the same state as one.
//! - Column names/types match the layout written by earlier clients.
//! - `AUTOINCREMENT` keeps ids monotonic and never reused after delete.

use crate::db::{DbError, DbResult};
use crate::model::Category;
use log::{debug, error};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct TableSchema {
    category: Category,
    sql: &'static str,
}

const SCHEMAS: &[TableSchema] = &[
    TableSchema {
        category: Category::FluidIntake,
        sql: include_str!("water_intake.sql"),
    },
    TableSchema {
        category: Category::MoodEntry,
        sql: include_str!("mood_log.sql"),
    },
    TableSchema {
        category: Category::Profile,
        sql: include_str!("user_profile.sql"),
    },
];

/// Creates the table for `category` when it does not exist yet.
pub fn ensure_schema(conn: &Connection, category: Category) -> DbResult<()> {
    let Some(schema) = SCHEMAS.iter().find(|schema| schema.category == category) else {
        return Ok(());
    };

    match conn.execute_batch(schema.sql) {
        Ok(()) => {
            debug!(
                "event=ensure_schema module=db status=ok table={}",
                category.table_name()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=ensure_schema module=db status=error table={} error_code=schema_failed error={}",
                category.table_name(),
                err
            );
            Err(DbError::Schema {
                category,
                source: err,
            })
        }
    }
}

/// Creates every category table.
pub fn ensure_all_schemas(conn: &Connection) -> DbResult<()> {
    for category in Category::ALL {
        ensure_schema(conn, category)?;
    }
    Ok(())
}

/// Returns whether the table for `category` exists.
pub fn table_exists(conn: &Connection, category: Category) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [category.table_name()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
