//! Process-wide storage handle.
//!
//! # Responsibility
//! - Own the one SQLite connection shared by every core component.
//! - Provide one write gate per category so a mutation and the index/slot
//!   recompute that follows it form a single critical section.
//! - Expose an explicit close step for the end of the process lifecycle.
//!
//! # Invariants
//! - The connection lock is held for one statement group at a time.
//! - Lock order is always gate -> connection; no caller holds two gates.

use super::{DbError, DbResult};
use crate::model::Category;
use log::{info, warn};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    Memory,
}

impl DbLocation {
    pub fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path.as_path()),
            Self::Memory => None,
        }
    }
}

/// Guard for the single in-flight mutation of one category.
///
/// Dropping the guard releases the gate.
pub struct WriteGate<'db> {
    category: Category,
    _guard: MutexGuard<'db, ()>,
}

impl WriteGate<'_> {
    pub fn category(&self) -> Category {
        self.category
    }
}

/// Shared SQLite handle passed explicitly into every service.
pub struct Database {
    conn: Mutex<Connection>,
    gates: [Mutex<()>; Category::COUNT],
    location: DbLocation,
}

impl Database {
    pub(super) fn new(conn: Connection, location: DbLocation) -> Self {
        Self {
            conn: Mutex::new(conn),
            gates: [Mutex::new(()), Mutex::new(()), Mutex::new(())],
            location,
        }
    }

    pub fn location(&self) -> &DbLocation {
        &self.location
    }

    /// Runs `f` with exclusive access to the connection.
    ///
    /// A poisoned lock is recovered and logged.
    pub fn with_conn<T, E>(&self, f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E> {
        let conn = self.conn.lock().unwrap_or_else(|poisoned| {
            warn!("event=db_lock module=db status=recovered reason=poisoned");
            PoisonError::into_inner(poisoned)
        });
        f(&conn)
    }

    /// Acquires the write gate for `category`, blocking until any in-flight
    /// mutation of the same category has settled.
    pub fn write_gate(&self, category: Category) -> WriteGate<'_> {
        let guard = self.gates[category.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        WriteGate {
            category,
            _guard: guard,
        }
    }

    /// Closes the underlying connection.
    ///
    /// # Side effects
    /// - Flushes and releases the SQLite file handle.
    /// - Emits a `db_close` event.
    pub fn close(self) -> DbResult<()> {
        let mode = self.location.mode();
        let conn = self
            .conn
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        match conn.close() {
            Ok(()) => {
                info!("event=db_close module=db status=ok mode={mode}");
                Ok(())
            }
            Err((_conn, err)) => {
                warn!("event=db_close module=db status=error mode={mode} error={err}");
                Err(DbError::Sqlite(err))
            }
        }
    }
}
