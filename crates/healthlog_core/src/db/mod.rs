//! SQLite storage bootstrap, shared handle and schema entry points.
//!
//! # Responsibility
//! - Open and configure the single SQLite connection used by the core.
//! - Create category tables idempotently before any read/write.
//! - Own the per-category write gates that serialize mutations.
//!
//! # Invariants
//! - Table layout must stay byte-compatible with databases written by
//!   earlier clients (`water_intake`, `mood_log`, `user_profile`).
//! - Core code must not read/write application data before the schema for
//!   that category has been ensured.

use crate::model::Category;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod handle;
mod open;
pub mod schema;

pub use handle::{Database, DbLocation, WriteGate};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Table creation failed for one category.
    Schema {
        category: Category,
        source: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Schema { category, source } => write!(
                f,
                "failed to ensure schema for `{}`: {source}",
                category.table_name()
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Schema { source, .. } => Some(source),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
