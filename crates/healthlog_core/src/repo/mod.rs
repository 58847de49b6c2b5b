//! Record store: per-category repository contracts and SQLite
//! implementations.
//!
//! # Responsibility
//! - Define typed CRUD contracts for fluid intake, mood log and profile.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Constructors ensure the category table exists before first use.
//! - `update`/`delete` against a missing id return `RepoError::NotFound`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::{Category, EntryId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod fluid_repo;
pub mod mood_repo;
pub mod profile_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound { category: Category, id: EntryId },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { category, id } => {
                write!(f, "{} entry not found: {id}", category.as_str())
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn ensure_changed(changed: usize, category: Category, id: EntryId) -> RepoResult<()> {
    if changed == 0 {
        return Err(RepoError::NotFound { category, id });
    }
    Ok(())
}
