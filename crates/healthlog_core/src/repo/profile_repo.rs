//! User profile repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Writes only accept `NewProfile`, i.e. validated and normalized input.
//! - `first_profile` returns the lowest-id row or `None` when empty.
//! - Column names keep the camelCase layout of the existing table.

use super::{ensure_changed, RepoError, RepoResult};
use crate::db::schema::ensure_schema;
use crate::model::profile::{BloodType, NewProfile, UserProfile};
use crate::model::{Category, EntryId};
use rusqlite::{params, Connection, Row};

const PROFILE_SELECT_SQL: &str = "SELECT
    id,
    fullName,
    contact,
    bloodType,
    email,
    dob
FROM user_profile";

/// Repository interface for the profile singleton.
pub trait ProfileRepository {
    fn insert_profile(&self, profile: &NewProfile) -> RepoResult<EntryId>;
    fn update_profile(&self, id: EntryId, profile: &NewProfile) -> RepoResult<()>;
    fn delete_profile(&self, id: EntryId) -> RepoResult<()>;
    fn get_profile(&self, id: EntryId) -> RepoResult<Option<UserProfile>>;
    fn first_profile(&self) -> RepoResult<Option<UserProfile>>;
    fn list_profiles(&self) -> RepoResult<Vec<UserProfile>>;
}

/// SQLite-backed profile repository.
pub struct SqliteProfileRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProfileRepository<'conn> {
    /// Constructs a repository after ensuring `user_profile` exists.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn, Category::Profile)?;
        Ok(Self { conn })
    }
}

impl ProfileRepository for SqliteProfileRepository<'_> {
    fn insert_profile(&self, profile: &NewProfile) -> RepoResult<EntryId> {
        self.conn.execute(
            "INSERT INTO user_profile (fullName, contact, bloodType, email, dob)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                profile.full_name(),
                profile.contact(),
                profile.blood_type().code(),
                profile.email(),
                profile.dob(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_profile(&self, id: EntryId, profile: &NewProfile) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE user_profile
             SET
                fullName = ?1,
                contact = ?2,
                bloodType = ?3,
                email = ?4,
                dob = ?5
             WHERE id = ?6;",
            params![
                profile.full_name(),
                profile.contact(),
                profile.blood_type().code(),
                profile.email(),
                profile.dob(),
                id,
            ],
        )?;
        ensure_changed(changed, Category::Profile, id)
    }

    fn delete_profile(&self, id: EntryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM user_profile WHERE id = ?1;", [id])?;
        ensure_changed(changed, Category::Profile, id)
    }

    fn get_profile(&self, id: EntryId) -> RepoResult<Option<UserProfile>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROFILE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_profile_row(row)?));
        }
        Ok(None)
    }

    fn first_profile(&self) -> RepoResult<Option<UserProfile>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROFILE_SELECT_SQL} ORDER BY id ASC LIMIT 1;"))?;
        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_profile_row(row)?));
        }
        Ok(None)
    }

    fn list_profiles(&self) -> RepoResult<Vec<UserProfile>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROFILE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut profiles = Vec::new();
        while let Some(row) = rows.next()? {
            profiles.push(parse_profile_row(row)?);
        }
        Ok(profiles)
    }
}

fn parse_profile_row(row: &Row<'_>) -> RepoResult<UserProfile> {
    let id: EntryId = row.get("id")?;
    let blood_text: Option<String> = row.get("bloodType")?;
    let blood_type = blood_text
        .as_deref()
        .and_then(BloodType::parse)
        .ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid blood type `{}` in user_profile.bloodType (id={id})",
                blood_text.as_deref().unwrap_or("NULL")
            ))
        })?;

    Ok(UserProfile {
        id,
        full_name: row.get::<_, Option<String>>("fullName")?.unwrap_or_default(),
        contact: row.get::<_, Option<String>>("contact")?.unwrap_or_default(),
        blood_type,
        email: row.get::<_, Option<String>>("email")?.unwrap_or_default(),
        dob: row.get::<_, Option<String>>("dob")?.unwrap_or_default(),
    })
}
