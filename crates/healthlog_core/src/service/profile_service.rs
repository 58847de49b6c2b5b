//! Profile use-case service.
//!
//! # Responsibility
//! - Validate registration/profile input before any write.
//! - Keep the profile a singleton: registering again updates the first row.
//! - Resolve the home-view display name with a `Guest` fallback.
//!
//! # Invariants
//! - Validation errors never reach the store.
//! - Profile fields are never written to logs.

use super::{log_mutation, PendingDelete, ServiceError, ServiceResult};
use crate::db::Database;
use crate::model::profile::{display_name, ProfileDraft, UserProfile, DEFAULT_DISPLAY_NAME};
use crate::model::{Category, EntryId};
use crate::repo::profile_repo::{ProfileRepository, SqliteProfileRepository};
use crate::validation::validate_profile;
use log::{info, warn};
use std::sync::Arc;
use std::time::Instant;

/// Profile service over the shared database handle.
pub struct ProfileService {
    db: Arc<Database>,
}

impl ProfileService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Ensures the profile table exists; safe to call on every activation.
    pub fn ensure_ready(&self) -> ServiceResult<()> {
        self.db
            .with_conn(|conn| SqliteProfileRepository::try_new(conn).map(|_| ()))?;
        Ok(())
    }

    /// First stored profile, or `None` when nobody registered yet.
    pub fn current(&self) -> ServiceResult<Option<UserProfile>> {
        let profile = self
            .db
            .with_conn(|conn| SqliteProfileRepository::try_new(conn)?.first_profile())?;
        Ok(profile)
    }

    /// Greeting name; any store failure falls back to the default name.
    pub fn display_name(&self) -> String {
        match self.current() {
            Ok(profile) => display_name(profile.as_ref()).to_string(),
            Err(err) => {
                warn!(
                    "event=profile_display_name module=service status=fallback error={}",
                    err
                );
                DEFAULT_DISPLAY_NAME.to_string()
            }
        }
    }

    /// Validates `draft` and stores it as the singleton profile.
    ///
    /// Inserts when no profile exists, otherwise replaces every field of the
    /// first row.
    ///
    /// # Errors
    /// - `Validation` with the first violated rule; nothing is written.
    pub fn register(&self, draft: &ProfileDraft) -> ServiceResult<UserProfile> {
        let profile = validate_profile(draft)?;
        let started_at = Instant::now();
        let _gate = self.db.write_gate(Category::Profile);

        let result = self.db.with_conn(|conn| -> ServiceResult<UserProfile> {
            let repo = SqliteProfileRepository::try_new(conn)?;
            let id = match repo.first_profile()? {
                Some(existing) => {
                    repo.update_profile(existing.id, &profile)?;
                    existing.id
                }
                None => repo.insert_profile(&profile)?,
            };
            repo.get_profile(id)?
                .ok_or(ServiceError::InconsistentState(
                    "registered profile not found in read-back",
                ))
        });
        log_mutation("profile_register", started_at, &result);
        result
    }

    /// Validates `draft` and replaces every field of profile `id`.
    pub fn update(&self, id: EntryId, draft: &ProfileDraft) -> ServiceResult<UserProfile> {
        let profile = validate_profile(draft)?;
        let started_at = Instant::now();
        let _gate = self.db.write_gate(Category::Profile);

        let result = self.db.with_conn(|conn| -> ServiceResult<UserProfile> {
            let repo = SqliteProfileRepository::try_new(conn)?;
            repo.update_profile(id, &profile)?;
            repo.get_profile(id)?
                .ok_or(ServiceError::InconsistentState(
                    "updated profile not found in read-back",
                ))
        });
        log_mutation("profile_update", started_at, &result);
        result
    }

    /// First step of delete: checks the profile exists and returns a token.
    pub fn request_delete(&self, id: EntryId) -> ServiceResult<PendingDelete> {
        let exists = self
            .db
            .with_conn(|conn| SqliteProfileRepository::try_new(conn)?.get_profile(id))?
            .is_some();
        if !exists {
            return Err(ServiceError::NotFound {
                category: Category::Profile,
                id,
            });
        }
        Ok(PendingDelete::new(Category::Profile, id))
    }

    /// Second step of delete: permanently removes the confirmed profile.
    pub fn confirm_delete(&self, pending: PendingDelete) -> ServiceResult<()> {
        let id = pending.expect_category(Category::Profile)?;
        let _gate = self.db.write_gate(Category::Profile);
        self.db
            .with_conn(|conn| SqliteProfileRepository::try_new(conn)?.delete_profile(id))?;
        info!("event=profile_delete module=service status=ok id={id}");
        Ok(())
    }
}
