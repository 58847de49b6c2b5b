//! User profile (singleton) records.
//!
//! # Invariants
//! - Only the first stored row is meaningfully used.
//! - Persisted `blood_type` is canonical uppercase, `email` is lowercase.
//! - `NewProfile` can only be produced by validation; see `crate::validation`.

use super::EntryId;
use serde::{Deserialize, Serialize};

/// Display name used when no profile has been registered.
pub const DEFAULT_DISPLAY_NAME: &str = "Guest";

/// Canonical ABO/Rh blood type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodType {
    APos,
    ANeg,
    BPos,
    BNeg,
    AbPos,
    AbNeg,
    OPos,
    ONeg,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APos,
        BloodType::ANeg,
        BloodType::BPos,
        BloodType::BNeg,
        BloodType::AbPos,
        BloodType::AbNeg,
        BloodType::OPos,
        BloodType::ONeg,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::APos => "A+",
            Self::ANeg => "A-",
            Self::BPos => "B+",
            Self::BNeg => "B-",
            Self::AbPos => "AB+",
            Self::AbNeg => "AB-",
            Self::OPos => "O+",
            Self::ONeg => "O-",
        }
    }

    /// Case-insensitive code lookup (`"o+"` -> `O+`).
    pub fn parse(value: &str) -> Option<Self> {
        let upper = value.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|kind| kind.code() == upper)
    }
}

/// Raw registration form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub full_name: String,
    pub contact: String,
    pub blood_type: String,
    pub email: String,
    pub dob: String,
}

/// Validated and normalized profile fields, ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProfile {
    pub(crate) full_name: String,
    pub(crate) contact: String,
    pub(crate) blood_type: BloodType,
    pub(crate) email: String,
    pub(crate) dob: String,
}

impl NewProfile {
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }

    pub fn blood_type(&self) -> BloodType {
        self.blood_type
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn dob(&self) -> &str {
        &self.dob
    }
}

/// One persisted profile row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: EntryId,
    pub full_name: String,
    pub contact: String,
    pub blood_type: BloodType,
    pub email: String,
    pub dob: String,
}

/// Greeting name for the home view, falling back to `DEFAULT_DISPLAY_NAME`.
pub fn display_name(profile: Option<&UserProfile>) -> &str {
    profile
        .map(|profile| profile.full_name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_DISPLAY_NAME)
}
