//! Field validation and normalization for user-entered forms.
//!
//! # Responsibility
//! - Validate registration/profile input fail-fast, first violation wins.
//! - Normalize accepted values (blood type uppercase, email lowercase).
//! - Validate fluid/mood add-edit forms before they reach the store.
//! - Provide the progressive date-of-birth input formatter.
//!
//! # Invariants
//! - Validation errors never reach the store.
//! - Profile rule order: mandatory fields, full name, contact, blood type,
//!   email, date of birth.
//! - `format_dob_input` is idempotent.

use crate::model::fluid::FluidIntakeDraft;
use crate::model::mood::{MoodDraft, MoodLevel};
use crate::model::profile::{BloodType, NewProfile, ProfileDraft};
use crate::model::time::{at_time_of_day, parse_date, parse_time_of_day};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static FULL_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("valid full name regex"));
static CONTACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+\s()\-]{8,}$").expect("valid contact regex"));
static BLOOD_TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(A|B|AB|O)[+-]$").expect("valid blood type regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static DOB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid dob regex"));
static TIME_OF_DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("valid time regex"));

const DOB_MAX_LEN: usize = 10;

/// First violated profile rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileValidationError {
    MissingFields,
    InvalidFullName,
    InvalidContact,
    InvalidBloodType,
    InvalidEmail,
    InvalidDob,
}

impl Display for ProfileValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::MissingFields => "Please fill in all fields",
            Self::InvalidFullName => "Full Name should only contain letters and spaces",
            Self::InvalidContact => "Please enter a valid phone number",
            Self::InvalidBloodType => "Blood Type should be one of A+, B-, O+, etc.",
            Self::InvalidEmail => "Please enter a valid email address",
            Self::InvalidDob => "Date of Birth must be in YYYY-MM-DD format",
        };
        f.write_str(message)
    }
}

impl Error for ProfileValidationError {}

/// Add/edit form rejection for fluid and mood entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    MissingAmount,
    InvalidTimeOfDay,
    MissingMood,
    UnknownMood,
    /// Selected date is not a real `YYYY-MM-DD` calendar date.
    InvalidDate,
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::MissingAmount | Self::InvalidTimeOfDay => {
                "Please enter a valid amount and time in HH:MM format."
            }
            Self::MissingMood => "Please select a mood",
            Self::UnknownMood => "Unknown mood selection",
            Self::InvalidDate => "Please select a valid date.",
        };
        f.write_str(message)
    }
}

impl Error for FormError {}

/// Validates and normalizes a registration form.
///
/// # Errors
/// - Returns the first violated rule; later rules are not evaluated.
pub fn validate_profile(draft: &ProfileDraft) -> Result<NewProfile, ProfileValidationError> {
    let full_name = draft.full_name.trim();
    let contact = draft.contact.trim();
    let blood_type = draft.blood_type.trim();
    let email = draft.email.trim();
    let dob = draft.dob.trim();

    if [full_name, contact, blood_type, email, dob]
        .iter()
        .any(|value| value.is_empty())
    {
        return Err(ProfileValidationError::MissingFields);
    }
    if !FULL_NAME_RE.is_match(full_name) {
        return Err(ProfileValidationError::InvalidFullName);
    }
    if !CONTACT_RE.is_match(contact) {
        return Err(ProfileValidationError::InvalidContact);
    }
    if !BLOOD_TYPE_RE.is_match(blood_type) {
        return Err(ProfileValidationError::InvalidBloodType);
    }
    let blood_type =
        BloodType::parse(blood_type).ok_or(ProfileValidationError::InvalidBloodType)?;
    if !EMAIL_RE.is_match(email) {
        return Err(ProfileValidationError::InvalidEmail);
    }
    if !DOB_RE.is_match(dob) {
        return Err(ProfileValidationError::InvalidDob);
    }

    Ok(NewProfile {
        full_name: full_name.to_string(),
        contact: contact.to_string(),
        blood_type,
        email: email.to_lowercase(),
        dob: dob.to_string(),
    })
}

/// Progressive formatter for the date-of-birth input field.
///
/// Rules:
/// - Non-digits are stripped.
/// - 5-6 digits render as `YYYY-M[M]`.
/// - 7+ digits render as `YYYY-MM-DD`; digits past the 8th are dropped.
/// - Output never exceeds 10 characters.
pub fn format_dob_input(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    let mut formatted = match digits.len() {
        0..=4 => digits,
        5..=6 => format!("{}-{}", &digits[..4], &digits[4..]),
        _ => {
            let end = digits.len().min(8);
            format!("{}-{}-{}", &digits[..4], &digits[4..6], &digits[6..end])
        }
    };
    formatted.truncate(DOB_MAX_LEN);
    formatted
}

/// Parses a date picked by the caller, rejecting anything but `YYYY-MM-DD`.
pub fn validate_form_date(raw: &str) -> Result<NaiveDate, FormError> {
    parse_date(raw).ok_or(FormError::InvalidDate)
}

/// Validates the fluid add/edit form and builds a draft on `date`.
///
/// The amount is only required to be non-empty; non-numeric text is kept and
/// counted as zero by aggregation.
pub fn validate_fluid_form(
    date: NaiveDate,
    amount: &str,
    time_of_day: &str,
) -> Result<FluidIntakeDraft, FormError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(FormError::MissingAmount);
    }
    let time_of_day = time_of_day.trim();
    if !TIME_OF_DAY_RE.is_match(time_of_day) {
        return Err(FormError::InvalidTimeOfDay);
    }
    let time = parse_time_of_day(time_of_day).ok_or(FormError::InvalidTimeOfDay)?;

    Ok(FluidIntakeDraft::new(amount, at_time_of_day(date, time)))
}

/// Validates the mood add/edit form.
///
/// `mood` accepts the stored emoji or the label; empty means nothing was
/// selected.
pub fn validate_mood_form(
    date: NaiveDate,
    mood: &str,
    comment: Option<String>,
) -> Result<MoodDraft, FormError> {
    if mood.trim().is_empty() {
        return Err(FormError::MissingMood);
    }
    let mood = MoodLevel::parse(mood).ok_or(FormError::UnknownMood)?;
    Ok(MoodDraft::new(date, mood, comment))
}

#[cfg(test)]
mod tests {
    use super::{
        format_dob_input, validate_fluid_form, validate_form_date, validate_mood_form,
        validate_profile, FormError, ProfileValidationError,
    };
    use crate::model::mood::MoodLevel;
    use crate::model::profile::{BloodType, ProfileDraft};
    use chrono::NaiveDate;

    fn valid_draft() -> ProfileDraft {
        ProfileDraft {
            full_name: "Jane Doe".to_string(),
            contact: "+61 (0) 785-254".to_string(),
            blood_type: "o+".to_string(),
            email: "User@X.COM".to_string(),
            dob: "1990-01-01".to_string(),
        }
    }

    #[test]
    fn valid_profile_is_normalized() {
        let profile = validate_profile(&valid_draft()).unwrap();
        assert_eq!(profile.blood_type(), BloodType::OPos);
        assert_eq!(profile.blood_type().code(), "O+");
        assert_eq!(profile.email(), "user@x.com");
        assert_eq!(profile.full_name(), "Jane Doe");
    }

    #[test]
    fn missing_field_wins_over_format_errors() {
        let mut draft = valid_draft();
        draft.full_name = "J4ne".to_string();
        draft.dob = String::new();
        assert_eq!(
            validate_profile(&draft),
            Err(ProfileValidationError::MissingFields)
        );
    }

    #[test]
    fn first_violation_wins() {
        let mut draft = valid_draft();
        draft.contact = "123".to_string();
        draft.email = "not-an-email".to_string();
        assert_eq!(
            validate_profile(&draft),
            Err(ProfileValidationError::InvalidContact)
        );
    }

    #[test]
    fn each_rule_rejects_bad_input() {
        let cases: [(fn(&mut ProfileDraft), ProfileValidationError); 6] = [
            (
                |d| d.full_name = "R2D2".to_string(),
                ProfileValidationError::InvalidFullName,
            ),
            (
                |d| d.full_name = "José Álvares".to_string(),
                ProfileValidationError::InvalidFullName,
            ),
            (
                |d| d.contact = "phone-number".to_string(),
                ProfileValidationError::InvalidContact,
            ),
            (
                |d| d.blood_type = "C+".to_string(),
                ProfileValidationError::InvalidBloodType,
            ),
            (
                |d| d.email = "user@localhost".to_string(),
                ProfileValidationError::InvalidEmail,
            ),
            (
                |d| d.dob = "01/01/1990".to_string(),
                ProfileValidationError::InvalidDob,
            ),
        ];

        for (mutate, expected) in cases {
            let mut draft = valid_draft();
            mutate(&mut draft);
            assert_eq!(validate_profile(&draft), Err(expected));
        }
    }

    #[test]
    fn dob_formatter_inserts_separators_progressively() {
        assert_eq!(format_dob_input("1990"), "1990");
        assert_eq!(format_dob_input("19900"), "1990-0");
        assert_eq!(format_dob_input("199001"), "1990-01");
        assert_eq!(format_dob_input("1990010"), "1990-01-0");
        assert_eq!(format_dob_input("19900101"), "1990-01-01");
        assert_eq!(format_dob_input("1990010199"), "1990-01-01");
        assert_eq!(format_dob_input("1990/01/01"), "1990-01-01");
    }

    #[test]
    fn dob_formatter_is_idempotent() {
        for raw in ["", "19", "19900", "1990010", "19900101", "abc1990-0101xyz"] {
            let once = format_dob_input(raw);
            assert_eq!(format_dob_input(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn fluid_form_requires_amount_and_strict_time() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            validate_fluid_form(date, " ", "12:00"),
            Err(FormError::MissingAmount)
        );
        assert_eq!(
            validate_fluid_form(date, "250", "7:30"),
            Err(FormError::InvalidTimeOfDay)
        );

        let draft = validate_fluid_form(date, "lots", "07:30").unwrap();
        assert_eq!(draft.amount, "lots");
        assert_eq!(draft.date(), date);
    }

    #[test]
    fn form_date_must_be_a_real_calendar_day() {
        assert_eq!(
            validate_form_date(" 2024-02-29 "),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        for raw in ["2023-02-29", "2024-13-45", "2024/01/01", ""] {
            assert_eq!(validate_form_date(raw), Err(FormError::InvalidDate), "{raw:?}");
        }
        assert_eq!(
            FormError::InvalidDate.to_string(),
            "Please select a valid date."
        );
    }

    #[test]
    fn mood_form_requires_a_selection() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            validate_mood_form(date, "", None),
            Err(FormError::MissingMood)
        );
        let draft = validate_mood_form(date, "😊", Some("ok".to_string())).unwrap();
        assert_eq!(draft.mood, MoodLevel::Happy);
        assert_eq!(draft.comment.as_deref(), Some("ok"));
    }
}
