//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `healthlog_core` linkage.
//! - Optionally summarize one day of a database: `healthlog_cli [DB_PATH] [YYYY-MM-DD]`.
//! - Keep output deterministic for quick local sanity checks.

use chrono::NaiveDate;
use healthlog_core::model::time::{format_date, parse_date, today};
use healthlog_core::{open_db, FluidTracker, MoodJournal, ProfileService};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    println!("healthlog_core version={}", healthlog_core::core_version());

    let mut args = std::env::args().skip(1);
    let Some(db_path) = args.next() else {
        return ExitCode::SUCCESS;
    };
    let today = today();
    let date = match args.next() {
        Some(raw) => match parse_date(&raw) {
            Some(date) => date,
            None => {
                eprintln!("invalid date `{raw}`; expected YYYY-MM-DD");
                return ExitCode::FAILURE;
            }
        },
        None => today,
    };

    match summarize(&db_path, date, today) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn summarize(
    db_path: &str,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<(), String> {
    let db = Arc::new(open_db(db_path).map_err(|err| format!("db open failed: {err}"))?);

    let mut tracker =
        FluidTracker::open(Arc::clone(&db), today).map_err(|err| err.to_string())?;
    let day = tracker
        .select_date(date, today)
        .map_err(|err| err.to_string())?;
    println!("date={}", format_date(day.date));
    println!("fluid_entries={}", day.entries.len());
    println!("fluid_series={:?}", day.aggregate.series());
    println!("fluid_excluded={}", day.aggregate.excluded);

    let journal = MoodJournal::open(Arc::clone(&db), date).map_err(|err| err.to_string())?;
    println!("mood_entries={}", journal.day_entries().len());
    println!("marked_mood_dates={}", journal.index().len());

    println!("display_name={}", ProfileService::new(db).display_name());
    Ok(())
}
