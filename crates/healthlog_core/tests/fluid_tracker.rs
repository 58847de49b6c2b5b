use chrono::{NaiveDate, NaiveDateTime};
use healthlog_core::db::open_db_in_memory;
use healthlog_core::repo::fluid_repo::{FluidIntakeRepository, SqliteFluidRepository};
use healthlog_core::{
    Category, FluidIntakeDraft, FluidTracker, RepoError, ServiceError, SlotReading,
};
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(day: NaiveDate, h: u32, min: u32) -> NaiveDateTime {
    day.and_hms_opt(h, min, 0).unwrap()
}

fn today() -> NaiveDate {
    date(2024, 6, 30)
}

fn tracker() -> FluidTracker {
    let db = Arc::new(open_db_in_memory().unwrap());
    FluidTracker::open(db, today()).unwrap()
}

#[test]
fn insert_then_list_by_date_round_trips_fields() {
    let db = open_db_in_memory().unwrap();
    let day = date(2024, 1, 1);
    db.with_conn(|conn| {
        let repo = SqliteFluidRepository::try_new(conn)?;
        let id = repo.insert_entry(&FluidIntakeDraft::new("250", at(day, 9, 5)))?;
        let entries = repo.list_by_date(day)?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, id);
        assert_eq!(entries[0].amount, "250");
        assert_eq!(entries[0].timestamp, at(day, 9, 5));
        Ok::<_, RepoError>(())
    })
    .unwrap();
}

#[test]
fn list_all_orders_most_recent_first() {
    let db = open_db_in_memory().unwrap();
    db.with_conn(|conn| {
        let repo = SqliteFluidRepository::try_new(conn)?;
        repo.insert_entry(&FluidIntakeDraft::new("1", at(date(2024, 1, 1), 9, 0)))?;
        repo.insert_entry(&FluidIntakeDraft::new("2", at(date(2024, 1, 3), 9, 0)))?;
        repo.insert_entry(&FluidIntakeDraft::new("3", at(date(2024, 1, 2), 9, 0)))?;
        let amounts: Vec<String> = repo.list_all()?.into_iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec!["2", "3", "1"]);
        Ok::<_, RepoError>(())
    })
    .unwrap();
}

#[test]
fn two_morning_entries_sum_into_first_slot() {
    let mut tracker = tracker();
    let day = date(2024, 1, 1);
    tracker.select_date(day, today()).unwrap();

    tracker
        .add_entry(&FluidIntakeDraft::new("250", at(day, 9, 0)))
        .unwrap();
    tracker
        .add_entry(&FluidIntakeDraft::new("100", at(day, 9, 30)))
        .unwrap();

    let aggregate = &tracker.day().aggregate;
    assert_eq!(aggregate.series(), [350.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    assert_eq!(aggregate.slots[0], SlotReading::Value(350.0));
    assert_eq!(aggregate.slots[1], SlotReading::Absent);
    assert_eq!(tracker.day().entries.len(), 2);
    assert!(tracker.index().is_marked(day));
}

#[test]
fn entries_outside_slot_hours_are_listed_but_not_charted() {
    let mut tracker = tracker();
    let day = date(2024, 1, 2);
    tracker.select_date(day, today()).unwrap();

    tracker
        .add_entry(&FluidIntakeDraft::new("300", at(day, 7, 59)))
        .unwrap();
    tracker
        .add_entry(&FluidIntakeDraft::new("400", at(day, 20, 0)))
        .unwrap();

    let fluid_day = tracker.day();
    assert_eq!(fluid_day.entries.len(), 2);
    assert_eq!(fluid_day.aggregate.excluded, 2);
    assert!(!fluid_day.aggregate.has_slot_data());
    assert_eq!(fluid_day.aggregate.total(), 0.0);
}

#[test]
fn delete_clears_marker_only_after_last_entry_of_date() {
    let mut tracker = tracker();
    let day = date(2024, 2, 1);
    tracker.select_date(day, today()).unwrap();
    let first = tracker
        .add_entry(&FluidIntakeDraft::new("100", at(day, 8, 0)))
        .unwrap();
    let second = tracker
        .add_entry(&FluidIntakeDraft::new("200", at(day, 12, 0)))
        .unwrap();

    let pending = tracker.request_delete(first).unwrap();
    tracker.confirm_delete(pending).unwrap();
    assert!(tracker.index().is_marked(day));
    assert_eq!(tracker.day().entries.len(), 1);

    let pending = tracker.request_delete(second).unwrap();
    tracker.confirm_delete(pending).unwrap();
    assert!(!tracker.index().is_marked(day));
    assert!(tracker.day().entries.is_empty());
    assert!(!tracker.day().aggregate.has_entries());
}

#[test]
fn update_replaces_amount_and_timestamp() {
    let mut tracker = tracker();
    let old_day = date(2024, 3, 1);
    let new_day = date(2024, 3, 2);
    tracker.select_date(old_day, today()).unwrap();
    let id = tracker
        .add_entry(&FluidIntakeDraft::new("100", at(old_day, 9, 0)))
        .unwrap();

    tracker
        .update_entry(id, &FluidIntakeDraft::new("500", at(new_day, 15, 45)))
        .unwrap();

    assert!(!tracker.index().is_marked(old_day));
    assert!(tracker.index().is_marked(new_day));
    assert!(tracker.day().entries.is_empty());

    tracker.select_date(new_day, today()).unwrap();
    let entry = &tracker.day().entries[0];
    assert_eq!(entry.id, id);
    assert_eq!(entry.amount, "500");
    assert_eq!(entry.timestamp, at(new_day, 15, 45));
    assert_eq!(tracker.day().aggregate.slots[3], SlotReading::Value(500.0));
}

#[test]
fn missing_ids_report_not_found() {
    let mut tracker = tracker();
    let draft = FluidIntakeDraft::new("100", at(date(2024, 1, 1), 9, 0));

    match tracker.update_entry(999, &draft) {
        Err(ServiceError::NotFound { category, id }) => {
            assert_eq!(category, Category::FluidIntake);
            assert_eq!(id, 999);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(matches!(
        tracker.request_delete(999),
        Err(ServiceError::NotFound { .. })
    ));
    assert!(matches!(
        tracker.begin_edit(999),
        Err(ServiceError::NotFound { .. })
    ));
}

#[test]
fn form_flow_saves_on_selected_date_and_edits_in_place() {
    let mut tracker = tracker();
    let day = date(2024, 4, 4);
    tracker.select_date(day, today()).unwrap();

    let form = tracker.begin_add();
    assert_eq!(form.time_of_day, "12:00");
    form.amount = "330".to_string();
    form.time_of_day = "10:15".to_string();
    let id = tracker.save_form().unwrap();
    assert!(!tracker.form().is_editing());

    let form = tracker.begin_edit(id).unwrap();
    assert_eq!(form.amount, "330");
    assert_eq!(form.time_of_day, "10:15");
    form.amount = "abc".to_string();
    tracker.save_form().unwrap();

    let entry = &tracker.day().entries[0];
    assert_eq!(entry.amount, "abc");
    assert_eq!(tracker.day().aggregate.slots[1], SlotReading::Zero);
}

#[test]
fn invalid_form_keeps_input_and_writes_nothing() {
    let mut tracker = tracker();
    let form = tracker.begin_add();
    form.amount = "250".to_string();
    form.time_of_day = "25:00".to_string();

    let err = tracker.save_form().unwrap_err();
    assert_eq!(
        err.alert_message(),
        "Please enter a valid amount and time in HH:MM format."
    );
    assert_eq!(tracker.form().amount, "250");
    assert!(tracker.index().is_empty());
}

#[test]
fn future_dates_cannot_be_selected() {
    let mut tracker = tracker();
    let err = tracker.select_date(date(2024, 7, 1), today()).unwrap_err();
    assert!(matches!(err, ServiceError::FutureDate(_)));
    assert_eq!(tracker.selected_date(), today());
}

#[test]
fn marked_dates_merge_selection_with_presence() {
    let mut tracker = tracker();
    let day = date(2024, 5, 5);
    tracker.select_date(day, today()).unwrap();
    tracker
        .add_entry(&FluidIntakeDraft::new("100", at(day, 9, 0)))
        .unwrap();
    tracker.select_date(date(2024, 5, 6), today()).unwrap();

    let marks = tracker.marked_dates();
    assert!(marks["2024-05-05"].marked);
    assert!(!marks["2024-05-05"].selected);
    assert!(!marks["2024-05-06"].marked);
    assert!(marks["2024-05-06"].selected);
    assert_eq!(marks["2024-05-06"].selected_color, Some("blue"));
}

#[test]
fn trackers_sharing_a_handle_see_each_others_writes() {
    let db = Arc::new(open_db_in_memory().unwrap());
    let day = date(2024, 1, 10);
    let mut writer = FluidTracker::open(Arc::clone(&db), today()).unwrap();
    let mut reader = FluidTracker::open(Arc::clone(&db), today()).unwrap();

    writer.select_date(day, today()).unwrap();
    writer
        .add_entry(&FluidIntakeDraft::new("120", at(day, 11, 0)))
        .unwrap();
    assert!(!reader.index().is_marked(day));

    reader.refresh().unwrap();
    assert!(reader.index().is_marked(day));
}

#[test]
fn concurrent_inserts_all_land() {
    let db = Arc::new(open_db_in_memory().unwrap());
    let day = date(2024, 1, 20);
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let db = Arc::clone(&db);
            std::thread::spawn(move || {
                let mut tracker = FluidTracker::open(db, today()).unwrap();
                tracker.select_date(day, today()).unwrap();
                for _ in 0..5 {
                    tracker
                        .add_entry(&FluidIntakeDraft::new("10", at(day, 8 + worker, 0)))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut tracker = FluidTracker::open(db, today()).unwrap();
    tracker.select_date(day, today()).unwrap();
    assert_eq!(tracker.day().entries.len(), 20);
    assert_eq!(tracker.day().aggregate.total(), 200.0);
}
