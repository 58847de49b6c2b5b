use chrono::NaiveDate;
use healthlog_core::index::FLUID_PALETTE;
use healthlog_core::{aggregate_day, DateIndex, FluidIntakeEntry};
use serde_json::json;

#[test]
fn marked_dates_serialize_with_calendar_keys() {
    let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let index = DateIndex::build([day], FLUID_PALETTE);

    let value = serde_json::to_value(index.marked_dates(day)).unwrap();

    assert_eq!(
        value,
        json!({
            "2024-01-01": {
                "marked": true,
                "dotColor": "blue",
                "selected": true,
                "selectedColor": "blue"
            }
        })
    );
}

#[test]
fn slot_readings_keep_absent_and_zero_apart() {
    let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let entries = [
        FluidIntakeEntry {
            id: 1,
            amount: "0".to_string(),
            timestamp: day.and_hms_opt(8, 30, 0).unwrap(),
        },
        FluidIntakeEntry {
            id: 2,
            amount: "200".to_string(),
            timestamp: day.and_hms_opt(10, 0, 0).unwrap(),
        },
    ];

    let value = serde_json::to_value(aggregate_day(day, &entries).slots).unwrap();

    assert_eq!(value[0], json!({ "state": "zero" }));
    assert_eq!(value[1], json!({ "state": "value", "value": 200.0 }));
    assert_eq!(value[2], json!({ "state": "absent" }));
}
