use healthlog_core::db::schema::{ensure_all_schemas, ensure_schema, table_exists};
use healthlog_core::db::{open_db, open_db_in_memory, DbLocation};
use healthlog_core::Category;
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_every_category_table() {
    let db = open_db_in_memory().unwrap();

    assert_eq!(db.location(), &DbLocation::Memory);
    db.with_conn(|conn| {
        for category in Category::ALL {
            assert!(table_exists(conn, category)?, "{}", category.table_name());
        }
        Ok::<_, healthlog_core::DbError>(())
    })
    .unwrap();
}

#[test]
fn reopening_a_file_database_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("healthlog.db");

    let first = open_db(&path).unwrap();
    first
        .with_conn(|conn| {
            conn.execute(
                "INSERT INTO water_intake (amount, timestamp) VALUES ('200', '2024-01-01T09:00:00');",
                [],
            )
        })
        .unwrap();
    first.close().unwrap();

    let second = open_db(&path).unwrap();
    assert_eq!(second.location().path(), Some(path.as_path()));
    assert_eq!(count_rows(&second, "water_intake"), 1);
    second.close().unwrap();
}

#[test]
fn ensure_schema_leaves_existing_tables_untouched() {
    let conn = Connection::open_in_memory().unwrap();
    ensure_schema(&conn, Category::MoodEntry).unwrap();
    conn.execute(
        "INSERT INTO mood_log (date, mood, comment) VALUES ('2024-01-01', '😊', NULL);",
        [],
    )
    .unwrap();

    ensure_schema(&conn, Category::MoodEntry).unwrap();
    ensure_all_schemas(&conn).unwrap();

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM mood_log;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
    assert!(table_exists(&conn, Category::Profile).unwrap());
}

#[test]
fn opening_a_legacy_file_adopts_existing_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE water_intake (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            amount TEXT,
            timestamp TEXT
        );
        INSERT INTO water_intake (amount, timestamp) VALUES ('150', '2024-02-02T10:00:00');",
    )
    .unwrap();
    drop(conn);

    let db = open_db(&path).unwrap();
    assert_eq!(count_rows(&db, "water_intake"), 1);
    assert_eq!(count_rows(&db, "mood_log"), 0);
    assert_eq!(count_rows(&db, "user_profile"), 0);
}

fn count_rows(db: &healthlog_core::Database, table: &str) -> i64 {
    db.with_conn(|conn| {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
            row.get(0)
        })
    })
    .unwrap()
}
