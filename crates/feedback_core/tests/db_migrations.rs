use feedback_core::db::migrations::latest_version;
use feedback_core::db::{open_db, open_db_in_memory, schema_version, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "feedback_entries");
    assert_index_exists(&conn, "idx_feedback_entries_email");
    assert_index_exists(&conn, "idx_feedback_entries_created_at");
    assert_index_exists(&conn, "idx_feedback_entries_listing");
}

#[test]
fn reopening_file_database_is_idempotent_and_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO feedback_entries (first_name, last_name, email, subject, message)
             VALUES ('Ada', 'Lovelace', 'ada@example.com', 'Hi', 'Body');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second).unwrap(), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM feedback_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn created_at_defaults_to_insert_time_in_millis() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO feedback_entries (first_name, last_name, email, subject, message)
         VALUES ('Ada', 'Lovelace', 'ada@example.com', 'Hi', 'Body');",
        [],
    )
    .unwrap();

    let created_at: i64 = conn
        .query_row("SELECT created_at FROM feedback_entries;", [], |row| row.get(0))
        .unwrap();
    // 2020-01-01T00:00:00Z in epoch milliseconds.
    assert!(created_at > 1_577_836_800_000);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn version_one_database_is_upgraded_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v1.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(include_str!("../src/db/migrations/0001_feedback_entries.sql"))
        .unwrap();
    conn.execute_batch(
        "PRAGMA user_version = 1;
         INSERT INTO feedback_entries (first_name, last_name, email, subject, message)
         VALUES ('Ada', 'Lovelace', 'ada@example.com', 'Hi', 'Body');",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_index_exists(&conn, "idx_feedback_entries_listing");
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM feedback_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn failing_migration_reports_version_and_keeps_previous_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.db");

    // Claims version 1 but lacks the table the next script indexes.
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 1;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::MigrationFailed { version, name, .. } => {
            assert_eq!(version, 2);
            assert_eq!(name, "entry_listing_index");
        }
        other => panic!("unexpected error: {other}"),
    }

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), 1);
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert_schema_object(conn, "table", table_name);
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    assert_schema_object(conn, "index", index_name);
}

fn assert_schema_object(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
