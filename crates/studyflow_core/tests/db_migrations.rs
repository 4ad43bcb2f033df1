use rusqlite::Connection;
use studyflow_core::db::migrations::latest_version;
use studyflow_core::db::{open_db, open_db_in_memory, DbError};

#[test]
fn open_db_in_memory_creates_chunk_store() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert!(sqlite_object_exists(&conn, "table", "study_chunks"));
    assert!(sqlite_object_exists(&conn, "index", "idx_study_chunks_owner_file"));
}

#[test]
fn reopening_file_database_keeps_schema_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studyflow.db");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO study_chunks (chunk_uuid, owner, file_name, chunk_index, content, embedding)
         VALUES ('00000000-0000-4000-8000-000000000001', 'ada', 'notes.pdf', 1, 'text', '[1.0]');",
        [],
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM study_chunks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn chunk_index_must_be_positive_and_unique_per_file() {
    let conn = open_db_in_memory().unwrap();
    let insert = |uuid: &str, index: i64| {
        conn.execute(
            "INSERT INTO study_chunks (chunk_uuid, owner, file_name, chunk_index, content, embedding)
             VALUES (?1, 'ada', 'notes.pdf', ?2, 'text', '[1.0]');",
            rusqlite::params![uuid, index],
        )
    };

    insert("00000000-0000-4000-8000-000000000001", 1).unwrap();
    assert!(insert("00000000-0000-4000-8000-000000000002", 1).is_err());
    assert!(insert("00000000-0000-4000-8000-000000000003", 0).is_err());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
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

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn sqlite_object_exists(conn: &Connection, kind: &str, name: &str) -> bool {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2);",
        [kind, name],
        |row| row.get::<_, i64>(0),
    )
    .unwrap()
        == 1
}
