// Query → Table → CSV, end to end against SQLite files on disk.

use emlpub_core::ExErrorKind;
use emlpub_store::{db, sql};
use tempfile::TempDir;

fn seeded_db(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("genetics.db");
    let conn = db::open(&path).unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE samples (id INTEGER, site TEXT, depth REAL, note TEXT);
        INSERT INTO samples VALUES (1, 'North', 2.5, NULL);
        INSERT INTO samples VALUES (2, 'South, lower', 10.0, 'said "hi"');
        "#,
    )
    .unwrap();
    path
}

#[test]
fn test_sql_file_to_csv() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = seeded_db(&temp_dir);
    let sql_path = temp_dir.path().join("query.sql");
    std::fs::write(&sql_path, "SELECT id, site, depth, note FROM samples ORDER BY id;\n").unwrap();

    let conn = db::open(&db_path).unwrap();
    let query = sql::read_sql_from_file(&sql_path).unwrap();
    let table = db::fetch_table(&conn, &query).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(
        table.to_csv(),
        "id,site,depth,note\n1,North,2.5,\n2,\"South, lower\",10,\"said \"\"hi\"\"\"\n"
    );
}

#[test]
fn test_empty_result_still_has_header() {
    let temp_dir = TempDir::new().unwrap();
    let conn = db::open(seeded_db(&temp_dir)).unwrap();

    let table = db::fetch_table(&conn, "SELECT id, site FROM samples WHERE id > 99").unwrap();

    assert!(table.is_empty());
    assert_eq!(table.to_csv(), "id,site\n");
}

#[test]
fn test_bad_query_is_persistence_error() {
    let conn = db::open_in_memory().unwrap();
    let err = db::fetch_table(&conn, "SELECT * FROM missing_table").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Persistence);
}

#[test]
fn test_missing_sql_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = sql::read_sql_from_file(temp_dir.path().join("nope.sql")).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Io);
}
