//! Database connection management and query execution
//!
//! The pipeline never interprets the data it publishes: every cell comes
//! back as optional text.

use crate::errors::{from_rusqlite, Result};
use crate::table::Table;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Run a query and collect its result set
///
/// Integers and reals are rendered in base 10, text as-is, blobs as lossy
/// UTF-8 and NULL as `None`.
pub fn fetch_table(conn: &Connection, query: &str) -> Result<Table> {
    let mut stmt = conn.prepare(query).map_err(from_rusqlite)?;
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    let width = columns.len();

    let mut rows = stmt.query([]).map_err(from_rusqlite)?;
    let mut records = Vec::new();
    while let Some(row) = rows.next().map_err(from_rusqlite)? {
        let mut cells = Vec::with_capacity(width);
        for idx in 0..width {
            let cell = match row.get_ref(idx).map_err(from_rusqlite)? {
                ValueRef::Null => None,
                ValueRef::Integer(i) => Some(i.to_string()),
                ValueRef::Real(f) => Some(f.to_string()),
                ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                    Some(String::from_utf8_lossy(bytes).into_owned())
                }
            };
            cells.push(cell);
        }
        records.push(cells);
    }

    tracing::debug!(
        op = "fetch_table",
        columns = width,
        row_count = records.len(),
        "query executed"
    );
    Ok(Table::new(columns, records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Connection {
        let conn = open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE runs (sample_id TEXT, fork_length REAL, run TEXT, count INTEGER);
            INSERT INTO runs VALUES ('S-001', 42.5, 'fall', 3);
            INSERT INTO runs VALUES ('S-002', NULL, 'spring, late', 1);
            "#,
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_fetch_table_columns_and_cells() {
        let conn = seeded();
        let table = fetch_table(&conn, "SELECT * FROM runs ORDER BY sample_id").unwrap();

        assert_eq!(table.columns(), &["sample_id", "fork_length", "run", "count"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][1].as_deref(), Some("42.5"));
        assert_eq!(table.rows()[0][3].as_deref(), Some("3"));
        assert_eq!(table.rows()[1][1], None);
    }

    #[test]
    fn test_fetch_table_empty_result_keeps_header() {
        let conn = seeded();
        let table = fetch_table(&conn, "SELECT sample_id FROM runs WHERE 0").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns(), &["sample_id"]);
    }

    #[test]
    fn test_fetch_table_bad_sql_is_persistence_error() {
        let conn = seeded();
        let err = fetch_table(&conn, "SELECT * FROM nowhere").unwrap_err();
        assert_eq!(err.kind(), emlpub_core::ExErrorKind::Persistence);
    }
}
