//! SQL text loading

use crate::errors::{empty_query, io_error, Result};
use std::fs;
use std::path::Path;

/// Read a query from a `.sql` file
///
/// # Errors
///
/// `Io` if the file cannot be read, `InvalidInput` if it holds only
/// whitespace.
pub fn read_sql_from_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| io_error("read_sql", e))?;
    if text.trim().is_empty() {
        return Err(empty_query(&path.display().to_string()));
    }
    Ok(text)
}
