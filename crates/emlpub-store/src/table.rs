//! Query results and their CSV rendering

use serde::Serialize;

/// Column names plus rows of optional text cells
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as CSV: header row first, `\n` line endings, no index column.
    /// NULL cells are empty fields.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        write_record(&mut out, self.columns.iter().map(|c| Some(c.as_str())));
        for row in &self.rows {
            write_record(&mut out, row.iter().map(|c| c.as_deref()));
        }
        out
    }
}

fn write_record<'a>(out: &mut String, fields: impl Iterator<Item = Option<&'a str>>) {
    for (idx, field) in fields.enumerate() {
        if idx > 0 {
            out.push(',');
        }
        if let Some(value) = field {
            push_field(out, value);
        }
    }
    out.push('\n');
}

fn push_field(out: &mut String, value: &str) {
    let needs_quotes = value.contains([',', '"', '\n', '\r']);
    if !needs_quotes {
        out.push_str(value);
        return;
    }
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}
