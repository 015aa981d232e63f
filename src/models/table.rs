// file: src/models/table.rs
// description: schema-less tabular data as read from delimiter-separated input
// reference: header row plus string cells, columns resolved by name at runtime

use crate::error::{PipelineError, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawTable {
    /// column names, in file order
    pub headers: Vec<String>,
    /// each data row as one string per field; rows may be shorter than `headers`
    pub rows: Vec<Vec<String>>,
    /// field delimiter the table was read with
    pub delimiter: u8,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            headers,
            rows,
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Position of `name` in the header row; the first match wins on duplicates.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PipelineError::UnknownColumn {
                column: name.to_string(),
                available: self.headers.clone(),
            })
    }

    /// Cell at (`row`, `column`); `None` for a missing trailing field.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
    }

    pub fn value(&self, row: usize, column: &str) -> Result<Option<&str>> {
        let idx = self.column_index(column)?;
        Ok(self.cell(row, idx))
    }

    /// Iterate the cells of one column in row order.
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |r| r.get(column).map(String::as_str))
    }
}
