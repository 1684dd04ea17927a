pub mod reader;
pub mod writer;

pub use reader::{file_exists, read_table};
pub use writer::{write_table, TableSink, TableWriter};

use crate::utils::{Result, TranslatorError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    Csv,
    Tsv,
    Xlsx,
}

impl TableFormat {
    /// `.xlsx` is a spreadsheet, `.tsv` is tab-delimited, everything else is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("xlsx") => TableFormat::Xlsx,
            Some("tsv") => TableFormat::Tsv,
            _ => TableFormat::Csv,
        }
    }

    pub fn resolve(explicit: Option<TableFormat>, path: &Path) -> Self {
        explicit.unwrap_or_else(|| Self::from_path(path))
    }

    pub(crate) fn delimiter(&self) -> Option<u8> {
        match self {
            TableFormat::Csv => Some(b','),
            TableFormat::Tsv => Some(b'\t'),
            TableFormat::Xlsx => None,
        }
    }
}

/// In-memory table. Rows may be shorter than the header when the source file
/// was ragged; missing cells read as absent rather than empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| TranslatorError::ColumnNotFound(name.to_string()))
    }

    /// Returns the index of `name`, appending an empty column if it is absent.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.headers.push(name.to_string());
        tracing::info!(column = %name, "Target column missing from input, appended");
        self.headers.len() - 1
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(|s| s.as_str())
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: String) {
        if let Some(cells) = self.rows.get_mut(row) {
            if cells.len() <= column {
                cells.resize(column + 1, String::new());
            }
            cells[column] = value;
        }
    }

    /// Row cells padded to the header width, for writers that need rectangular data.
    pub(crate) fn padded_row(&self, row: &[String]) -> Vec<String> {
        let mut cells = row.to_vec();
        if cells.len() < self.headers.len() {
            cells.resize(self.headers.len(), String::new());
        }
        cells
    }
}
