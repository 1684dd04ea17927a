use crate::table::{Table, TableFormat};
use crate::utils::{sanitize_cell, Result, TranslatorError};
use rust_xlsxwriter::Workbook;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Longest string Excel stores in one cell.
pub const XLSX_MAX_CELL_CHARS: usize = 32_767;

/// Destination for the whole table after each completed batch.
pub trait TableSink {
    fn persist(&mut self, table: &Table, completed: Range<usize>) -> Result<()>;
}

pub struct TableWriter {
    path: PathBuf,
    format: TableFormat,
    sanitize_formulas: bool,
    flushes: usize,
}

impl TableWriter {
    pub fn new(path: impl Into<PathBuf>, format: TableFormat) -> Self {
        Self {
            path: path.into(),
            format,
            sanitize_formulas: false,
            flushes: 0,
        }
    }

    pub fn with_sanitize_formulas(mut self, sanitize: bool) -> Self {
        self.sanitize_formulas = sanitize;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl TableSink for TableWriter {
    fn persist(&mut self, table: &Table, completed: Range<usize>) -> Result<()> {
        write_table(&self.path, self.format, table, self.sanitize_formulas)?;
        self.flushes += 1;
        tracing::info!(
            path = %self.path.display(),
            rows_start = completed.start,
            rows_end = completed.end,
            "Saved table"
        );
        Ok(())
    }
}

/// Overwrites `path` with the full table. The data is written to a sibling
/// file first and renamed into place.
pub fn write_table(
    path: &Path,
    format: TableFormat,
    table: &Table,
    sanitize_formulas: bool,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let partial = partial_path(path);
    let written = match format.delimiter() {
        Some(delimiter) => write_delimited(&partial, delimiter, table, sanitize_formulas),
        None => write_xlsx(&partial, table),
    };

    if let Err(e) = written {
        let _ = std::fs::remove_file(&partial);
        return Err(e);
    }

    std::fs::rename(&partial, path)?;
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

fn write_delimited(
    path: &Path,
    delimiter: u8,
    table: &Table,
    sanitize_formulas: bool,
) -> Result<()> {
    let file = std::fs::File::create(path)?;
    // rows longer than the header are written as read
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(file);

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        let cells = table.padded_row(row);
        if sanitize_formulas {
            let sanitized: Vec<String> = cells.iter().map(|s| sanitize_cell(s)).collect();
            writer.write_record(&sanitized)?;
        } else {
            writer.write_record(&cells)?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn write_xlsx(path: &Path, table: &Table) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let all_rows = std::iter::once(&table.headers).chain(table.rows.iter());
    for (row_idx, row) in all_rows.enumerate() {
        let row_num = u32::try_from(row_idx).map_err(|_| {
            TranslatorError::UnsupportedFormat("too many rows for a worksheet".to_string())
        })?;
        for (col_idx, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let col_num = u16::try_from(col_idx).map_err(|_| {
                TranslatorError::UnsupportedFormat("too many columns for a worksheet".to_string())
            })?;
            worksheet.write_string(row_num, col_num, xlsx_cell(value, row_idx, col_idx))?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// Cells over Excel's limit are cut to fit so one long translation cannot
/// stop the run.
fn xlsx_cell(value: &str, row_idx: usize, col_idx: usize) -> &str {
    match value.char_indices().nth(XLSX_MAX_CELL_CHARS) {
        Some((cut, _)) => {
            tracing::warn!(
                row = row_idx,
                column = col_idx,
                chars = value.chars().count(),
                limit = XLSX_MAX_CELL_CHARS,
                "Cell exceeds spreadsheet limit, truncated"
            );
            &value[..cut]
        }
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::read_table;

    fn sample() -> Table {
        Table::new(
            vec!["id".into(), "权利要求".into(), "权利要求 (英文)".into()],
            vec![
                vec!["1".into(), "一种装置。".into(), "A device.".into()],
                vec!["2".into(), "=危险".into()],
            ],
        )
    }

    #[test]
    fn csv_output_pads_short_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_table(&path, TableFormat::Csv, &sample(), false).unwrap();

        let table = read_table(&path, TableFormat::Csv).unwrap();
        assert_eq!(table.rows[1], vec!["2", "=危险", ""]);
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn overwrite_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_table(&path, TableFormat::Csv, &sample(), false).unwrap();

        let mut smaller = sample();
        smaller.rows.truncate(1);
        write_table(&path, TableFormat::Csv, &smaller, false).unwrap();

        assert_eq!(read_table(&path, TableFormat::Csv).unwrap().row_count(), 1);
    }

    #[test]
    fn sanitize_applies_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        write_table(&path, TableFormat::Tsv, &sample(), true).unwrap();

        let table = read_table(&path, TableFormat::Tsv).unwrap();
        assert_eq!(table.cell(1, 1), Some("'=危险"));
    }

    #[test]
    fn xlsx_round_trips_through_calamine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        write_table(&path, TableFormat::Xlsx, &sample(), false).unwrap();

        let table = read_table(&path, TableFormat::Xlsx).unwrap();
        assert_eq!(table.headers, sample().headers);
        assert_eq!(table.cell(0, 2), Some("A device."));
        assert_eq!(table.cell(1, 2), Some(""));
    }

    #[test]
    fn csv_output_keeps_rows_longer_than_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut table = sample();
        table.rows[0].push("extra".into());
        write_table(&path, TableFormat::Csv, &table, false).unwrap();

        let table = read_table(&path, TableFormat::Csv).unwrap();
        assert_eq!(table.rows[0], vec!["1", "一种装置。", "A device.", "extra"]);
        assert_eq!(table.rows[1].len(), 3);
    }

    #[test]
    fn oversized_xlsx_cell_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let mut table = sample();
        table.rows[0][2] = "译".repeat(40_000);
        write_table(&path, TableFormat::Xlsx, &table, false).unwrap();

        let table = read_table(&path, TableFormat::Xlsx).unwrap();
        let cell = table.cell(0, 2).unwrap();
        assert_eq!(cell.chars().count(), XLSX_MAX_CELL_CHARS);
        assert_eq!(table.cell(1, 1), Some("=危险"));
    }

    #[test]
    fn writer_counts_flushes() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = TableWriter::new(dir.path().join("nested/out.csv"), TableFormat::Csv);
        writer.persist(&sample(), 0..2).unwrap();
        writer.persist(&sample(), 0..2).unwrap();
        assert_eq!(writer.flushes(), 2);
        assert!(writer.path().exists());
    }
}
