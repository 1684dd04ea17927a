use crate::table::{Table, TableFormat};
use crate::utils::{Result, TranslatorError};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use chrono::{NaiveDateTime, NaiveTime};
use csv::StringRecord;
use std::path::Path;

pub fn read_table(path: &Path, format: TableFormat) -> Result<Table> {
    if !file_exists(path) {
        return Err(TranslatorError::FileNotFound(path.display().to_string()));
    }

    let table = match format.delimiter() {
        Some(delimiter) => read_delimited(path, delimiter)?,
        None => read_xlsx(path)?,
    };

    tracing::info!(
        path = %path.display(),
        ?format,
        rows = table.row_count(),
        columns = table.headers.len(),
        "Loaded table"
    );

    Ok(table)
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<Table> {
    let file = std::fs::File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(file);

    let headers = string_record_to_vec(reader.headers()?);
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(string_record_to_vec(&record));
    }

    Ok(Table::new(headers, rows))
}

fn read_xlsx(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0).ok_or_else(|| {
        TranslatorError::UnsupportedFormat(format!("{} has no worksheets", path.display()))
    })??;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<String>>());

    let headers = rows.next().unwrap_or_default();
    Ok(Table::new(headers, rows.collect()))
}

/// Date cells come back as ISO dates instead of Excel serial numbers.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(format_datetime)
            .unwrap_or_else(|| cell.to_string()),
        _ => cell.to_string(),
    }
}

fn format_datetime(value: NaiveDateTime) -> String {
    if value.time() == NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

pub fn string_record_to_vec(record: &StringRecord) -> Vec<String> {
    record.iter().map(|s| s.to_string()).collect()
}

pub fn file_exists(path: &Path) -> bool {
    path.exists()
}
