pub mod planner;

pub use planner::{BatchPlanner, BatchRange};

use crate::state::{write_failed_rows, BatchSummary, FailedRow, RunSummary};
use crate::table::{Table, TableSink};
use crate::translation::{Columns, RowOutcome, RowTranslator};
use crate::utils::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Drives a table through the row translator one batch at a time, persisting
/// the whole table after every batch.
pub struct BatchTranslator {
    rows: RowTranslator,
    planner: BatchPlanner,
    pause: Duration,
    failed_rows_output: Option<PathBuf>,
}

impl BatchTranslator {
    pub fn new(rows: RowTranslator, batch_size: usize, pause: Duration) -> Self {
        Self {
            rows,
            planner: BatchPlanner::new(batch_size),
            pause,
            failed_rows_output: None,
        }
    }

    pub fn with_failed_rows_output(mut self, path: Option<PathBuf>) -> Self {
        self.failed_rows_output = path;
        self
    }

    pub async fn run(
        &self,
        table: &mut Table,
        columns: &Columns,
        sink: &mut dyn TableSink,
    ) -> Result<RunSummary> {
        let total_rows = table.row_count();
        let batches = self.planner.calculate_batches(total_rows);
        let mut summary = RunSummary::new(total_rows);

        info!(
            total_rows,
            batches = batches.len(),
            batch_size = self.planner.batch_size(),
            "Starting batch translation"
        );

        for range in &batches {
            let batch_summary = self.process_batch(table, columns, range, &mut summary).await;

            sink.persist(table, range.rows())?;
            if let Some(path) = &self.failed_rows_output {
                write_failed_rows(path, &summary.failed_rows)?;
            }

            info!(
                batch = range.index + 1,
                of = batches.len(),
                kept = batch_summary.kept,
                translated = batch_summary.translated,
                failed_rows = batch_summary.failed_rows,
                failed_chunks = batch_summary.failed_chunks,
                "Batch done"
            );
            summary.batches.push(batch_summary);

            if !range.is_last && !self.pause.is_zero() {
                info!(seconds = self.pause.as_secs(), "Pausing before next batch");
                tokio::time::sleep(self.pause).await;
            }
        }

        info!(
            total_rows,
            kept = summary.kept(),
            translated = summary.translated(),
            failed_rows = summary.failed_row_count(),
            failed_chunks = summary.failed_chunks(),
            "Translation completed"
        );

        Ok(summary)
    }

    async fn process_batch(
        &self,
        table: &mut Table,
        columns: &Columns,
        range: &BatchRange,
        summary: &mut RunSummary,
    ) -> BatchSummary {
        let mut batch_summary = BatchSummary::new(range.index, range.start_row, range.end_row);
        let mut results = Vec::with_capacity(range.row_count());

        for row_index in range.rows() {
            let cells = table.rows.get(row_index).map(|r| r.as_slice()).unwrap_or(&[]);
            let outcome = self.rows.translate_row(row_index, cells, columns).await;
            debug!(batch = range.index + 1, row = row_index, "Row processed");

            batch_summary.record(&outcome);
            if let Some(failed) = self.failure_entry(range, row_index, cells, columns, &outcome) {
                summary.failed_rows.push(failed);
            }
            results.push(outcome.into_cell());
        }

        for (offset, value) in results.into_iter().enumerate() {
            table.set_cell(range.start_row + offset, columns.target, value);
        }

        batch_summary
    }

    fn holds_marker(&self, text: &str) -> bool {
        let marker = self.rows.failure_marker();
        !marker.is_empty() && text.contains(marker)
    }

    fn failure_entry(
        &self,
        range: &BatchRange,
        row_index: usize,
        cells: &[String],
        columns: &Columns,
        outcome: &RowOutcome,
    ) -> Option<FailedRow> {
        let error = match outcome {
            RowOutcome::Failed(reason) => reason.clone(),
            RowOutcome::Translated { failed_chunks, .. } if *failed_chunks > 0 => format!(
                "{} chunk(s) replaced with \"{}\"",
                failed_chunks,
                self.rows.failure_marker()
            ),
            RowOutcome::Kept(text) if self.holds_marker(text) => format!(
                "target still holds \"{}\" from an earlier run",
                self.rows.failure_marker()
            ),
            _ => return None,
        };

        Some(FailedRow {
            row_index,
            batch_index: range.index,
            error,
            original_content: cells.get(columns.source).cloned().unwrap_or_default(),
        })
    }
}
