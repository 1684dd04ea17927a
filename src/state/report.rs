use crate::translation::RowOutcome;
use crate::utils::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedRow {
    pub row_index: usize,
    pub batch_index: usize,
    pub error: String,
    pub original_content: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub index: usize,
    pub start_row: usize,
    pub end_row: usize,
    pub kept: usize,
    pub translated: usize,
    pub failed_rows: usize,
    pub failed_chunks: usize,
}

impl BatchSummary {
    pub fn new(index: usize, start_row: usize, end_row: usize) -> Self {
        Self {
            index,
            start_row,
            end_row,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Kept(_) => self.kept += 1,
            RowOutcome::Translated { failed_chunks, .. } => {
                self.translated += 1;
                self.failed_chunks += failed_chunks;
            }
            RowOutcome::Failed(_) => self.failed_rows += 1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_rows: usize,
    pub batches: Vec<BatchSummary>,
    pub failed_rows: Vec<FailedRow>,
}

impl RunSummary {
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            ..Self::default()
        }
    }

    pub fn kept(&self) -> usize {
        self.batches.iter().map(|b| b.kept).sum()
    }

    pub fn translated(&self) -> usize {
        self.batches.iter().map(|b| b.translated).sum()
    }

    pub fn failed_chunks(&self) -> usize {
        self.batches.iter().map(|b| b.failed_chunks).sum()
    }

    pub fn failed_row_count(&self) -> usize {
        self.batches.iter().map(|b| b.failed_rows).sum()
    }
}

pub fn write_failed_rows(path: &Path, rows: &[FailedRow]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(rows)?;
    std::fs::write(path, data)?;
    Ok(())
}
