use crate::table::Table;
use crate::translation::chunk::ChunkTranslator;
use crate::translation::splitter::TextSplitter;
use crate::utils::{Result, TranslatorError};
use tracing::{debug, warn};

/// Resolved positions of the source and target columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    pub source: usize,
    pub target: usize,
    pub source_name: String,
}

impl Columns {
    /// The source column must exist; a missing target column is appended.
    pub fn resolve(table: &mut Table, source_name: &str, target_name: &str) -> Result<Self> {
        let source = table.require_column(source_name)?;
        let target = table.ensure_column(target_name);
        Ok(Self {
            source,
            target,
            source_name: source_name.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// The target already held a translation.
    Kept(String),
    Translated { text: String, failed_chunks: usize },
    Failed(String),
}

impl RowOutcome {
    /// Value for the target cell. Failed rows get the empty null marker.
    pub fn into_cell(self) -> String {
        match self {
            RowOutcome::Kept(text) | RowOutcome::Translated { text, .. } => text,
            RowOutcome::Failed(_) => String::new(),
        }
    }
}

pub struct RowTranslator {
    splitter: TextSplitter,
    chunks: ChunkTranslator,
    failure_marker: String,
}

impl RowTranslator {
    pub fn new(
        splitter: TextSplitter,
        chunks: ChunkTranslator,
        failure_marker: impl Into<String>,
    ) -> Self {
        Self {
            splitter,
            chunks,
            failure_marker: failure_marker.into(),
        }
    }

    pub fn failure_marker(&self) -> &str {
        &self.failure_marker
    }

    pub async fn translate_row(
        &self,
        row_index: usize,
        cells: &[String],
        columns: &Columns,
    ) -> RowOutcome {
        if let Some(existing) = cells.get(columns.target) {
            if !existing.trim().is_empty() {
                return RowOutcome::Kept(existing.clone());
            }
        }

        match self.try_translate(row_index, cells, columns).await {
            Ok((text, failed_chunks)) => RowOutcome::Translated {
                text,
                failed_chunks,
            },
            Err(e) => {
                warn!(row = row_index, error = %e, "Row failed");
                RowOutcome::Failed(e.to_string())
            }
        }
    }

    async fn try_translate(
        &self,
        row_index: usize,
        cells: &[String],
        columns: &Columns,
    ) -> Result<(String, usize)> {
        let source = cells
            .get(columns.source)
            .ok_or_else(|| TranslatorError::MissingCell {
                row: row_index,
                column: columns.source_name.clone(),
            })?;

        let pieces = self.splitter.split(source);
        debug!(row = row_index, chunks = pieces.len(), "Translating row");

        let mut translated = Vec::with_capacity(pieces.len());
        let mut failed_chunks = 0;
        for piece in &pieces {
            let outcome = self.chunks.translate(piece).await;
            if outcome.is_failed() {
                failed_chunks += 1;
            }
            translated.push(outcome.into_text(&self.failure_marker));
        }

        Ok((translated.join(" "), failed_chunks))
    }
}
