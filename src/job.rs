use crate::batch::BatchTranslator;
use crate::state::RunSummary;
use crate::table::{file_exists, read_table, Table, TableFormat, TableWriter};
use crate::translation::{build_row_translator, Columns, TranslationService};
use crate::utils::{AppConfig, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Loads the job's table, resuming from an existing output file when allowed.
pub fn load_job_table(config: &AppConfig) -> Result<Table> {
    let job = &config.job;

    if job.resume && file_exists(&job.output_file) {
        info!(
            path = %job.output_file.display(),
            "Output file exists, resuming from it"
        );
        let format = TableFormat::resolve(job.output_format, &job.output_file);
        return read_table(&job.output_file, format);
    }

    let format = TableFormat::resolve(job.input_format, &job.input_file);
    read_table(&job.input_file, format)
}

pub async fn run_job(
    config: &AppConfig,
    service: Arc<dyn TranslationService>,
) -> Result<RunSummary> {
    config.validate()?;

    let mut table = load_job_table(config)?;
    let columns = Columns::resolve(
        &mut table,
        &config.job.source_column,
        &config.job.target_column,
    )?;
    if table.is_empty() {
        warn!("Table has no rows, nothing to translate");
    }

    let output_format = TableFormat::resolve(config.job.output_format, &config.job.output_file);
    let mut writer = TableWriter::new(config.job.output_file.clone(), output_format)
        .with_sanitize_formulas(config.job.sanitize_formulas);

    let rows = build_row_translator(service, &config.service, &config.batch);
    let translator = BatchTranslator::new(rows, config.batch.batch_size, config.batch.batch_pause())
        .with_failed_rows_output(config.report.failed_rows_output.clone());

    let summary = translator.run(&mut table, &columns, &mut writer).await?;

    info!(
        output = %writer.path().display(),
        flushes = writer.flushes(),
        "Job finished"
    );

    Ok(summary)
}
