pub mod batch;
pub mod job;
pub mod state;
pub mod table;
pub mod translation;
pub mod utils;

pub use batch::{BatchPlanner, BatchRange, BatchTranslator};
pub use job::{load_job_table, run_job};
pub use state::{BatchSummary, FailedRow, RunSummary};
pub use table::{read_table, write_table, Table, TableFormat, TableSink, TableWriter};
pub use translation::{
    build_row_translator, build_service, ChunkOutcome, ChunkTranslator, Columns, RetryPolicy,
    RowOutcome, RowTranslator, TextSplitter, TranslationService,
};
pub use utils::{AppConfig, Result, TranslatorError, DEFAULT_CONFIG_FILE};
