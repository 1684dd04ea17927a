pub mod report;

pub use report::{write_failed_rows, BatchSummary, FailedRow, RunSummary};
