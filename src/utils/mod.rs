pub mod config;
pub mod errors;

pub use config::{
    AppConfig, BatchConfig, JobConfig, LoggingConfig, ReportConfig, ServiceConfig,
    ServiceProvider, DEFAULT_CONFIG_FILE,
};
pub use errors::{Result, TranslatorError};

pub fn sanitize_cell(value: &str) -> String {
    if value.starts_with('=')
        || value.starts_with('+')
        || value.starts_with('-')
        || value.starts_with('@')
    {
        format!("'{}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_prefixes_formula_starts() {
        assert_eq!(sanitize_cell("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(sanitize_cell("@cmd"), "'@cmd");
        assert_eq!(sanitize_cell("1. A device"), "1. A device");
    }
}
