use crate::table::TableFormat;
use crate::utils::errors::{Result, TranslatorError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub job: JobConfig,
    pub batch: BatchConfig,
    pub service: ServiceConfig,
    pub logging: LoggingConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub input_format: Option<TableFormat>,
    pub output_format: Option<TableFormat>,
    pub source_column: String,
    pub target_column: String,
    /// Load the output file instead of the input when it already exists.
    pub resume: bool,
    pub sanitize_formulas: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub batch_size: usize,
    pub max_retries: usize,
    pub max_chunk_chars: usize,
    pub batch_pause_seconds: u64,
    pub retry_backoff_seconds: u64,
    pub exhausted_cooldown_seconds: u64,
    pub failure_marker: String,
    pub sentence_terminators: Vec<char>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceProvider {
    Google,
    Anthropic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub provider: ServiceProvider,
    pub source_lang: String,
    pub target_lang: String,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub failed_rows_output: Option<PathBuf>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from("claims.xlsx"),
            output_file: PathBuf::from("claims_translated.csv"),
            input_format: None,
            output_format: None,
            source_column: "权利要求".to_string(),
            target_column: "权利要求 (英文)".to_string(),
            resume: true,
            sanitize_formulas: false,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 500,
            max_retries: 5,
            max_chunk_chars: 600,
            batch_pause_seconds: 100,
            retry_backoff_seconds: 10,
            exhausted_cooldown_seconds: 10,
            failure_marker: "Translation Failed".to_string(),
            sentence_terminators: vec!['。', '.'],
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            provider: ServiceProvider::Google,
            source_lang: "auto".to_string(),
            target_lang: "en".to_string(),
            endpoint: None,
            api_key: None,
            model: "claude-3-5-sonnet-20241022".to_string(),
            timeout_seconds: 120,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl BatchConfig {
    pub fn batch_pause(&self) -> Duration {
        Duration::from_secs(self.batch_pause_seconds)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_secs(self.retry_backoff_seconds)
    }

    pub fn exhausted_cooldown(&self) -> Duration {
        Duration::from_secs(self.exhausted_cooldown_seconds)
    }
}

impl ServiceConfig {
    /// Explicit key first, then the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(ANTHROPIC_API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

impl AppConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TranslatorError::ConfigError(format!("{}: {}", path, e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| TranslatorError::ConfigError(e.to_string()))
    }

    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) if Path::new(p).exists() => Self::load_from_file(p),
            _ => Ok(Self::default()),
        }
    }

    /// A path given on the command line must exist; without one the
    /// default `config.toml` is optional.
    pub fn load_for_cli(explicit: Option<&str>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => Self::load_or_default(Some(DEFAULT_CONFIG_FILE)),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch.batch_size == 0 {
            return Err(TranslatorError::ConfigError(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.batch.max_retries == 0 {
            return Err(TranslatorError::ConfigError(
                "max_retries must be at least 1".to_string(),
            ));
        }
        if self.batch.max_chunk_chars == 0 {
            return Err(TranslatorError::ConfigError(
                "max_chunk_chars must be at least 1".to_string(),
            ));
        }
        if self.job.source_column.is_empty() || self.job.target_column.is_empty() {
            return Err(TranslatorError::ConfigError(
                "source_column and target_column must be set".to_string(),
            ));
        }
        if self.job.source_column == self.job.target_column {
            return Err(TranslatorError::ConfigError(
                "source_column and target_column must differ".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_job() {
        let config = AppConfig::default();
        assert_eq!(config.batch.batch_size, 500);
        assert_eq!(config.batch.max_retries, 5);
        assert_eq!(config.batch.max_chunk_chars, 600);
        assert_eq!(config.batch.batch_pause(), Duration::from_secs(100));
        assert_eq!(config.service.source_lang, "auto");
        assert_eq!(config.service.target_lang, "en");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let err = AppConfig::load_for_cli(Some("/nonexistent/claims.toml")).unwrap_err();
        assert!(matches!(err, TranslatorError::ConfigError(ref m) if m.contains("claims.toml")));
    }

    #[test]
    fn explicit_config_path_is_loaded() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"[batch]\nbatch_size = 7\n").unwrap();

        let config = AppConfig::load_for_cli(file.path().to_str()).unwrap();
        assert_eq!(config.batch.batch_size, 7);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [job]
            input_file = "in.csv"
            output_file = "out.xlsx"
            source_column = "claims"
            target_column = "claims_en"

            [batch]
            batch_size = 50
            sentence_terminators = ["。", ".", "；"]

            [service]
            provider = "anthropic"
            target_lang = "de"
            "#,
        )
        .unwrap();

        assert_eq!(config.job.input_file, PathBuf::from("in.csv"));
        assert_eq!(config.batch.batch_size, 50);
        assert_eq!(config.batch.max_retries, 5);
        assert_eq!(config.batch.sentence_terminators, vec!['。', '.', '；']);
        assert_eq!(config.service.provider, ServiceProvider::Anthropic);
        assert_eq!(config.service.source_lang, "auto");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn explicit_format_override_parses() {
        let config = AppConfig::from_toml(
            r#"
            [job]
            output_format = "tsv"
            "#,
        )
        .unwrap();
        assert_eq!(config.job.output_format, Some(TableFormat::Tsv));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = AppConfig::from_toml("[batch]\nbatch_size = \"many\"").unwrap_err();
        assert!(matches!(err, TranslatorError::ConfigError(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_or_default(Some("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.batch.batch_size, 500);
    }

    #[test]
    fn validate_rejects_zero_limits() {
        let mut config = AppConfig::default();
        config.batch.max_retries = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.batch.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.job.target_column = config.job.source_column.clone();
        assert!(config.validate().is_err());
    }
}
