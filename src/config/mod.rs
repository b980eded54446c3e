pub mod cli;
pub mod toml_config;

use crate::adapters::TableFormat;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation;
use chrono::Datelike;
#[cfg(feature = "cli")]
use crate::{core::engine::DEFAULT_MAX_ATTEMPTS, utils::validation::Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

/// 預設輸出檔名，附上今年年份
pub fn default_output_name() -> String {
    format!("Secret-Santa-Assignments-{}", chrono::Local::now().year())
}

/// 共用的檢查：輸入檔、輸出路徑與格式、嘗試次數與逾時
pub(crate) fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validation::validate_path("participants", config.participants_path())?;
    let mut inputs = vec![config.participants_path()];

    if let Some(previous) = config.previous_results_path() {
        validation::validate_path("previous_results", previous)?;
        inputs.push(previous);
    }
    validation::validate_file_extensions("input", &inputs, &TableFormat::EXTENSIONS)?;

    validation::validate_path("output_path", config.output_path())?;
    validation::validate_non_empty_string("output_name", &config.output_name())?;
    validation::validate_output_formats("output_formats", config.output_formats())?;
    validation::validate_positive_number("max_attempts", config.max_attempts(), 1)?;

    if let Some(timeout) = config.timeout_seconds() {
        validation::validate_range("timeout_seconds", timeout, 1, 24 * 60 * 60)?;
    }

    Ok(())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "secret-santa")]
#[command(about = "Draw Secret Santa pairs without repeating last year's")]
pub struct CliConfig {
    #[arg(long, default_value = "Employee-List.csv", help = "Participant list (.csv or .xlsx)")]
    pub participants: String,

    #[arg(long, help = "Previous round's results (.csv or .xlsx)")]
    pub previous: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "csv")]
    pub output_formats: Vec<String>,

    #[arg(long, help = "Output file name without extension")]
    pub output_name: Option<String>,

    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    #[arg(long, help = "Seed for a reproducible draw")]
    pub seed: Option<u64>,

    #[arg(long, help = "Give up if the draw takes longer than this")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Also append JSON logs to this file")]
    pub log_file: Option<String>,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn participants_path(&self) -> &str {
        &self.participants
    }

    fn previous_results_path(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_name(&self) -> String {
        self.output_name.clone().unwrap_or_else(default_output_name)
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
