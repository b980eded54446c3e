use crate::core::engine::AssignmentExhaustedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SantaError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::XlsxError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Column '{column}' not found in {source_name}")]
    MissingColumnError { source_name: String, column: String },

    #[error("Invalid participant at row {row} of {source_name}: {reason}")]
    InvalidParticipantError {
        source_name: String,
        row: usize,
        reason: String,
    },

    #[error("Duplicate participant name '{name}' in {source_name}")]
    DuplicateParticipantError { source_name: String, name: String },

    #[error("No participants found in {source_name}")]
    EmptyRosterError { source_name: String },

    #[error("Unsupported file format '{extension}' for {path}")]
    UnsupportedFormatError { path: String, extension: String },

    #[error(transparent)]
    AssignmentExhausted(#[from] AssignmentExhaustedError),

    #[error("Draw did not finish within {seconds}s")]
    TimeoutError { seconds: u64 },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Input,
    Configuration,
    Draw,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SantaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SantaError::IoError(_) => ErrorCategory::Io,
            SantaError::CsvError(_)
            | SantaError::SpreadsheetError(_)
            | SantaError::MissingColumnError { .. }
            | SantaError::InvalidParticipantError { .. }
            | SantaError::DuplicateParticipantError { .. }
            | SantaError::EmptyRosterError { .. }
            | SantaError::UnsupportedFormatError { .. } => ErrorCategory::Input,
            SantaError::ConfigError { .. }
            | SantaError::ConfigValidationError { .. }
            | SantaError::InvalidConfigValueError { .. }
            | SantaError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SantaError::AssignmentExhausted(_) | SantaError::TimeoutError { .. } => {
                ErrorCategory::Draw
            }
            SantaError::SerializationError(_) | SantaError::ProcessingError { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 換個種子或提高嘗試次數通常就能成功
            ErrorCategory::Draw => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Draw
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SantaError::IoError(_) => {
                "Check that the input files exist and the output directory is writable".to_string()
            }
            SantaError::CsvError(_) | SantaError::SpreadsheetError(_) => {
                "Make sure the file is a valid CSV or XLSX document with a header row".to_string()
            }
            SantaError::MissingColumnError { column, .. } => {
                format!("Add a '{}' column to the header row", column)
            }
            SantaError::InvalidParticipantError { .. } => {
                "Fill in both the name and the email address for every participant".to_string()
            }
            SantaError::DuplicateParticipantError { name, .. } => {
                format!("Give '{}' a distinguishing name so every entry is unique", name)
            }
            SantaError::EmptyRosterError { .. } => {
                "Add at least two participants to the list".to_string()
            }
            SantaError::UnsupportedFormatError { .. } => {
                "Use a .csv or .xlsx file".to_string()
            }
            SantaError::AssignmentExhausted(_) => {
                "Raise --max-attempts, or relax the previous-year results if the group is very small"
                    .to_string()
            }
            SantaError::TimeoutError { .. } => {
                "Increase --timeout-seconds or lower --max-attempts".to_string()
            }
            SantaError::ConfigError { .. }
            | SantaError::ConfigValidationError { .. }
            | SantaError::InvalidConfigValueError { .. }
            | SantaError::MissingConfigError { .. } => {
                "Review the configuration values and try again".to_string()
            }
            SantaError::SerializationError(_) | SantaError::ProcessingError { .. } => {
                "Re-run with --verbose and report the log output".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SantaError::AssignmentExhausted(e) => format!(
                "Could not find a valid Secret Santa draw after {} attempts",
                e.max_attempts
            ),
            SantaError::EmptyRosterError { source_name } => {
                format!("The participant list '{}' is empty", source_name)
            }
            SantaError::TimeoutError { seconds } => {
                format!("The draw took longer than {} seconds and was stopped", seconds)
            }
            other => other.to_string(),
        }
    }

    /// 依嚴重程度決定的程序結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, SantaError>;
