use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    #[error("Error parsing JSON on line {line}: {message}")]
    InvalidJson { line: usize, message: String },

    #[error("Line {line} is not a JSON object")]
    NotAnObject { line: usize },

    #[error("Missing key on line {line}: '{key}'")]
    MissingKey { line: usize, key: String },

    #[error("Invalid value for '{key}' on line {line}: expected {expected}")]
    InvalidFieldType {
        line: usize,
        key: String,
        expected: String,
    },

    #[error("No columns to write: {rows} records and none has any field")]
    NoColumns { rows: usize },

    #[error("Input file '{}' does not exist", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required option: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 單行錯誤，可以跳過
    Low,
    Medium,
    High,
    Critical,
}

impl PrepError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PrepError::InputNotFound { .. } => ErrorCategory::Input,
            PrepError::InvalidJson { .. }
            | PrepError::NotAnObject { .. }
            | PrepError::MissingKey { .. }
            | PrepError::InvalidFieldType { .. }
            | PrepError::NoColumns { .. }
            | PrepError::SerializationError(_) => ErrorCategory::Data,
            PrepError::IoError(_) | PrepError::ParquetError(_) | PrepError::ArrowError(_) => {
                ErrorCategory::Output
            }
            PrepError::ConfigError { .. }
            | PrepError::InvalidConfigValueError { .. }
            | PrepError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            e if e.is_line_local() => ErrorSeverity::Low,
            PrepError::ConfigError { .. }
            | PrepError::InvalidConfigValueError { .. }
            | PrepError::MissingConfigError { .. } => ErrorSeverity::Medium,
            PrepError::InputNotFound { .. } | PrepError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// Errors tied to a single input line. The projector skips these and keeps going.
    pub fn is_line_local(&self) -> bool {
        matches!(
            self,
            PrepError::InvalidJson { .. }
                | PrepError::NotAnObject { .. }
                | PrepError::MissingKey { .. }
                | PrepError::InvalidFieldType { .. }
        )
    }

    /// Process exit code used by the command-line tools.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Input => 3,
            ErrorCategory::Configuration => 2,
            ErrorCategory::Data | ErrorCategory::Output => 1,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PrepError::InputNotFound { path } => {
                format!("Error: Input file '{}' does not exist", path.display())
            }
            PrepError::InvalidJson { .. } | PrepError::NotAnObject { .. } => {
                format!("Input is not valid line-delimited JSON. {}", self)
            }
            PrepError::IoError(e) => format!("File operation failed: {}", e),
            PrepError::ParquetError(_) | PrepError::ArrowError(_) => {
                format!("Could not encode the table: {}", self)
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check the input path and make sure it points to a regular file",
            ErrorCategory::Data => {
                "Make sure every non-empty line of the input is a single JSON object"
            }
            ErrorCategory::Output => {
                "Check that the output location exists and is writable, and that there is enough disk space"
            }
            ErrorCategory::Configuration => "Run with --help to see the expected arguments",
        }
    }
}

pub type Result<T> = std::result::Result<T, PrepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_local_errors_are_low_severity() {
        let err = PrepError::MissingKey {
            line: 3,
            key: "instance".to_string(),
        };
        assert!(err.is_line_local());
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.to_string(), "Missing key on line 3: 'instance'");
    }

    #[test]
    fn test_exit_codes_by_category() {
        let missing = PrepError::InputNotFound {
            path: PathBuf::from("nope.jsonl"),
        };
        assert_eq!(missing.exit_code(), 3);
        assert_eq!(
            missing.user_friendly_message(),
            "Error: Input file 'nope.jsonl' does not exist"
        );

        let config = PrepError::MissingConfigError {
            field: "limit".to_string(),
        };
        assert_eq!(config.exit_code(), 2);

        let json = PrepError::InvalidJson {
            line: 1,
            message: "EOF while parsing".to_string(),
        };
        assert_eq!(json.exit_code(), 1);
        assert_eq!(PrepError::NoColumns { rows: 0 }.exit_code(), 1);
        assert!(!PrepError::IoError(std::io::Error::other("disk")).is_line_local());
    }
}
