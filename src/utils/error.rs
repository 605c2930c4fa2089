use thiserror::Error;

/// Fatal failures of an ingest run.
///
/// Rejections of an upload are not errors; see [`crate::domain::model::Rejection`].
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Malformed line {line}: expected at least 8 tab-separated fields, found {fields}")]
    MalformedLine { line: usize, fields: usize },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl IngestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            IngestError::IoError(_) => ErrorCategory::Io,
            IngestError::SerializationError(_) | IngestError::MalformedLine { .. } => {
                ErrorCategory::Data
            }
            IngestError::ConfigError { .. } | IngestError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            IngestError::IoError(e) => format!("Could not read or write a file: {}", e),
            IngestError::SerializationError(_) => {
                "The transactions could not be converted to JSON.".to_string()
            }
            IngestError::MalformedLine { line, fields } => format!(
                "Line {} has {} field(s); every line needs 8 tab-separated fields.",
                line, fields
            ),
            IngestError::ConfigError { message } => format!("Configuration problem: {}", message),
            IngestError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            IngestError::IoError(_) => {
                "Check that the input exists and the output directory is writable"
            }
            IngestError::SerializationError(_) => "Report this failure with the input file attached",
            IngestError::MalformedLine { .. } => {
                "Fix or remove the reported line and upload the file again"
            }
            IngestError::ConfigError { .. } | IngestError::InvalidConfigValueError { .. } => {
                "Review the command-line flags and the TOML configuration file"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
