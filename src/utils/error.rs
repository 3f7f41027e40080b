use thiserror::Error;

#[derive(Error, Debug)]
pub enum KitError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Source '{source_name}' returned an unusable response: {message}")]
    SourceError { source_name: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Io,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl KitError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            KitError::HttpError(_) | KitError::SourceError { .. } => ErrorCategory::Network,
            KitError::IoError(_) => ErrorCategory::Io,
            KitError::TomlError(_)
            | KitError::ConfigValidationError { .. }
            | KitError::InvalidConfigValueError { .. }
            | KitError::MissingConfigError { .. } => ErrorCategory::Configuration,
            KitError::CsvError(_)
            | KitError::SerializationError(_)
            | KitError::ProcessingError { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常可以重試
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            KitError::HttpError(_) => "Could not reach the campaign source".to_string(),
            KitError::SourceError { source_name, .. } => {
                format!("The campaign source '{}' returned unexpected data", source_name)
            }
            KitError::IoError(e) => format!("File system error: {}", e),
            KitError::TomlError(_) => "The configuration file is not valid TOML".to_string(),
            KitError::ConfigValidationError { field, .. }
            | KitError::InvalidConfigValueError { field, .. }
            | KitError::MissingConfigError { field } => {
                format!("Configuration problem with '{}'", field)
            }
            KitError::CsvError(_) | KitError::SerializationError(_) => {
                "Failed to write cleaned output".to_string()
            }
            KitError::ProcessingError { message } => format!("Processing failed: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the source URL and your network connection, then retry",
            ErrorCategory::Configuration => "Review the configuration file and command-line flags",
            ErrorCategory::Io => "Check that the paths exist and are writable",
            ErrorCategory::Data => "Inspect the input records for unexpected shapes",
        }
    }
}

pub type Result<T> = std::result::Result<T, KitError>;
