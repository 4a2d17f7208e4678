use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[cfg(feature = "xlsx")]
    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("Dependency unavailable: {capability}")]
    DependencyUnavailable { capability: String },

    #[error("Failed to read source {path}: {source}")]
    SourceReadError {
        path: String,
        #[source]
        source: Box<EtlError>,
    },

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Source,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::SourceReadError { source, .. } => match source.as_ref() {
                EtlError::IoError(_) => ErrorCategory::Io,
                _ => ErrorCategory::Source,
            },
            _ => ErrorCategory::Source,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::DependencyUnavailable { .. } => ErrorSeverity::Critical,
            EtlError::SourceReadError { source, .. } => source.severity(),
            EtlError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::SourceReadError { path, source } => {
                format!("Failed to read source {}: {}", path, source.user_friendly_message())
            }
            EtlError::DependencyUnavailable { capability } => {
                format!("{} is not available in this build", capability)
            }
            EtlError::CsvError(e) => format!("The CSV file could not be parsed: {}", e),
            EtlError::SerializationError(e) => format!("The JSON file could not be parsed: {}", e),
            #[cfg(feature = "xlsx")]
            EtlError::SpreadsheetError(e) => format!("The spreadsheet could not be opened: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::SourceReadError { source, .. } => source.recovery_suggestion(),
            EtlError::DependencyUnavailable { .. } => {
                "Rebuild with the `xlsx` feature enabled, or export the sheet as CSV".to_string()
            }
            EtlError::CsvError(_) => {
                "Make sure the CSV is UTF-8 encoded and its first row holds the column names"
                    .to_string()
            }
            EtlError::SerializationError(_) => {
                "Check the JSON syntax; the file must hold an array or an object with `items`/`data`"
                    .to_string()
            }
            #[cfg(feature = "xlsx")]
            EtlError::SpreadsheetError(_) => {
                "Re-save the workbook from a spreadsheet application and try again".to_string()
            }
            EtlError::IoError(_) => "Check that the file exists and is readable".to_string(),
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Review the command-line flags or the TOML configuration file".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_read_error_inherits_cause_classification() {
        let err = EtlError::SourceReadError {
            path: "codefree/1000ja.xlsx".to_string(),
            source: Box::new(EtlError::DependencyUnavailable {
                capability: "spreadsheet parsing".to_string(),
            }),
        };

        assert_eq!(err.category(), ErrorCategory::Source);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.to_string().contains("codefree/1000ja.xlsx"));
        assert!(err.recovery_suggestion().contains("xlsx"));
    }

    #[test]
    fn test_config_errors_are_configuration_category() {
        let err = EtlError::MissingConfigError {
            field: "output.key".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }
}
