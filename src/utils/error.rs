use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssignerError {
    #[error("Invalid variant count {variants} for experiment '{experiment}': must be at least 1")]
    InvalidVariantCount { experiment: String, variants: u64 },

    #[error("Unknown experiment: {name}")]
    UnknownExperiment { name: String },

    #[error("Experiment '{name}' is defined more than once")]
    DuplicateExperiment { name: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Io,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AssignerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AssignerError::InvalidVariantCount { .. } | AssignerError::UnknownExperiment { .. } => {
                ErrorCategory::Input
            }
            AssignerError::DuplicateExperiment { .. }
            | AssignerError::ConfigValidationError { .. }
            | AssignerError::InvalidConfigValueError { .. }
            | AssignerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AssignerError::IoError(_) => ErrorCategory::Io,
            AssignerError::SerializationError(_) | AssignerError::CsvError(_) => {
                ErrorCategory::Output
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Medium,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AssignerError::InvalidVariantCount { .. } => {
                "Set the variant count to 1 or more, or fall back to the default variant".to_string()
            }
            AssignerError::UnknownExperiment { name } => {
                format!("Add an [[experiments]] entry named '{}' or check the spelling", name)
            }
            AssignerError::DuplicateExperiment { name } => {
                format!("Remove or rename one of the '{}' entries", name)
            }
            AssignerError::ConfigValidationError { field, .. }
            | AssignerError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting in the configuration file", field)
            }
            AssignerError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            AssignerError::IoError(_) => {
                "Check that the file exists and is readable".to_string()
            }
            AssignerError::SerializationError(_) | AssignerError::CsvError(_) => {
                "Try a different --format or report this as a bug".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Cannot assign variant: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Io => format!("Could not read input: {}", self),
            ErrorCategory::Output => format!("Could not write output: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AssignerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_variant_count_is_input_error() {
        let err = AssignerError::InvalidVariantCount {
            experiment: "exp-a".to_string(),
            variants: 0,
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("exp-a"));
        assert!(err.user_friendly_message().starts_with("Cannot assign variant"));
    }

    #[test]
    fn test_io_error_is_medium() {
        let err = AssignerError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }
}
