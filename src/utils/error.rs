use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("Reservation store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{field}: {reason}")]
    InvalidFieldError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    Storage,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl IntakeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            IntakeError::ConfigError { .. }
            | IntakeError::InvalidConfigValueError { .. }
            | IntakeError::TomlError(_) => ErrorCategory::Configuration,
            IntakeError::InvalidFieldError { .. } | IntakeError::SerializationError(_) => {
                ErrorCategory::Validation
            }
            IntakeError::DatabaseError(_)
            | IntakeError::PoolError(_)
            | IntakeError::StoreUnavailable { .. } => ErrorCategory::Storage,
            IntakeError::IoError(_) | IntakeError::TaskError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Storage => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the configuration file and command line flags",
            ErrorCategory::Validation => "Correct the submitted data and try again",
            ErrorCategory::Storage => "The reservation store is unavailable, resubmit the form later",
            ErrorCategory::System => "Check file permissions and available resources",
        }
    }

    /// Re-labels a field error raised while checking configuration.
    pub fn into_config_error(self) -> Self {
        match self {
            IntakeError::InvalidFieldError {
                field,
                value,
                reason,
            } => IntakeError::InvalidConfigValueError {
                field,
                value,
                reason,
            },
            other => other,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            IntakeError::InvalidFieldError { reason, .. } => reason.clone(),
            IntakeError::DatabaseError(_)
            | IntakeError::PoolError(_)
            | IntakeError::StoreUnavailable { .. } => {
                "The appointment could not be saved right now".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IntakeError>;
