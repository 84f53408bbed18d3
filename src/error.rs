use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Arguments for {method} are invalid")]
    InvalidArguments { method: String },

    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lock poisoned")]
    LockPoisoned,

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Stable error code reported back over the method channel.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput { .. } | AppError::InvalidArguments { .. } => "invalid_arguments",
            AppError::Json(_) => "malformed_message",
            AppError::Io(_) => "io_error",
            AppError::LockPoisoned | AppError::Internal(_) => "internal_error",
        }
    }
}

/// Error type for startup failures of the host binary
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Could not determine project directories")]
    NoProjectDirs,

    #[error("Could not create data directory: {0}")]
    DataDirCreation(std::io::Error),

    #[error("Could not open log file: {0}")]
    LogFile(std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_arguments_message_names_method() {
        let err = AppError::InvalidArguments { method: "updateAppList".into() };
        assert_eq!(err.to_string(), "Arguments for updateAppList are invalid");
        assert_eq!(err.code(), "invalid_arguments");
    }

    #[test]
    fn test_json_error_code() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AppError::from(json_err);
        assert_eq!(err.code(), "malformed_message");
        assert!(err.to_string().starts_with("Malformed message"));
    }
}
