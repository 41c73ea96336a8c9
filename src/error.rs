use thiserror::Error;

/// Main error type for the trading core
#[derive(Error, Debug)]
pub enum BitHunterError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Input validation errors (malformed series, bad parameters)
    #[error("Validation failed: {0}")]
    Validation(String),

    // Order execution errors
    #[error("Order execution failed: {0}")]
    OrderExecution(String),

    #[error("Execution disabled: {0}")]
    ExecutionDisabled(String),

    // Generic errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl BitHunterError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Result type alias for BitHunterError
pub type Result<T> = std::result::Result<T, BitHunterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = BitHunterError::validation("series cannot be empty");
        assert_eq!(err.to_string(), "Validation failed: series cannot be empty");
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: BitHunterError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, BitHunterError::Other(_)));
        assert_eq!(err.to_string(), "boom");
    }
}
