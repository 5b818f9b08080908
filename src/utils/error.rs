use thiserror::Error;

#[derive(Error, Debug)]
pub enum DigestError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Quote provider error for {symbol}: {message}")]
    ProviderError { symbol: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("No market data could be fetched (failed: {})", failed.join(", "))]
    NoMarketData { failed: Vec<String> },

    #[error("Commentary generation failed: {message}")]
    CommentaryError { message: String },

    #[error("Publish failed: {message}")]
    PublishError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DigestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DigestError::ConfigError { .. }
            | DigestError::MissingConfigError { .. }
            | DigestError::InvalidConfigValueError { .. }
            | DigestError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            DigestError::ApiError(_) | DigestError::IoError(_) => ErrorCategory::Network,
            DigestError::SerializationError(_)
            | DigestError::ValidationError { .. }
            | DigestError::NoMarketData { .. } => ErrorCategory::Data,
            DigestError::ProviderError { .. }
            | DigestError::CommentaryError { .. }
            | DigestError::PublishError { .. } => ErrorCategory::External,
        }
    }

    /// 嚴重程度決定行程結束碼，見 `main.rs`
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DigestError::CommentaryError { .. } => ErrorSeverity::Low,
            DigestError::ProviderError { .. } | DigestError::ValidationError { .. } => {
                ErrorSeverity::Medium
            }
            DigestError::ApiError(_)
            | DigestError::SerializationError(_)
            | DigestError::NoMarketData { .. }
            | DigestError::PublishError { .. } => ErrorSeverity::High,
            DigestError::IoError(_)
            | DigestError::ConfigError { .. }
            | DigestError::MissingConfigError { .. }
            | DigestError::InvalidConfigValueError { .. }
            | DigestError::ConfigValidationError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DigestError::MissingConfigError { field } => {
                format!("Set the {} environment variable before running", field)
            }
            DigestError::InvalidConfigValueError { field, .. }
            | DigestError::ConfigValidationError { field, .. } => {
                format!("Check the `{}` entry in the configuration file", field)
            }
            DigestError::ConfigError { .. } => {
                "Make sure the configuration file exists and is valid TOML".to_string()
            }
            DigestError::NoMarketData { .. } => {
                "Check network access to the quote provider and the configured symbols".to_string()
            }
            DigestError::PublishError { .. } => {
                "Verify the webhook URL is still valid and reachable".to_string()
            }
            DigestError::ApiError(_) | DigestError::IoError(_) => {
                "Check network connectivity and retry the run".to_string()
            }
            DigestError::ProviderError { .. } | DigestError::ValidationError { .. } => {
                "The symbol may be delisted or the provider returned partial data".to_string()
            }
            DigestError::CommentaryError { .. } => {
                "Check the API key and quota of the text-generation service".to_string()
            }
            DigestError::SerializationError(_) => {
                "The remote service returned an unexpected payload".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Data => format!("Market data problem: {}", self),
            ErrorCategory::External => format!("External service problem: {}", self),
        }
    }

    /// 致命錯誤一律回傳 1，其餘視為已自行恢復
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium | ErrorSeverity::High | ErrorSeverity::Critical => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, DigestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_critical() {
        let err = DigestError::MissingConfigError {
            field: "OPENAI_API_KEY".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 1);
        assert!(err.recovery_suggestion().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_no_market_data_lists_failed_symbols() {
        let err = DigestError::NoMarketData {
            failed: vec!["日経平均(^N225)".to_string(), "ドル円(USDJPY=X)".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "No market data could be fetched (failed: 日経平均(^N225), ドル円(USDJPY=X))"
        );
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_commentary_error_is_not_fatal() {
        let err = DigestError::CommentaryError {
            message: "rate limited".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.exit_code(), 0);
    }
}
