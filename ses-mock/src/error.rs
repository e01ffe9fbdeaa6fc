//! Error types for ses-mock

use thiserror::Error;

/// Result type alias for ses-mock operations
pub type Result<T> = std::result::Result<T, SesError>;

/// Errors surfaced by the sending engine and the service around it
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SesError {
    /// Recipient address failed validation
    #[error("{0}")]
    InvalidParameterValue(String),

    /// Warm-up ceiling reached for the current day
    #[error("Account is in warm-up period. Daily limit exceeded.")]
    DailyQuotaExceeded,

    /// Send arrived sooner than the configured rate allows
    #[error("Rate limit exceeded")]
    Throttling,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

impl SesError {
    /// Stable machine-readable code reported to API clients
    pub fn code(&self) -> &'static str {
        match self {
            SesError::InvalidParameterValue(_) => "InvalidParameterValue",
            SesError::DailyQuotaExceeded => "DailyQuotaExceeded",
            SesError::Throttling => "ThrottlingException",
            SesError::Config(_) | SesError::Io(_) => "InternalError",
        }
    }

    /// Whether the error is an expected outcome of a send attempt
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SesError::InvalidParameterValue(_) | SesError::DailyQuotaExceeded | SesError::Throttling
        )
    }
}

impl From<std::io::Error> for SesError {
    fn from(e: std::io::Error) -> Self {
        SesError::Io(e.to_string())
    }
}
