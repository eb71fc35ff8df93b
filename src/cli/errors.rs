//! CLI-specific error types
//!
//! Every CLI error is fatal: it is printed to stderr and the process exits 1.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration missing or malformed
    ConfigError,
    /// Store could not be built or closed cleanly
    StoreError,
    /// Runtime or server failure
    ServeFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "CUSTOMER_CLI_CONFIG_ERROR",
            Self::StoreError => "CUSTOMER_CLI_STORE_ERROR",
            Self::ServeFailed => "CUSTOMER_CLI_SERVE_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug, Error)]
#[error("{}: {message}", .code.code())]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn serve_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ServeFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> CliErrorCode {
        self.code
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(CliErrorCode::ConfigError, e.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(CliErrorCode::StoreError, e.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::serve_failed(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_code() {
        let err = CliError::from(ConfigError::MissingField("onyx.api-key"));
        assert_eq!(err.code(), CliErrorCode::ConfigError);
        assert_eq!(
            err.to_string(),
            "CUSTOMER_CLI_CONFIG_ERROR: onyx.api-key must be provided"
        );
    }

    #[test]
    fn test_store_error_code() {
        let err = CliError::from(StoreError::Closed);
        assert_eq!(err.code(), CliErrorCode::StoreError);
    }
}
