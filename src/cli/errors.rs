//! CLI-specific error types

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::school::SchoolError;
use crate::store::StoreError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Already initialized
    AlreadyInitialized,
    /// Not initialized
    NotInitialized,
    /// A flag the operation needs was not given
    MissingArgument,
    /// Store could not be opened
    StoreError,
    /// The operation itself was rejected or failed
    OperationFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "SCHOOLDESK_CLI_CONFIG_ERROR",
            Self::IoError => "SCHOOLDESK_CLI_IO_ERROR",
            Self::AlreadyInitialized => "SCHOOLDESK_CLI_ALREADY_INITIALIZED",
            Self::NotInitialized => "SCHOOLDESK_CLI_NOT_INITIALIZED",
            Self::MissingArgument => "SCHOOLDESK_CLI_MISSING_ARGUMENT",
            Self::StoreError => "SCHOOLDESK_CLI_STORE_ERROR",
            Self::OperationFailed => "SCHOOLDESK_CLI_OPERATION_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
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

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn already_initialized() -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            "Data directory already initialized",
        )
    }

    pub fn not_initialized() -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            "Data directory not initialized. Run 'schooldesk init' first.",
        )
    }

    pub fn missing_argument(flag: &str, operation: &str) -> Self {
        Self::new(
            CliErrorCode::MissingArgument,
            format!("{} is required for {}", flag, operation),
        )
    }

    pub fn operation_failed(err: &SchoolError) -> Self {
        Self::new(CliErrorCode::OperationFailed, err.to_string())
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(CliErrorCode::StoreError, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
