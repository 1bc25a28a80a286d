//! # Credential Errors
//!
//! Error types for the credential hashing collaborator.

use thiserror::Error;

/// Result type for credential operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Credential hashing and verification errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The one-way transform could not be computed
    #[error("Internal error: password hashing failed")]
    HashingFailed,

    /// Hashing parameters are out of range
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),

    /// Stored hash is not a parseable PHC string
    #[error("Stored credential is malformed")]
    MalformedHash,
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::HashingFailed => 500,
            AuthError::InvalidParams(_) => 500,
            AuthError::MalformedHash => 500,
        }
    }
}
