//! Document store errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A unique field already holds this value in another document
    #[error("Duplicate value for unique field {collection}.{field}: '{value}'")]
    DuplicateKey {
        collection: String,
        field: String,
        value: String,
    },

    /// Update target does not exist
    #[error("Document '{id}' not found in {collection}")]
    NotFound { collection: String, id: String },

    /// Record could not be converted to or from its stored form
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),

    /// Collection file exists but does not hold a JSON array of documents
    #[error("Corrupt collection file '{path}': {reason}")]
    Corrupt { path: String, reason: String },

    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::DuplicateKey { .. } => "SCHOOLDESK_STORE_DUPLICATE_KEY",
            StoreError::NotFound { .. } => "SCHOOLDESK_STORE_NOT_FOUND",
            StoreError::Serialization(_) => "SCHOOLDESK_STORE_SERIALIZATION",
            StoreError::Io(_) => "SCHOOLDESK_STORE_IO",
            StoreError::Corrupt { .. } => "SCHOOLDESK_STORE_CORRUPT",
            StoreError::LockPoisoned => "SCHOOLDESK_STORE_LOCK_POISONED",
        }
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, StoreError::DuplicateKey { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e.to_string())
    }
}
