//! # Service Errors
//!
//! Every outcome of a write is returned to the caller; nothing is retried
//! or swallowed here.

use thiserror::Error;

use crate::auth::AuthError;
use crate::store::StoreError;
use crate::validation::ValidationError;

/// Result type for service operations
pub type SchoolResult<T> = Result<T, SchoolError>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchoolError {
    /// Payload failed structural validation
    #[error("Validation failed: {0}")]
    Validation(ValidationError),

    /// A unique field already holds this value
    #[error("{entity} with {field} '{value}' already exists")]
    UniquenessViolation {
        entity: String,
        field: String,
        value: String,
    },

    /// A referenced record does not exist
    #[error("Referenced {entity} '{id}' does not exist")]
    Referential { entity: String, id: String },

    /// Credential transform failed; nothing was written
    #[error("Internal error: password hashing failed")]
    HashingFailure,

    /// Score write on a term whose scoring flag is off
    #[error("Scoring is disabled for term '{term_id}'")]
    ScoringDisabled { term_id: String },

    /// Student is not a member of the class a subject belongs to
    #[error("Student '{student_id}' is not enrolled in class '{class_id}'")]
    NotEnrolled { student_id: String, class_id: String },

    #[error("Subject '{subject_id}' is closed to student addition")]
    StudentAdditionClosed { subject_id: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl SchoolError {
    pub fn referential(entity: &str, id: impl AsRef<str>) -> Self {
        SchoolError::Referential {
            entity: entity.to_string(),
            id: id.as_ref().to_string(),
        }
    }

    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            SchoolError::Validation(_) => 400,
            SchoolError::NotEnrolled { .. } => 400,
            SchoolError::Referential { .. } => 404,
            SchoolError::UniquenessViolation { .. } => 409,
            SchoolError::ScoringDisabled { .. } => 403,
            SchoolError::StudentAdditionClosed { .. } => 403,
            SchoolError::HashingFailure => 500,
            SchoolError::Storage(_) => 500,
        }
    }

    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            SchoolError::Validation(_) => "SCHOOLDESK_VALIDATION",
            SchoolError::UniquenessViolation { .. } => "SCHOOLDESK_UNIQUENESS_VIOLATION",
            SchoolError::Referential { .. } => "SCHOOLDESK_REFERENCE_MISSING",
            SchoolError::HashingFailure => "SCHOOLDESK_HASHING_FAILURE",
            SchoolError::ScoringDisabled { .. } => "SCHOOLDESK_SCORING_DISABLED",
            SchoolError::NotEnrolled { .. } => "SCHOOLDESK_NOT_ENROLLED",
            SchoolError::StudentAdditionClosed { .. } => "SCHOOLDESK_STUDENT_ADDITION_CLOSED",
            SchoolError::Storage(_) => "SCHOOLDESK_STORAGE",
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<ValidationError> for SchoolError {
    fn from(e: ValidationError) -> Self {
        SchoolError::Validation(e)
    }
}

impl From<StoreError> for SchoolError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateKey {
                collection,
                field,
                value,
            } => SchoolError::UniquenessViolation {
                entity: collection,
                field,
                value,
            },
            StoreError::NotFound { collection, id } => SchoolError::Referential {
                entity: collection,
                id,
            },
            other => SchoolError::Storage(other.to_string()),
        }
    }
}

impl From<AuthError> for SchoolError {
    fn from(_: AuthError) -> Self {
        SchoolError::HashingFailure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_maps_to_uniqueness_violation() {
        let err: SchoolError = StoreError::DuplicateKey {
            collection: "teachers".into(),
            field: "email".into(),
            value: "a@b.co".into(),
        }
        .into();
        assert_eq!(
            err,
            SchoolError::UniquenessViolation {
                entity: "teachers".into(),
                field: "email".into(),
                value: "a@b.co".into(),
            }
        );
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_internal_errors_are_not_client_errors() {
        assert!(!SchoolError::HashingFailure.is_client_error());
        assert!(!SchoolError::from(StoreError::LockPoisoned).is_client_error());
        assert!(SchoolError::ScoringDisabled { term_id: "t".into() }.is_client_error());
    }

    #[test]
    fn test_hashing_error_collapses() {
        let err: SchoolError = AuthError::InvalidParams("m_cost".into()).into();
        assert_eq!(err, SchoolError::HashingFailure);
    }
}
