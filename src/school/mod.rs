//! # School Service
//!
//! The write pipeline for every operation:
//!
//! ```text
//! payload ─▶ validate ─▶ check references / policy ─▶ transform identity fields ─▶ persist
//! ```
//!
//! Each stage can reject; a rejection at any stage means nothing was
//! written. Accepted writes are logged at INFO, rejected ones at WARN
//! (caller errors) or ERROR (internal failures), and the error is always
//! handed back.
//!
//! School-scoped operations take the acting `school_id`; records from
//! another school are reported as missing references.

mod calendar;
mod classes;
mod errors;
mod identity;
mod scores;
mod subjects;

pub use classes::Page;
pub use errors::{SchoolError, SchoolResult};
pub use identity::transform_identity_fields;
pub use scores::ScoreLine;

use crate::auth::{CredentialHasher, PasswordPolicy};
use crate::config::{PaginationConfig, SchoolConfig};
use crate::ids::DocId;
use crate::model::SchoolScoped;
use crate::observability::{Event, Logger};
use crate::store::{Document, DocumentStore};

/// Service over a document store and a credential hasher
pub struct SchoolService<S, H> {
    store: S,
    hasher: H,
    password_policy: PasswordPolicy,
    pagination: PaginationConfig,
}

impl<S: DocumentStore, H: CredentialHasher> SchoolService<S, H> {
    /// Service with default password policy and paging limits
    pub fn new(store: S, hasher: H) -> Self {
        Self {
            store,
            hasher,
            password_policy: PasswordPolicy::default(),
            pagination: PaginationConfig::default(),
        }
    }

    pub fn with_config(store: S, hasher: H, config: &SchoolConfig) -> Self {
        Self {
            store,
            hasher,
            password_policy: config.password_policy.clone(),
            pagination: config.pagination,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn password_policy(&self) -> &PasswordPolicy {
        &self.password_policy
    }

    /// Load a referenced record or fail with `Referential`.
    fn require<T: Document>(&self, id: &DocId) -> SchoolResult<T> {
        self.store
            .find_by_id::<T>(id)?
            .ok_or_else(|| SchoolError::referential(T::COLLECTION, id))
    }

    /// Like `require`, but records owned by another school count as missing.
    fn require_in_school<T: Document + SchoolScoped>(
        &self,
        id: &DocId,
        school_id: &str,
    ) -> SchoolResult<T> {
        let record: T = self.require(id)?;
        if record.school_id() != school_id {
            return Err(SchoolError::referential(T::COLLECTION, id));
        }
        Ok(record)
    }
}

/// Log a rejected write and hand the result back unchanged.
fn audited<T>(operation: Event, result: SchoolResult<T>) -> SchoolResult<T> {
    if let Err(err) = &result {
        let message = err.to_string();
        let status = err.status_code().to_string();
        let fields = [
            ("operation", operation.as_str()),
            ("code", err.code()),
            ("status", status.as_str()),
            ("message", message.as_str()),
        ];
        if err.is_client_error() {
            Logger::warn(Event::WriteRejected.as_str(), &fields);
        } else {
            Logger::error(Event::WriteFailed.as_str(), &fields);
        }
    }
    result
}
