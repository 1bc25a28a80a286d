//! Document persistence
//!
//! The persistence collaborator: stores records by collection, enforces
//! declared unique fields and rejects duplicates with a distinguishable
//! `StoreError::DuplicateKey`. A `WriteBatch` lands whole or not at all;
//! single inserts and updates are one-document batches.

mod document;
mod errors;
mod file;
mod memory;

pub use document::{Document, Query, WriteBatch};
pub use errors::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;

use serde_json::Value;

use crate::ids::DocId;

/// Storage operations the service layer depends on.
pub trait DocumentStore: Send + Sync {
    /// Apply every write of the batch under one lock. Uniqueness is checked
    /// against the documents already written, including earlier writes of
    /// the same batch. Any failure leaves every collection as it was.
    fn write_batch(&self, batch: &WriteBatch) -> StoreResult<()>;

    /// Insert a new document; fails on duplicate id or unique value.
    fn insert<T: Document>(&self, doc: &T) -> StoreResult<()> {
        let mut batch = WriteBatch::new();
        batch.insert(doc)?;
        self.write_batch(&batch)
    }

    /// Replace an existing document by id.
    fn update<T: Document>(&self, doc: &T) -> StoreResult<()> {
        let mut batch = WriteBatch::new();
        batch.update(doc)?;
        self.write_batch(&batch)
    }

    fn find_by_id<T: Document>(&self, id: &DocId) -> StoreResult<Option<T>>;

    fn find_many<T: Document>(&self, query: &Query) -> StoreResult<Vec<T>>;

    /// Number of documents matching the query's filter; skip/limit are ignored.
    fn count<T: Document>(&self, query: &Query) -> StoreResult<usize>;

    /// First document whose `field` equals `value`.
    fn find_one<T: Document>(&self, field: &str, value: impl Into<Value>) -> StoreResult<Option<T>> {
        let mut found = self.find_many::<T>(&Query::new().eq(field, value).limit(1))?;
        Ok(found.pop())
    }

    fn exists<T: Document>(&self, id: &DocId) -> StoreResult<bool> {
        Ok(self.find_by_id::<T>(id)?.is_some())
    }
}
