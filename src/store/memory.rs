//! In-memory document store

use std::sync::RwLock;

use crate::ids::DocId;

use super::document::{Collections, Document, Query, WriteBatch};
use super::errors::{StoreError, StoreResult};
use super::DocumentStore;

/// Volatile store; everything is lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn write_batch(&self, batch: &WriteBatch) -> StoreResult<()> {
        self.collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .apply(batch)
    }

    fn find_by_id<T: Document>(&self, id: &DocId) -> StoreResult<Option<T>> {
        self.collections
            .read()
            .map_err(|_| StoreError::LockPoisoned)?
            .find_by_id(id)
    }

    fn find_many<T: Document>(&self, query: &Query) -> StoreResult<Vec<T>> {
        self.collections
            .read()
            .map_err(|_| StoreError::LockPoisoned)?
            .find_many(query)
    }

    fn count<T: Document>(&self, query: &Query) -> StoreResult<usize> {
        Ok(self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned)?
            .count::<T>(query))
    }
}
