//! File-backed document store
//!
//! One `<collection>.json` file per collection under the data directory,
//! holding a JSON array of documents. Every write rewrites the affected
//! collections through a temp file and a rename, so a reader never sees a
//! half-written file. When one collection of a batch fails to flush, the
//! collections already flushed are rewritten with their prior contents.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::ids::DocId;
use crate::observability::{Event, Logger};

use super::document::{Collections, Document, Query, Snapshot, WriteBatch};
use super::errors::{StoreError, StoreResult};
use super::DocumentStore;

const EXTENSION: &str = "json";

#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    collections: RwLock<Collections>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root` and load every
    /// collection file found there.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        let mut docs = BTreeMap::new();
        for entry in fs::read_dir(&root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            docs.insert(name.to_string(), load_collection(&path)?);
        }

        let count = docs.len().to_string();
        let shown = root.display().to_string();
        Logger::info(
            Event::StoreOpened.as_str(),
            &[("collections", count.as_str()), ("root", shown.as_str())],
        );

        Ok(Self {
            root,
            collections: RwLock::new(Collections::from_map(docs)),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, EXTENSION))
    }

    /// Persist one collection. Called with the write lock held.
    fn flush(&self, collections: &Collections, name: &str) -> StoreResult<()> {
        let path = self.collection_path(name);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(collections.collection(name))?;

        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Put flushed collections back on disk after a later flush failed.
    fn unwind(&self, collections: &Collections, flushed: &[&'static str]) {
        for name in flushed {
            if let Err(e) = self.flush(collections, name) {
                let reason = e.to_string();
                Logger::error(
                    Event::StoreRollbackFailed.as_str(),
                    &[("collection", *name), ("error", reason.as_str())],
                );
            }
        }
    }

    fn flush_all(
        &self,
        collections: &mut Collections,
        before: Snapshot,
        names: &[&'static str],
    ) -> StoreResult<()> {
        for (i, name) in names.iter().enumerate() {
            if let Err(e) = self.flush(collections, name) {
                // Keep memory and disk in step with the state before the batch.
                collections.restore(before);
                self.unwind(collections, &names[..i]);
                let reason = e.to_string();
                Logger::error(
                    Event::StoreFlushFailed.as_str(),
                    &[("collection", *name), ("error", reason.as_str())],
                );
                return Err(e);
            }
        }
        Ok(())
    }
}

fn load_collection(path: &Path) -> StoreResult<Vec<Value>> {
    let content = fs::read_to_string(path)?;
    let corrupt = |reason: String| StoreError::Corrupt {
        path: path.display().to_string(),
        reason,
    };

    let value: Value = serde_json::from_str(&content).map_err(|e| corrupt(e.to_string()))?;
    match value {
        Value::Array(items) if items.iter().all(Value::is_object) => Ok(items),
        _ => Err(corrupt("expected an array of objects".to_string())),
    }
}

impl DocumentStore for FileStore {
    fn write_batch(&self, batch: &WriteBatch) -> StoreResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut guard = self.collections.write().map_err(|_| StoreError::LockPoisoned)?;
        let touched = batch.collections();
        let before = guard.snapshot(&touched);
        let names: Vec<&'static str> = touched.into_iter().collect();

        guard.apply(batch)?;
        self.flush_all(&mut guard, before, &names)
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
