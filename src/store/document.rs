//! Documents, queries, write batches and the in-process collection set
//! both stores share.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::ids::DocId;

use super::errors::{StoreError, StoreResult};

/// A record type persisted in its own collection.
///
/// Records serialize to JSON objects carrying an `id` key. Fields named in
/// `UNIQUE_FIELDS` must hold distinct values across the collection; absent
/// or null values are not indexed.
pub trait Document: Serialize + DeserializeOwned {
    const COLLECTION: &'static str;

    const UNIQUE_FIELDS: &'static [&'static str] = &[];

    /// Field groups whose combined values must be distinct. A document
    /// missing any member of a group is not indexed for that group.
    const UNIQUE_TOGETHER: &'static [&'static [&'static str]] = &[];

    fn id(&self) -> &DocId;
}

/// Collection name and uniqueness rules of a document type
#[derive(Debug, Clone, Copy)]
struct Schema {
    collection: &'static str,
    unique: &'static [&'static str],
    together: &'static [&'static [&'static str]],
}

impl Schema {
    fn of<T: Document>() -> Self {
        Self {
            collection: T::COLLECTION,
            unique: T::UNIQUE_FIELDS,
            together: T::UNIQUE_TOGETHER,
        }
    }
}

/// Equality filter with skip/limit, evaluated in insertion order.
///
/// A filter on a field holding an array matches when the array contains
/// the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    filter: Vec<(String, Value)>,
    skip: usize,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.push((field.into(), value.into()));
        self
    }

    pub fn skip(mut self, n: usize) -> Self {
        self.skip = n;
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Same filter without skip/limit
    pub fn unpaged(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            skip: 0,
            limit: None,
        }
    }

    pub fn matches(&self, doc: &Value) -> bool {
        self.filter.iter().all(|(field, expected)| match doc.get(field) {
            Some(Value::Array(items)) => items.contains(expected) || doc.get(field) == Some(expected),
            Some(actual) => actual == expected,
            None => expected.is_null(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteKind {
    Insert,
    Replace,
}

#[derive(Debug, Clone)]
struct WriteOp {
    kind: WriteKind,
    schema: Schema,
    value: Value,
}

/// Inserts and replacements applied all together or not at all.
///
/// Documents are encoded when queued, so a batch that was built
/// successfully can only fail on uniqueness, a missing update target or
/// I/O when written.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a new document.
    pub fn insert<T: Document>(&mut self, doc: &T) -> StoreResult<()> {
        self.push(WriteKind::Insert, doc)
    }

    /// Queue a replacement of an existing document.
    pub fn update<T: Document>(&mut self, doc: &T) -> StoreResult<()> {
        self.push(WriteKind::Replace, doc)
    }

    fn push<T: Document>(&mut self, kind: WriteKind, doc: &T) -> StoreResult<()> {
        self.ops.push(WriteOp {
            kind,
            schema: Schema::of::<T>(),
            value: encode(doc)?,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Collections the batch writes to, in name order.
    pub fn collections(&self) -> BTreeSet<&'static str> {
        self.ops.iter().map(|op| op.schema.collection).collect()
    }
}

/// Prior contents of the collections a batch touched
pub(crate) type Snapshot = Vec<(&'static str, Vec<Value>)>;

/// Documents grouped by collection, each collection in insertion order.
#[derive(Debug, Default)]
pub(crate) struct Collections {
    docs: BTreeMap<String, Vec<Value>>,
}

impl Collections {
    pub(crate) fn from_map(docs: BTreeMap<String, Vec<Value>>) -> Self {
        Self { docs }
    }

    pub(crate) fn collection(&self, name: &str) -> &[Value] {
        self.docs.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn snapshot(&self, names: &BTreeSet<&'static str>) -> Snapshot {
        names
            .iter()
            .map(|name| (*name, self.collection(name).to_vec()))
            .collect()
    }

    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        for (name, docs) in snapshot {
            self.docs.insert(name.to_string(), docs);
        }
    }

    /// Apply every write in order. On the first failure the touched
    /// collections are put back as they were.
    pub(crate) fn apply(&mut self, batch: &WriteBatch) -> StoreResult<()> {
        let snapshot = self.snapshot(&batch.collections());
        for op in &batch.ops {
            let applied = match op.kind {
                WriteKind::Insert => self.insert_value(op.schema, op.value.clone()),
                WriteKind::Replace => self.replace_value(op.schema, op.value.clone()),
            };
            if let Err(e) = applied {
                self.restore(snapshot);
                return Err(e);
            }
        }
        Ok(())
    }

    fn insert_value(&mut self, schema: Schema, value: Value) -> StoreResult<()> {
        let existing = self.collection(schema.collection);
        let id = id_of(&value).unwrap_or_default();

        if existing.iter().any(|d| id_of(d) == Some(id)) {
            return Err(duplicate(schema.collection, "id", id));
        }
        check_unique(schema, existing, &value, None)?;

        self.docs
            .entry(schema.collection.to_string())
            .or_default()
            .push(value);
        Ok(())
    }

    fn replace_value(&mut self, schema: Schema, value: Value) -> StoreResult<()> {
        let existing = self.collection(schema.collection);
        let id = id_of(&value).unwrap_or_default();

        let position = existing
            .iter()
            .position(|d| id_of(d) == Some(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: schema.collection.to_string(),
                id: id.to_string(),
            })?;
        check_unique(schema, existing, &value, Some(id))?;

        if let Some(slot) = self
            .docs
            .get_mut(schema.collection)
            .and_then(|docs| docs.get_mut(position))
        {
            *slot = value;
        }
        Ok(())
    }

    pub(crate) fn find_by_id<T: Document>(&self, id: &DocId) -> StoreResult<Option<T>> {
        self.collection(T::COLLECTION)
            .iter()
            .find(|d| id_of(d) == Some(id.as_str()))
            .map(decode)
            .transpose()
    }

    pub(crate) fn find_many<T: Document>(&self, query: &Query) -> StoreResult<Vec<T>> {
        let matching = self
            .collection(T::COLLECTION)
            .iter()
            .filter(|d| query.matches(d))
            .skip(query.skip);

        match query.limit {
            Some(n) => matching.take(n).map(decode).collect(),
            None => matching.map(decode).collect(),
        }
    }

    pub(crate) fn count<T: Document>(&self, query: &Query) -> usize {
        self.collection(T::COLLECTION)
            .iter()
            .filter(|d| query.matches(d))
            .count()
    }
}

fn encode<T: Document>(doc: &T) -> StoreResult<Value> {
    let value = serde_json::to_value(doc)?;
    if !value.is_object() {
        return Err(StoreError::Serialization(format!(
            "{} documents must serialize to objects",
            T::COLLECTION
        )));
    }
    if id_of(&value) != Some(doc.id().as_str()) {
        return Err(StoreError::Serialization(format!(
            "{} documents must carry their id under \"id\"",
            T::COLLECTION
        )));
    }
    Ok(value)
}

fn decode<T: Document>(value: &Value) -> StoreResult<T> {
    Ok(serde_json::from_value(value.clone())?)
}

fn id_of(doc: &Value) -> Option<&str> {
    doc.get("id").and_then(Value::as_str)
}

fn unique_key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Combined key of a field group; `None` when any member is absent.
fn group_key(doc: &Value, fields: &[&str]) -> Option<Vec<String>> {
    fields
        .iter()
        .map(|field| doc.get(*field).and_then(unique_key))
        .collect()
}

fn duplicate(collection: &str, field: &str, value: &str) -> StoreError {
    StoreError::DuplicateKey {
        collection: collection.to_string(),
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Compare `candidate`'s unique fields and groups against every other
/// document.
fn check_unique(
    schema: Schema,
    existing: &[Value],
    candidate: &Value,
    skip_id: Option<&str>,
) -> StoreResult<()> {
    let others = || {
        existing
            .iter()
            .filter(move |d| skip_id.is_none() || id_of(d) != skip_id)
    };

    for field in schema.unique {
        let Some(key) = candidate.get(*field).and_then(unique_key) else {
            continue;
        };
        if others().any(|d| d.get(*field).and_then(unique_key).as_deref() == Some(key.as_str())) {
            return Err(duplicate(schema.collection, field, &key));
        }
    }

    for fields in schema.together {
        let Some(key) = group_key(candidate, fields) else {
            continue;
        };
        if others().any(|d| group_key(d, fields).as_ref() == Some(&key)) {
            return Err(duplicate(schema.collection, &fields.join("+"), &key.join("/")));
        }
    }
    Ok(())
}
