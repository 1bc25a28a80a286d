//! Validation error types
//!
//! A failed validation carries every field violation found in the payload,
//! each tagged with the path of the offending field
//! (`["scores", 0, "test1"]`).

use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;

/// One element of a field path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(s: &str) -> Self {
        PathSegment::Key(s.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        PathSegment::Index(i)
    }
}

/// A single field violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetail {
    pub message: String,
    pub path: Vec<PathSegment>,
}

impl ValidationDetail {
    pub fn new(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path,
        }
    }

    /// Dotted rendering of the path, `scores[0].test1`
    pub fn field(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Key(k) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(k);
                }
                PathSegment::Index(i) => out.push_str(&format!("[{}]", i)),
            }
        }
        out
    }
}

impl fmt::Display for ValidationDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Every violation found in one payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub details: Vec<ValidationDetail>,
}

impl ValidationError {
    pub fn new(details: Vec<ValidationDetail>) -> Self {
        Self { details }
    }

    pub fn single(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self::new(vec![ValidationDetail::new(path, message)])
    }

    /// Returns true if any violation is reported for the given dotted field
    pub fn has_field(&self, field: &str) -> bool {
        self.details.iter().any(|d| d.field() == field)
    }

    /// Violations for one dotted field
    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.details
            .iter()
            .filter(|d| d.field() == field)
            .map(|d| d.message.as_str())
            .collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.details.iter().map(|d| d.message.clone()).collect();
        write!(f, "{}", messages.join(". "))
    }
}

impl std::error::Error for ValidationError {}

/// Result type for validators
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Render a validator outcome in the `{ error?, value }` shape callers
/// expect on the wire. `value` is always the payload as received.
pub fn report<T>(payload: &Value, result: &ValidationResult<T>) -> Value {
    match result {
        Ok(_) => json!({ "value": payload }),
        Err(err) => json!({ "error": err, "value": payload }),
    }
}
