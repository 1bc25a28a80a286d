//! Identifiers
//!
//! `DocId` is the store-level identifier every record carries.
//! Human-facing codes (`SCH-…`, `TCH-…`, `STU-…`) are generated here too.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque document identifier (UUID v4 text).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DocId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for DocId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Prefixes for generated registration codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    School,
    Teacher,
    Student,
}

impl CodeKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            CodeKind::School => "SCH",
            CodeKind::Teacher => "TCH",
            CodeKind::Student => "STU",
        }
    }
}

/// Generate a registration code such as `TCH-3F2A9C1B`.
///
/// Uniqueness is still enforced by the store; a collision surfaces as a
/// duplicate-key rejection.
pub fn generate_code(kind: CodeKind) -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("{}-{}", kind.prefix(), raw[..8].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_ids_are_unique() {
        assert_ne!(DocId::generate(), DocId::generate());
    }

    #[test]
    fn test_code_shape() {
        let code = generate_code(CodeKind::Teacher);
        assert!(code.starts_with("TCH-"));
        assert_eq!(code.len(), 12);
        assert!(code[4..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn test_doc_id_serializes_as_plain_string() {
        let id = DocId::from("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
