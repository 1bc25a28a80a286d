//! Academic sessions and their terms

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::DocId;
use crate::store::Document;

/// An academic year such as "2023/2024". The term list only grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: DocId,
    pub year: String,
    #[serde(default)]
    pub terms: Vec<DocId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(year: String) -> Self {
        let now = Utc::now();
        Self {
            id: DocId::generate(),
            year,
            terms: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn push_term(&mut self, term: DocId) {
        if !self.terms.contains(&term) {
            self.terms.push(term);
        }
        self.updated_at = Utc::now();
    }
}

impl Document for Session {
    const COLLECTION: &'static str = "sessions";

    fn id(&self) -> &DocId {
        &self.id
    }
}

/// A term within a session. Scores can only be written while
/// `is_scoring_enabled` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub id: DocId,
    pub name: String,
    pub session_id: DocId,
    #[serde(default)]
    pub is_scoring_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Term {
    /// New terms start with scoring disabled
    pub fn new(name: String, session_id: DocId) -> Self {
        let now = Utc::now();
        Self {
            id: DocId::generate(),
            name,
            session_id,
            is_scoring_enabled: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Term {
    const COLLECTION: &'static str = "terms";

    fn id(&self) -> &DocId {
        &self.id
    }
}
