use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::DocId;
use crate::store::Document;
use crate::validation::ScoreEntry;

/// Scores for one (student, subject, term). Components default to 0.
///
/// The store holds at most one record per triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub id: DocId,
    pub student_id: DocId,
    pub subject_id: DocId,
    pub term_id: DocId,
    #[serde(default)]
    pub test1: f64,
    #[serde(default)]
    pub test2: f64,
    #[serde(default)]
    pub exam: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Score {
    pub fn new(student_id: DocId, subject_id: DocId, term_id: DocId) -> Self {
        let now = Utc::now();
        Self {
            id: DocId::generate(),
            student_id,
            subject_id,
            term_id,
            test1: 0.0,
            test2: 0.0,
            exam: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the components present in `entry`
    pub fn apply(&mut self, entry: &ScoreEntry) {
        if let Some(v) = entry.test1 {
            self.test1 = v;
        }
        if let Some(v) = entry.test2 {
            self.test2 = v;
        }
        if let Some(v) = entry.exam {
            self.exam = v;
        }
        self.updated_at = Utc::now();
    }

    pub fn total(&self) -> f64 {
        self.test1 + self.test2 + self.exam
    }
}

impl Document for Score {
    const COLLECTION: &'static str = "scores";
    const UNIQUE_TOGETHER: &'static [&'static [&'static str]] =
        &[&["studentId", "subjectId", "termId"]];

    fn id(&self) -> &DocId {
        &self.id
    }
}
