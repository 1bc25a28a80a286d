//! Score entry and score sheets
//!
//! A batch is checked as a whole before anything is written: the subject
//! and every student must belong to the acting school, the term must be
//! open for scoring and every student must be enrolled in the subject's
//! class. Rows are upserts on (student, subject, term), written as one
//! store batch. A concurrent batch that inserted the same triple first
//! turns this one into a uniqueness violation.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::auth::CredentialHasher;
use crate::ids::DocId;
use crate::model::{Score, Student, Term};
use crate::observability::{Event, Logger};
use crate::store::{DocumentStore, Query, WriteBatch};
use crate::validation::{validate_assign_scores, validate_get_scores};

use super::errors::{SchoolError, SchoolResult};
use super::{audited, SchoolService};

/// A stored score with its computed total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreLine {
    #[serde(flatten)]
    pub score: Score,
    pub total: f64,
}

impl From<Score> for ScoreLine {
    fn from(score: Score) -> Self {
        let total = score.total();
        Self { score, total }
    }
}

/// Pending write for one student
enum Upsert {
    Insert(Score),
    Update(Score),
}

impl Upsert {
    fn score_mut(&mut self) -> &mut Score {
        match self {
            Upsert::Insert(s) | Upsert::Update(s) => s,
        }
    }

    fn into_score(self) -> Score {
        match self {
            Upsert::Insert(s) | Upsert::Update(s) => s,
        }
    }
}

impl<S: DocumentStore, H: CredentialHasher> SchoolService<S, H> {
    /// Record scores for a subject in a term.
    ///
    /// Returns the stored record for every student in the batch, in the
    /// order each student first appears.
    pub fn assign_scores(&self, school_id: &str, payload: &Value) -> SchoolResult<Vec<Score>> {
        audited(Event::ScoresAssigned, self.run_assign_scores(school_id, payload))
    }

    fn run_assign_scores(&self, school_id: &str, payload: &Value) -> SchoolResult<Vec<Score>> {
        let request = validate_assign_scores(payload)?;
        let subject = self.subject_in_school(&request.subject_id, school_id)?;
        let term: Term = self.require(&request.term_id)?;

        if !term.is_scoring_enabled {
            return Err(SchoolError::ScoringDisabled {
                term_id: term.id.to_string(),
            });
        }

        let mut order: Vec<DocId> = Vec::new();
        let mut pending: BTreeMap<DocId, Upsert> = BTreeMap::new();

        for entry in &request.scores {
            if !pending.contains_key(&entry.student_id) {
                let student: Student = self.require_in_school(&entry.student_id, school_id)?;
                if student.class_id != subject.class_id {
                    return Err(SchoolError::NotEnrolled {
                        student_id: entry.student_id.to_string(),
                        class_id: subject.class_id.to_string(),
                    });
                }
                let upsert = match self.find_score(&entry.student_id, &subject.id, &term.id)? {
                    Some(existing) => Upsert::Update(existing),
                    None => Upsert::Insert(Score::new(
                        entry.student_id.clone(),
                        subject.id.clone(),
                        term.id.clone(),
                    )),
                };
                order.push(entry.student_id.clone());
                pending.insert(entry.student_id.clone(), upsert);
            }
            if let Some(upsert) = pending.get_mut(&entry.student_id) {
                upsert.score_mut().apply(entry);
            }
        }

        let mut batch = WriteBatch::new();
        let mut written = Vec::with_capacity(order.len());
        for student_id in order {
            let Some(upsert) = pending.remove(&student_id) else {
                continue;
            };
            match &upsert {
                Upsert::Insert(score) => batch.insert(score)?,
                Upsert::Update(score) => batch.update(score)?,
            }
            written.push(upsert.into_score());
        }
        self.store.write_batch(&batch)?;

        let count = written.len().to_string();
        Logger::info(
            Event::ScoresAssigned.as_str(),
            &[
                ("subject_id", subject.id.as_str()),
                ("term_id", term.id.as_str()),
                ("count", count.as_str()),
            ],
        );
        Ok(written)
    }

    /// Score sheet for a subject in a term, with totals.
    pub fn get_scores(&self, school_id: &str, payload: &Value) -> SchoolResult<Vec<ScoreLine>> {
        let request = validate_get_scores(payload)?;
        self.subject_in_school(&request.subject_id, school_id)?;
        self.require::<Term>(&request.term_id)?;

        let query = Query::new()
            .eq("subjectId", request.subject_id.as_str())
            .eq("termId", request.term_id.as_str());
        let scores = self.store.find_many::<Score>(&query)?;
        Ok(scores.into_iter().map(ScoreLine::from).collect())
    }

    fn find_score(
        &self,
        student_id: &DocId,
        subject_id: &DocId,
        term_id: &DocId,
    ) -> SchoolResult<Option<Score>> {
        let query = Query::new()
            .eq("studentId", student_id.as_str())
            .eq("subjectId", subject_id.as_str())
            .eq("termId", term_id.as_str())
            .limit(1);
        Ok(self.store.find_many::<Score>(&query)?.pop())
    }
}
