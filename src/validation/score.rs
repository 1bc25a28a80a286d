//! Score validators

use serde_json::Value;

use crate::ids::DocId;

use super::errors::{PathSegment, ValidationResult};
use super::rules::FieldReader;

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

/// One row of a score sheet. Absent components leave the stored value alone.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    pub student_id: DocId,
    pub test1: Option<f64>,
    pub test2: Option<f64>,
    pub exam: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignScoresRequest {
    pub subject_id: DocId,
    pub term_id: DocId,
    pub scores: Vec<ScoreEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetScoresRequest {
    pub subject_id: DocId,
    pub term_id: DocId,
}

/// `{ subjectId, termId, scores: [{ studentId, test1?, test2?, exam? }, ...] }`
///
/// `scores` must hold at least one entry; each component lies in [0, 100].
pub fn validate_assign_scores(payload: &Value) -> ValidationResult<AssignScoresRequest> {
    let mut fields = FieldReader::new(payload, &["subjectId", "termId", "scores"]);
    let subject_id = fields.required_string("subjectId");
    let term_id = fields.required_string("termId");
    let rows = fields.required_array("scores", 1);

    let mut scores = Vec::new();
    for (i, row) in rows.into_iter().flatten().enumerate() {
        let mut entry = fields.nested(
            vec!["scores".into(), PathSegment::Index(i)],
            row,
            &["studentId", "test1", "test2", "exam"],
        );
        let student_id = entry.required_string("studentId");
        let test1 = entry.optional_number_between("test1", SCORE_MIN, SCORE_MAX);
        let test2 = entry.optional_number_between("test2", SCORE_MIN, SCORE_MAX);
        let exam = entry.optional_number_between("exam", SCORE_MIN, SCORE_MAX);

        if let Some(student_id) = student_id {
            scores.push(ScoreEntry {
                student_id: student_id.into(),
                test1,
                test2,
                exam,
            });
        }
        fields.absorb(entry);
    }

    match (subject_id, term_id) {
        (Some(subject_id), Some(term_id)) if fields.is_clean() => Ok(AssignScoresRequest {
            subject_id: subject_id.into(),
            term_id: term_id.into(),
            scores,
        }),
        _ => Err(fields.into_error()),
    }
}

pub fn validate_get_scores(payload: &Value) -> ValidationResult<GetScoresRequest> {
    let mut fields = FieldReader::new(payload, &["subjectId", "termId"]);
    let subject_id = fields.required_string("subjectId");
    let term_id = fields.required_string("termId");

    match (subject_id, term_id) {
        (Some(subject_id), Some(term_id)) if fields.is_clean() => Ok(GetScoresRequest {
            subject_id: subject_id.into(),
            term_id: term_id.into(),
        }),
        _ => Err(fields.into_error()),
    }
}
