//! Subject validators

use serde_json::Value;

use crate::ids::DocId;

use super::errors::ValidationResult;
use super::rules::{FieldReader, NAME_LENGTH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSubjectRequest {
    pub name: String,
    pub class_id: DocId,
    pub teacher_id: DocId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddSubjectStudentsRequest {
    pub subject_id: DocId,
    pub student_ids: Vec<DocId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleStudentAdditionRequest {
    pub subject_id: DocId,
    pub allow_student_addition: bool,
}

/// `{ name: 3..=50 chars, classId, teacherId }`
pub fn validate_create_subject(payload: &Value) -> ValidationResult<CreateSubjectRequest> {
    let mut fields = FieldReader::new(payload, &["name", "classId", "teacherId"]);
    let name = fields.required_bounded("name", NAME_LENGTH);
    let class_id = fields.required_string("classId");
    let teacher_id = fields.required_string("teacherId");

    match (name, class_id, teacher_id) {
        (Some(name), Some(class_id), Some(teacher_id)) if fields.is_clean() => {
            Ok(CreateSubjectRequest {
                name,
                class_id: class_id.into(),
                teacher_id: teacher_id.into(),
            })
        }
        _ => Err(fields.into_error()),
    }
}

/// `{ subjectId, studentIds: [id, ...] }` with at least one id
pub fn validate_add_subject_students(payload: &Value) -> ValidationResult<AddSubjectStudentsRequest> {
    let mut fields = FieldReader::new(payload, &["subjectId", "studentIds"]);
    let subject_id = fields.required_string("subjectId");
    let student_ids = fields.required_string_list("studentIds", 1);

    match (subject_id, student_ids) {
        (Some(subject_id), Some(student_ids)) if fields.is_clean() => Ok(AddSubjectStudentsRequest {
            subject_id: subject_id.into(),
            student_ids: student_ids.into_iter().map(DocId::from).collect(),
        }),
        _ => Err(fields.into_error()),
    }
}

pub fn validate_toggle_student_addition(
    payload: &Value,
) -> ValidationResult<ToggleStudentAdditionRequest> {
    let mut fields = FieldReader::new(payload, &["subjectId", "allowStudentAddition"]);
    let subject_id = fields.required_string("subjectId");
    let allow = fields.required_bool("allowStudentAddition");

    match (subject_id, allow) {
        (Some(subject_id), Some(allow_student_addition)) if fields.is_clean() => {
            Ok(ToggleStudentAdditionRequest {
                subject_id: subject_id.into(),
                allow_student_addition,
            })
        }
        _ => Err(fields.into_error()),
    }
}
