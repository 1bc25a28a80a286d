//! Class validators

use serde_json::Value;

use crate::ids::DocId;

use super::errors::ValidationResult;
use super::rules::{FieldReader, NAME_LENGTH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateClassRequest {
    pub name: String,
    pub teacher_id: DocId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignTeacherRequest {
    pub class_id: DocId,
    pub teacher_id: DocId,
}

/// Page and limit stay optional; defaults are the caller's policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListStudentsRequest {
    pub class_id: DocId,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTeacherClassesRequest {
    pub teacher_id: DocId,
}

/// `{ name: 3..=50 chars, teacherId }`
pub fn validate_create_class(payload: &Value) -> ValidationResult<CreateClassRequest> {
    let mut fields = FieldReader::new(payload, &["name", "teacherId"]);
    let name = fields.required_bounded("name", NAME_LENGTH);
    let teacher_id = fields.required_string("teacherId");

    match (name, teacher_id) {
        (Some(name), Some(teacher_id)) if fields.is_clean() => Ok(CreateClassRequest {
            name,
            teacher_id: teacher_id.into(),
        }),
        _ => Err(fields.into_error()),
    }
}

/// `{ classId, teacherId }`. Existence is checked by the service.
pub fn validate_assign_teacher(payload: &Value) -> ValidationResult<AssignTeacherRequest> {
    let mut fields = FieldReader::new(payload, &["classId", "teacherId"]);
    let class_id = fields.required_string("classId");
    let teacher_id = fields.required_string("teacherId");

    match (class_id, teacher_id) {
        (Some(class_id), Some(teacher_id)) if fields.is_clean() => Ok(AssignTeacherRequest {
            class_id: class_id.into(),
            teacher_id: teacher_id.into(),
        }),
        _ => Err(fields.into_error()),
    }
}

/// `{ classId, page?: int >= 1, limit?: int >= 1 }`
pub fn validate_list_students(payload: &Value) -> ValidationResult<ListStudentsRequest> {
    let mut fields = FieldReader::new(payload, &["classId", "page", "limit"]);
    let class_id = fields.required_string("classId");
    let page = fields.optional_int_min("page", 1);
    let limit = fields.optional_int_min("limit", 1);

    match class_id {
        Some(class_id) if fields.is_clean() => Ok(ListStudentsRequest {
            class_id: class_id.into(),
            page,
            limit,
        }),
        _ => Err(fields.into_error()),
    }
}

pub fn validate_list_teacher_classes(payload: &Value) -> ValidationResult<ListTeacherClassesRequest> {
    let mut fields = FieldReader::new(payload, &["teacherId"]);
    let teacher_id = fields.required_string("teacherId");

    match teacher_id {
        Some(teacher_id) if fields.is_clean() => Ok(ListTeacherClassesRequest {
            teacher_id: teacher_id.into(),
        }),
        _ => Err(fields.into_error()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_class_valid() {
        let req = validate_create_class(&json!({ "name": "JSS 1A", "teacherId": "t1" })).unwrap();
        assert_eq!(req.name, "JSS 1A");
        assert_eq!(req.teacher_id, DocId::from("t1"));
    }

    #[test]
    fn test_create_class_name_bounds() {
        assert!(validate_create_class(&json!({ "name": "abc", "teacherId": "t1" })).is_ok());
        assert!(validate_create_class(&json!({ "name": "a".repeat(50), "teacherId": "t1" })).is_ok());

        let short = validate_create_class(&json!({ "name": "ab", "teacherId": "t1" })).unwrap_err();
        assert_eq!(
            short.messages_for("name"),
            vec!["\"name\" length must be at least 3 characters long"]
        );

        let long = validate_create_class(&json!({ "name": "a".repeat(51), "teacherId": "t1" }))
            .unwrap_err();
        assert_eq!(
            long.messages_for("name"),
            vec!["\"name\" length must be less than or equal to 50 characters long"]
        );
    }

    #[test]
    fn test_create_class_reports_all_fields() {
        let err = validate_create_class(&json!({ "name": 7 })).unwrap_err();
        assert_eq!(err.details.len(), 2);
        assert!(err.has_field("name"));
        assert_eq!(err.messages_for("teacherId"), vec!["\"teacherId\" is required"]);
    }

    #[test]
    fn test_assign_teacher_requires_both() {
        assert!(validate_assign_teacher(&json!({ "classId": "c1", "teacherId": "t1" })).is_ok());
        let err = validate_assign_teacher(&json!({ "classId": "" })).unwrap_err();
        assert!(err.has_field("classId"));
        assert!(err.has_field("teacherId"));
    }

    #[test]
    fn test_list_students_paging() {
        assert!(validate_list_students(&json!({ "classId": "c1", "page": 0 })).is_err());
        let ok = validate_list_students(&json!({ "classId": "c1", "page": 1, "limit": 10 })).unwrap();
        assert_eq!(ok.page, Some(1));
        assert_eq!(ok.limit, Some(10));

        let bare = validate_list_students(&json!({ "classId": "c1" })).unwrap();
        assert_eq!(bare.page, None);
        assert!(validate_list_students(&json!({ "classId": "c1", "limit": 0 })).is_err());
    }

    #[test]
    fn test_list_teacher_classes() {
        assert!(validate_list_teacher_classes(&json!({ "teacherId": "t1" })).is_ok());
        assert!(validate_list_teacher_classes(&json!({})).is_err());
    }
}
