//! Validation Rule Tests
//!
//! - Name bounds and required references for classes and subjects
//! - Score components bounded to [0, 100], non-empty batches
//! - Paging parameters are integers >= 1
//! - Every violation reported at once, tagged with its path
//! - Validators are deterministic

use schooldesk::validation::{
    report, validate_assign_scores, validate_create_class, validate_create_subject,
    validate_list_students, validate_toggle_scoring,
};
use serde_json::{json, Value};

// =============================================================================
// Class Creation
// =============================================================================

#[test]
fn test_class_name_bounds() {
    let longest = "x".repeat(50);
    for name in ["abc", "Primary Five", longest.as_str()] {
        let payload = json!({ "name": name, "teacherId": "t1" });
        assert!(validate_create_class(&payload).is_ok(), "{} should pass", name);
    }

    let short = validate_create_class(&json!({ "name": "ab", "teacherId": "t1" })).unwrap_err();
    assert_eq!(
        short.messages_for("name"),
        vec!["\"name\" length must be at least 3 characters long"]
    );

    let long =
        validate_create_class(&json!({ "name": "x".repeat(51), "teacherId": "t1" })).unwrap_err();
    assert_eq!(
        long.messages_for("name"),
        vec!["\"name\" length must be less than or equal to 50 characters long"]
    );
}

#[test]
fn test_class_teacher_required() {
    let missing = validate_create_class(&json!({ "name": "Primary Five" })).unwrap_err();
    assert!(missing.has_field("teacherId"));

    let empty = validate_create_class(&json!({ "name": "Primary Five", "teacherId": "" }))
        .unwrap_err();
    assert!(empty.has_field("teacherId"));
}

#[test]
fn test_all_violations_reported_together() {
    let err = validate_create_subject(&json!({ "name": "x", "extra": true })).unwrap_err();
    let fields: Vec<String> = err.details.iter().map(|d| d.field()).collect();
    for field in ["name", "classId", "teacherId", "extra"] {
        assert!(fields.contains(&field.to_string()), "missing {}", field);
    }
}

// =============================================================================
// Scores
// =============================================================================

fn sheet(scores: Value) -> Value {
    json!({ "subjectId": "sub1", "termId": "term1", "scores": scores })
}

#[test]
fn test_score_bounds() {
    for bad in [json!(-0.5), json!(100.01), json!(250)] {
        for component in ["test1", "test2", "exam"] {
            let payload = sheet(json!([{ "studentId": "s1", component: bad.clone() }]));
            let err = validate_assign_scores(&payload).unwrap_err();
            assert!(err.has_field(&format!("scores[0].{}", component)));
        }
    }

    let edges = sheet(json!([{ "studentId": "s1", "test1": 0, "test2": 100, "exam": 50.5 }]));
    assert!(validate_assign_scores(&edges).is_ok());
}

#[test]
fn test_scores_must_be_non_empty() {
    assert!(validate_assign_scores(&sheet(json!([]))).is_err());
    assert!(validate_assign_scores(&json!({ "subjectId": "a", "termId": "b" })).is_err());
    assert!(validate_assign_scores(&sheet(json!([{ "studentId": "s1" }]))).is_ok());
}

#[test]
fn test_scores_need_subject_and_term() {
    let err = validate_assign_scores(&json!({ "scores": [{ "studentId": "s1" }] })).unwrap_err();
    assert!(err.has_field("subjectId"));
    assert!(err.has_field("termId"));
}

// =============================================================================
// Paging
// =============================================================================

#[test]
fn test_page_must_be_positive() {
    assert!(validate_list_students(&json!({ "classId": "c1", "page": 0 })).is_err());
    assert!(validate_list_students(&json!({ "classId": "c1", "limit": 0 })).is_err());
    assert!(validate_list_students(&json!({ "classId": "c1", "page": 1, "limit": 10 })).is_ok());
    assert!(validate_list_students(&json!({ "classId": "c1" })).is_ok());
}

#[test]
fn test_page_is_not_coerced() {
    let err = validate_list_students(&json!({ "classId": "c1", "page": "1" })).unwrap_err();
    assert!(err.has_field("page"));
}

// =============================================================================
// Determinism and the wire report
// =============================================================================

#[test]
fn test_validation_is_deterministic() {
    let payloads = [
        json!({ "name": "Primary Five", "teacherId": "t1" }),
        json!({ "name": "P", "teacherId": 3, "junk": null }),
        json!([1, 2, 3]),
    ];
    for payload in &payloads {
        let first = validate_create_class(payload);
        for _ in 0..50 {
            assert_eq!(validate_create_class(payload), first);
        }
    }
}

#[test]
fn test_report_shape() {
    let payload = json!({ "termId": "t1", "isScoringEnabled": "yes" });
    let rendered = report(&payload, &validate_toggle_scoring(&payload));
    assert_eq!(rendered["value"], payload);
    assert_eq!(
        rendered["error"]["details"],
        json!([{
            "message": "\"isScoringEnabled\" must be a boolean",
            "path": ["isScoringEnabled"]
        }])
    );

    let ok = json!({ "termId": "t1", "isScoringEnabled": false });
    let rendered = report(&ok, &validate_toggle_scoring(&ok));
    assert!(rendered.get("error").is_none());
}

#[test]
fn test_non_object_payload() {
    let err = validate_create_class(&json!(null)).unwrap_err();
    assert_eq!(err.details[0].message, "\"value\" must be of type object");
}
