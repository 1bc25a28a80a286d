//! Request validation
//!
//! Pure, synchronous checks run before any record is built or stored.
//!
//! # Rules
//!
//! - Payload must be a JSON object; undeclared keys are rejected
//! - Every violation is reported at once, each tagged with its field path
//! - No implicit coercion between strings, numbers and booleans
//! - No storage access: whether a referenced id exists is decided later
//!
//! Validators return typed requests. `report` renders an outcome in the
//! `{ error?: { details: [{ message, path }] }, value }` wire shape.

mod calendar;
mod class;
mod errors;
mod identity;
mod rules;
mod score;
mod subject;

pub use calendar::{
    validate_create_session, validate_create_term, validate_toggle_scoring, CreateSessionRequest,
    CreateTermRequest, ToggleScoringRequest,
};
pub use class::{
    validate_assign_teacher, validate_create_class, validate_list_students,
    validate_list_teacher_classes, AssignTeacherRequest, CreateClassRequest, ListStudentsRequest,
    ListTeacherClassesRequest,
};
pub use errors::{report, PathSegment, ValidationDetail, ValidationError, ValidationResult};
pub use identity::{
    validate_create_student, validate_create_teacher, validate_register_admin,
    validate_update_admin, validate_update_student, validate_update_teacher, CreateStudentRequest,
    CreateTeacherRequest, RegisterAdminRequest, UpdateAdminRequest, UpdateStudentRequest,
    UpdateTeacherRequest,
};
pub use rules::{FieldReader, Length, NAME_LENGTH};
pub use score::{
    validate_assign_scores, validate_get_scores, AssignScoresRequest, GetScoresRequest, ScoreEntry,
    SCORE_MAX, SCORE_MIN,
};
pub use subject::{
    validate_add_subject_students, validate_create_subject, validate_toggle_student_addition,
    AddSubjectStudentsRequest, CreateSubjectRequest, ToggleStudentAdditionRequest,
};
