//! Subject operations and roster management

use chrono::Utc;
use serde_json::Value;

use crate::auth::CredentialHasher;
use crate::ids::DocId;
use crate::model::{Class, Student, Subject, Teacher};
use crate::observability::{Event, Logger};
use crate::store::{Document, DocumentStore};
use crate::validation::{
    validate_add_subject_students, validate_create_subject, validate_toggle_student_addition,
};

use super::errors::{SchoolError, SchoolResult};
use super::{audited, SchoolService};

impl<S: DocumentStore, H: CredentialHasher> SchoolService<S, H> {
    /// Create a subject for a class, taught by a teacher of the same school.
    pub fn create_subject(&self, school_id: &str, payload: &Value) -> SchoolResult<Subject> {
        audited(Event::SubjectCreated, self.run_create_subject(school_id, payload))
    }

    fn run_create_subject(&self, school_id: &str, payload: &Value) -> SchoolResult<Subject> {
        let request = validate_create_subject(payload)?;
        self.require_in_school::<Class>(&request.class_id, school_id)?;
        self.require_in_school::<Teacher>(&request.teacher_id, school_id)?;

        let subject = Subject::new(request.name, request.class_id, request.teacher_id);
        self.store.insert(&subject)?;

        Logger::info(
            Event::SubjectCreated.as_str(),
            &[
                ("subject_id", subject.id.as_str()),
                ("class_id", subject.class_id.as_str()),
            ],
        );
        Ok(subject)
    }

    /// Add students to a subject's roster.
    ///
    /// Every student must exist and be enrolled in the subject's class.
    /// Students already on the roster are skipped.
    pub fn add_students_to_subject(
        &self,
        school_id: &str,
        payload: &Value,
    ) -> SchoolResult<Subject> {
        audited(
            Event::SubjectStudentsAdded,
            self.run_add_students_to_subject(school_id, payload),
        )
    }

    fn run_add_students_to_subject(
        &self,
        school_id: &str,
        payload: &Value,
    ) -> SchoolResult<Subject> {
        let request = validate_add_subject_students(payload)?;
        let mut subject = self.subject_in_school(&request.subject_id, school_id)?;

        if !subject.allow_student_addition {
            return Err(SchoolError::StudentAdditionClosed {
                subject_id: subject.id.to_string(),
            });
        }

        for student_id in &request.student_ids {
            let student: Student = self.require(student_id)?;
            if student.class_id != subject.class_id {
                return Err(SchoolError::NotEnrolled {
                    student_id: student_id.to_string(),
                    class_id: subject.class_id.to_string(),
                });
            }
        }

        let added = subject.enroll(request.student_ids);
        subject.updated_at = Utc::now();
        self.store.update(&subject)?;

        let added = added.to_string();
        Logger::info(
            Event::SubjectStudentsAdded.as_str(),
            &[("subject_id", subject.id.as_str()), ("added", added.as_str())],
        );
        Ok(subject)
    }

    /// Open or close a subject's roster.
    pub fn toggle_student_addition(
        &self,
        school_id: &str,
        payload: &Value,
    ) -> SchoolResult<Subject> {
        audited(
            Event::SubjectAdditionToggled,
            self.run_toggle_student_addition(school_id, payload),
        )
    }

    fn run_toggle_student_addition(
        &self,
        school_id: &str,
        payload: &Value,
    ) -> SchoolResult<Subject> {
        let request = validate_toggle_student_addition(payload)?;
        let mut subject = self.subject_in_school(&request.subject_id, school_id)?;

        subject.allow_student_addition = request.allow_student_addition;
        subject.updated_at = Utc::now();
        self.store.update(&subject)?;

        Logger::info(
            Event::SubjectAdditionToggled.as_str(),
            &[
                ("subject_id", subject.id.as_str()),
                (
                    "allow_student_addition",
                    if subject.allow_student_addition { "true" } else { "false" },
                ),
            ],
        );
        Ok(subject)
    }

    /// Subjects belong to a school through their class.
    pub(super) fn subject_in_school(&self, id: &DocId, school_id: &str) -> SchoolResult<Subject> {
        let subject: Subject = self.require(id)?;
        let class: Option<Class> = self.store.find_by_id(&subject.class_id)?;
        match class {
            Some(class) if class.school_id == school_id => Ok(subject),
            _ => Err(SchoolError::referential(Subject::COLLECTION, id)),
        }
    }
}
