//! Admin, teacher and student writes
//!
//! The identity step of the pipeline turns a plaintext password into a
//! `Credential` exactly once per password-changing write, before anything
//! is persisted. Writes without a password leave the stored hash alone.

use chrono::Utc;
use serde_json::Value;

use crate::auth::{Credential, CredentialHasher, IdentityRecord};
use crate::ids::DocId;
use crate::model::{Admin, Class, Student, Subject, Teacher};
use crate::observability::{Event, Logger};
use crate::store::{Document, DocumentStore, Query, WriteBatch};
use crate::validation::{
    validate_create_student, validate_create_teacher, validate_register_admin,
    validate_update_admin, validate_update_student, validate_update_teacher,
};

use super::errors::{SchoolError, SchoolResult};
use super::{audited, SchoolService};

/// Replace the record's credential when the change set carries a password.
///
/// Returns whether a new hash was written into the record. A hashing
/// failure leaves the record untouched.
pub fn transform_identity_fields<R: IdentityRecord>(
    record: &mut R,
    password: Option<&str>,
    hasher: &dyn CredentialHasher,
) -> SchoolResult<bool> {
    match password {
        Some(plaintext) => {
            record.set_credential(Credential::from_plaintext(plaintext, hasher)?);
            Ok(true)
        }
        None => Ok(false),
    }
}

impl<S: DocumentStore, H: CredentialHasher> SchoolService<S, H> {
    fn hash(&self, plaintext: &str) -> SchoolResult<Credential> {
        Ok(Credential::from_plaintext(plaintext, &self.hasher)?)
    }

    /// Admin emails are unique across both email fields: no other admin
    /// may hold either address as its login or its school contact.
    /// `owner` is the admin being updated, whose own addresses don't clash.
    fn ensure_admin_emails_free(
        &self,
        owner: Option<&DocId>,
        emails: [&str; 2],
    ) -> SchoolResult<()> {
        for email in emails {
            for field in ["adminEmail", "schoolEmail"] {
                if let Some(holder) = self.store.find_one::<Admin>(field, email)? {
                    if Some(&holder.id) != owner {
                        return Err(SchoolError::UniquenessViolation {
                            entity: Admin::COLLECTION.to_string(),
                            field: field.to_string(),
                            value: email.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Register a school administrator; generates the `schoolId`.
    pub fn register_admin(&self, payload: &Value) -> SchoolResult<Admin> {
        audited(Event::AdminRegistered, self.run_register_admin(payload))
    }

    fn run_register_admin(&self, payload: &Value) -> SchoolResult<Admin> {
        let request = validate_register_admin(payload, &self.password_policy)?;
        self.ensure_admin_emails_free(
            None,
            [request.admin_email.as_str(), request.school_email.as_str()],
        )?;
        let password = self.hash(&request.password)?;
        let admin = Admin::new(request, password);

        self.store.insert(&admin)?;

        Logger::info(
            Event::AdminRegistered.as_str(),
            &[("admin_id", admin.id.as_str()), ("school_id", admin.school_id.as_str())],
        );
        Ok(admin)
    }

    pub fn update_admin(&self, admin_id: &DocId, payload: &Value) -> SchoolResult<Admin> {
        audited(Event::AdminUpdated, self.run_update_admin(admin_id, payload))
    }

    fn run_update_admin(&self, admin_id: &DocId, payload: &Value) -> SchoolResult<Admin> {
        let request = validate_update_admin(payload, &self.password_policy)?;
        let mut admin: Admin = self.require(admin_id)?;

        if let Some(v) = request.full_name {
            admin.full_name = v;
        }
        if let Some(v) = request.school_name {
            admin.school_name = v;
        }
        if let Some(v) = request.admin_email {
            admin.admin_email = v;
        }
        if let Some(v) = request.school_email {
            admin.school_email = v;
        }
        if let Some(v) = request.school_address {
            admin.school_address = v;
        }
        self.ensure_admin_emails_free(
            Some(&admin.id),
            [admin.admin_email.as_str(), admin.school_email.as_str()],
        )?;
        let rehashed =
            transform_identity_fields(&mut admin, request.password.as_deref(), &self.hasher)?;
        admin.updated_at = Utc::now();

        self.store.update(&admin)?;

        Logger::info(
            Event::AdminUpdated.as_str(),
            &[
                ("admin_id", admin.id.as_str()),
                ("password_changed", if rehashed { "true" } else { "false" }),
            ],
        );
        Ok(admin)
    }

    /// Create a teacher in `school_id`; generates the `teacherId`.
    pub fn create_teacher(&self, school_id: &str, payload: &Value) -> SchoolResult<Teacher> {
        audited(Event::TeacherCreated, self.run_create_teacher(school_id, payload))
    }

    fn run_create_teacher(&self, school_id: &str, payload: &Value) -> SchoolResult<Teacher> {
        let request = validate_create_teacher(payload, &self.password_policy)?;
        let password = self.hash(&request.password)?;
        let teacher = Teacher::new(request, school_id, password);

        self.store.insert(&teacher)?;

        Logger::info(
            Event::TeacherCreated.as_str(),
            &[
                ("id", teacher.id.as_str()),
                ("school_id", school_id),
                ("teacher_id", teacher.teacher_id.as_str()),
            ],
        );
        Ok(teacher)
    }

    pub fn update_teacher(
        &self,
        school_id: &str,
        teacher_id: &DocId,
        payload: &Value,
    ) -> SchoolResult<Teacher> {
        audited(
            Event::TeacherUpdated,
            self.run_update_teacher(school_id, teacher_id, payload),
        )
    }

    fn run_update_teacher(
        &self,
        school_id: &str,
        teacher_id: &DocId,
        payload: &Value,
    ) -> SchoolResult<Teacher> {
        let request = validate_update_teacher(payload, &self.password_policy)?;
        let mut teacher: Teacher = self.require_in_school(teacher_id, school_id)?;

        if let Some(v) = request.full_name {
            teacher.full_name = v;
        }
        if let Some(v) = request.email {
            teacher.email = v;
        }
        let rehashed =
            transform_identity_fields(&mut teacher, request.password.as_deref(), &self.hasher)?;
        teacher.updated_at = Utc::now();

        self.store.update(&teacher)?;

        Logger::info(
            Event::TeacherUpdated.as_str(),
            &[
                ("id", teacher.id.as_str()),
                ("password_changed", if rehashed { "true" } else { "false" }),
            ],
        );
        Ok(teacher)
    }

    /// Create a student in `school_id`, enrolled in an existing class of
    /// that school; generates the `studentId`.
    pub fn create_student(&self, school_id: &str, payload: &Value) -> SchoolResult<Student> {
        audited(Event::StudentCreated, self.run_create_student(school_id, payload))
    }

    fn run_create_student(&self, school_id: &str, payload: &Value) -> SchoolResult<Student> {
        let request = validate_create_student(payload, &self.password_policy)?;
        self.require_in_school::<Class>(&request.class_id, school_id)?;
        let password = self.hash(&request.password)?;
        let student = Student::new(request, school_id, password);

        self.store.insert(&student)?;

        Logger::info(
            Event::StudentCreated.as_str(),
            &[
                ("id", student.id.as_str()),
                ("class_id", student.class_id.as_str()),
                ("student_id", student.student_id.as_str()),
            ],
        );
        Ok(student)
    }

    /// Update a student. Moving the student to another class takes them off
    /// every subject roster of the old class in the same write.
    pub fn update_student(
        &self,
        school_id: &str,
        student_id: &DocId,
        payload: &Value,
    ) -> SchoolResult<Student> {
        audited(
            Event::StudentUpdated,
            self.run_update_student(school_id, student_id, payload),
        )
    }

    fn run_update_student(
        &self,
        school_id: &str,
        student_id: &DocId,
        payload: &Value,
    ) -> SchoolResult<Student> {
        let request = validate_update_student(payload, &self.password_policy)?;
        let mut student: Student = self.require_in_school(student_id, school_id)?;
        let mut batch = WriteBatch::new();
        let mut withdrawn = 0usize;

        if let Some(class_id) = request.class_id {
            self.require_in_school::<Class>(&class_id, school_id)?;
            if class_id != student.class_id {
                let rosters = Query::new()
                    .eq("classId", student.class_id.as_str())
                    .eq("students", student.id.as_str());
                for mut subject in self.store.find_many::<Subject>(&rosters)? {
                    if subject.withdraw(&student.id) {
                        batch.update(&subject)?;
                        withdrawn += 1;
                    }
                }
                student.class_id = class_id;
            }
        }
        if let Some(v) = request.full_name {
            student.full_name = v;
        }
        if let Some(v) = request.email {
            student.email = Some(v);
        }
        let rehashed =
            transform_identity_fields(&mut student, request.password.as_deref(), &self.hasher)?;
        student.updated_at = Utc::now();

        batch.update(&student)?;
        self.store.write_batch(&batch)?;

        let withdrawn = withdrawn.to_string();
        Logger::info(
            Event::StudentUpdated.as_str(),
            &[
                ("id", student.id.as_str()),
                ("class_id", student.class_id.as_str()),
                ("rosters_left", withdrawn.as_str()),
                ("password_changed", if rehashed { "true" } else { "false" }),
            ],
        );
        Ok(student)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Argon2Hasher, AuthError, AuthResult, HashingConfig};
    use crate::school::SchoolError;
    use crate::validation::CreateTeacherRequest;

    struct BrokenHasher;

    impl CredentialHasher for BrokenHasher {
        fn hash(&self, _: &str) -> AuthResult<String> {
            Err(AuthError::HashingFailed)
        }

        fn verify(&self, _: &str, _: &str) -> AuthResult<bool> {
            Err(AuthError::HashingFailed)
        }
    }

    fn teacher(hasher: &dyn CredentialHasher) -> Teacher {
        let request = CreateTeacherRequest {
            full_name: "Ada Obi".into(),
            email: "ada@school.edu".into(),
            password: "original-pass".into(),
        };
        let password = Credential::from_plaintext(&request.password, hasher).unwrap();
        Teacher::new(request, "SCH-1", password)
    }

    #[test]
    fn test_no_password_no_rehash() {
        let hasher = Argon2Hasher::new(HashingConfig::minimal()).unwrap();
        let mut record = teacher(&hasher);
        let before = record.password.clone();

        assert!(!transform_identity_fields(&mut record, None, &hasher).unwrap());
        assert_eq!(record.password, before);
    }

    #[test]
    fn test_password_is_rehashed() {
        let hasher = Argon2Hasher::new(HashingConfig::minimal()).unwrap();
        let mut record = teacher(&hasher);

        assert!(transform_identity_fields(&mut record, Some("changed-pass"), &hasher).unwrap());
        assert!(record.password.verify("changed-pass", &hasher).unwrap());
        assert!(!record.password.verify("original-pass", &hasher).unwrap());
    }

    #[test]
    fn test_hash_failure_leaves_record_untouched() {
        let hasher = Argon2Hasher::new(HashingConfig::minimal()).unwrap();
        let mut record = teacher(&hasher);
        let before = record.password.clone();

        let err = transform_identity_fields(&mut record, Some("changed-pass"), &BrokenHasher)
            .unwrap_err();
        assert_eq!(err, SchoolError::HashingFailure);
        assert_eq!(record.password, before);
    }
}
