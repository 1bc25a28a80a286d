//! Shared fixtures for integration tests

#![allow(dead_code)]

use schooldesk::auth::{Argon2Hasher, AuthError, AuthResult, CredentialHasher, HashingConfig};
use schooldesk::model::{Admin, Class, Session, Student, Subject, Teacher, Term};
use schooldesk::school::SchoolService;
use schooldesk::store::{DocumentStore, MemoryStore};
use serde_json::json;

pub type TestService = SchoolService<MemoryStore, Argon2Hasher>;

pub fn hasher() -> Argon2Hasher {
    Argon2Hasher::new(HashingConfig::minimal()).unwrap()
}

pub fn service() -> TestService {
    SchoolService::new(MemoryStore::new(), hasher())
}

/// Hasher that always fails
pub struct BrokenHasher;

impl CredentialHasher for BrokenHasher {
    fn hash(&self, _: &str) -> AuthResult<String> {
        Err(AuthError::HashingFailed)
    }

    fn verify(&self, _: &str, _: &str) -> AuthResult<bool> {
        Err(AuthError::HashingFailed)
    }
}

pub fn register_admin<S: DocumentStore>(svc: &SchoolService<S, Argon2Hasher>, email: &str) -> Admin {
    let domain = email.split('@').nth(1).unwrap_or("school.edu");
    svc.register_admin(&json!({
        "fullName": "Grace Okafor",
        "schoolName": "Hillcrest Academy",
        "adminEmail": email,
        "schoolEmail": format!("office@{}", domain),
        "schoolAddress": "12 Ridge Road",
        "password": "admin-pass-1"
    }))
    .unwrap()
}

pub fn create_teacher<S: DocumentStore>(svc: &SchoolService<S, Argon2Hasher>, school: &str, email: &str) -> Teacher {
    svc.create_teacher(
        school,
        &json!({ "fullName": "Ada Obi", "email": email, "password": "teacher-pass" }),
    )
    .unwrap()
}

pub fn create_class<S: DocumentStore>(svc: &SchoolService<S, Argon2Hasher>, school: &str, teacher: &Teacher) -> Class {
    svc.create_class(
        school,
        &json!({ "name": "JSS 1A", "teacherId": teacher.id.as_str() }),
    )
    .unwrap()
}

pub fn create_student<S: DocumentStore>(
    svc: &SchoolService<S, Argon2Hasher>,
    school: &str,
    class: &Class,
    name: &str,
) -> Student {
    svc.create_student(
        school,
        &json!({ "fullName": name, "password": "student-pass", "classId": class.id.as_str() }),
    )
    .unwrap()
}

pub fn create_subject<S: DocumentStore>(
    svc: &SchoolService<S, Argon2Hasher>,
    school: &str,
    class: &Class,
    teacher: &Teacher,
) -> Subject {
    svc.create_subject(
        school,
        &json!({
            "name": "Mathematics",
            "classId": class.id.as_str(),
            "teacherId": teacher.id.as_str()
        }),
    )
    .unwrap()
}

pub fn create_term<S: DocumentStore>(svc: &SchoolService<S, Argon2Hasher>) -> (Session, Term) {
    let session = svc.create_session(&json!({ "year": "2023/2024" })).unwrap();
    let term = svc
        .create_term(&json!({ "name": "First Term", "sessionId": session.id.as_str() }))
        .unwrap();
    (session, term)
}

/// A school with one teacher, one class, two students and a subject.
pub struct School {
    pub admin: Admin,
    pub teacher: Teacher,
    pub class: Class,
    pub students: Vec<Student>,
    pub subject: Subject,
}

pub fn school<S: DocumentStore>(svc: &SchoolService<S, Argon2Hasher>) -> School {
    let admin = register_admin(svc, "grace@hillcrest.edu");
    let teacher = create_teacher(svc, &admin.school_id, "ada@hillcrest.edu");
    let class = create_class(svc, &admin.school_id, &teacher);
    let students = vec![
        create_student(svc, &admin.school_id, &class, "Tunde Bello"),
        create_student(svc, &admin.school_id, &class, "Chioma Eze"),
    ];
    let subject = create_subject(svc, &admin.school_id, &class, &teacher);
    School {
        admin,
        teacher,
        class,
        students,
        subject,
    }
}
