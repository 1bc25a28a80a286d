//! File Store Durability Tests
//!
//! - Records written through the service survive a reopen
//! - Rejected writes leave nothing on disk
//! - A failed flush leaves no part of a multi-record write behind
//! - Collection files never hold plaintext passwords

mod common;

use common::hasher;
use schooldesk::model::{Score, Session, Teacher, Term};
use schooldesk::school::{SchoolError, SchoolService};
use schooldesk::store::{DocumentStore, FileStore, Query};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn open(dir: &TempDir) -> SchoolService<FileStore, schooldesk::auth::Argon2Hasher> {
    SchoolService::new(FileStore::open(dir.path()).unwrap(), hasher())
}

#[test]
fn test_school_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let (teacher_id, term_id) = {
        let svc = open(&dir);
        let s = common::school(&svc);
        let (_, term) = common::create_term(&svc);
        svc.toggle_scoring(&json!({ "termId": term.id.as_str(), "isScoringEnabled": true }))
            .unwrap();
        svc.assign_scores(&s.admin.school_id, &json!({
            "subjectId": s.subject.id.as_str(),
            "termId": term.id.as_str(),
            "scores": [{ "studentId": s.students[0].id.as_str(), "exam": 64 }]
        }))
        .unwrap();
        (s.teacher.id, term.id)
    };

    let svc = open(&dir);
    let teacher: Teacher = svc.store().find_by_id(&teacher_id).unwrap().unwrap();
    assert!(teacher.password.verify("teacher-pass", svc.hasher()).unwrap());

    let term: Term = svc.store().find_by_id(&term_id).unwrap().unwrap();
    assert!(term.is_scoring_enabled);
    assert_eq!(svc.store().count::<Score>(&Query::new()).unwrap(), 1);
}

#[test]
fn test_uniqueness_enforced_after_reopen() {
    let dir = TempDir::new().unwrap();
    let school_id = {
        let svc = open(&dir);
        let admin = common::register_admin(&svc, "grace@hillcrest.edu");
        common::create_teacher(&svc, &admin.school_id, "ada@hillcrest.edu");
        admin.school_id
    };

    let svc = open(&dir);
    let err = svc
        .create_teacher(
            &school_id,
            &json!({ "fullName": "Ada Again", "email": "ada@hillcrest.edu", "password": "teacher-pass" }),
        )
        .unwrap_err();
    assert!(matches!(err, SchoolError::UniquenessViolation { .. }));

    let reopened = FileStore::open(dir.path()).unwrap();
    assert_eq!(reopened.count::<Teacher>(&Query::new()).unwrap(), 1);
}

#[test]
fn test_no_plaintext_on_disk() {
    let dir = TempDir::new().unwrap();
    let svc = open(&dir);
    common::school(&svc);

    for name in ["admins.json", "teachers.json", "students.json"] {
        let content = fs::read_to_string(dir.path().join(name)).unwrap();
        assert!(content.contains("$argon2id$"), "{} holds hashes", name);
        for plaintext in ["admin-pass-1", "teacher-pass", "student-pass"] {
            assert!(!content.contains(plaintext), "{} leaks {}", name, plaintext);
        }
    }
}

/// Put a directory where `collection`'s temp file goes, so its flush fails.
fn block_flush(dir: &TempDir, collection: &str) {
    fs::create_dir(dir.path().join(format!("{}.json.tmp", collection))).unwrap();
}

fn unblock_flush(dir: &TempDir, collection: &str) {
    fs::remove_dir(dir.path().join(format!("{}.json.tmp", collection))).unwrap();
}

#[test]
fn test_score_batch_not_persisted_when_flush_fails() {
    let dir = TempDir::new().unwrap();
    let svc = open(&dir);
    let s = common::school(&svc);
    let (_, term) = common::create_term(&svc);
    svc.toggle_scoring(&json!({ "termId": term.id.as_str(), "isScoringEnabled": true }))
        .unwrap();

    block_flush(&dir, "scores");
    let err = svc
        .assign_scores(
            &s.admin.school_id,
            &json!({
                "subjectId": s.subject.id.as_str(),
                "termId": term.id.as_str(),
                "scores": [
                    { "studentId": s.students[0].id.as_str(), "exam": 64 },
                    { "studentId": s.students[1].id.as_str(), "exam": 58 }
                ]
            }),
        )
        .unwrap_err();
    assert!(matches!(err, SchoolError::Storage(_)));
    assert_eq!(svc.store().count::<Score>(&Query::new()).unwrap(), 0);

    unblock_flush(&dir, "scores");
    let reopened = FileStore::open(dir.path()).unwrap();
    assert_eq!(reopened.count::<Score>(&Query::new()).unwrap(), 0);
}

#[test]
fn test_term_creation_rolled_back_when_flush_fails() {
    let dir = TempDir::new().unwrap();
    let svc = open(&dir);
    let session = svc.create_session(&json!({ "year": "2023/2024" })).unwrap();

    // Sessions flush before terms, so the session file has to be put back.
    block_flush(&dir, "terms");
    let err = svc
        .create_term(&json!({ "name": "First Term", "sessionId": session.id.as_str() }))
        .unwrap_err();
    assert!(matches!(err, SchoolError::Storage(_)));
    unblock_flush(&dir, "terms");

    let reopened = FileStore::open(dir.path()).unwrap();
    let stored: Session = reopened.find_by_id(&session.id).unwrap().unwrap();
    assert!(stored.terms.is_empty());
    assert_eq!(reopened.count::<Term>(&Query::new()).unwrap(), 0);

    let term = svc
        .create_term(&json!({ "name": "First Term", "sessionId": session.id.as_str() }))
        .unwrap();
    let stored: Session = FileStore::open(dir.path())
        .unwrap()
        .find_by_id(&session.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.terms, vec![term.id]);
}
