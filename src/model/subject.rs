use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::DocId;
use crate::store::Document;

/// A subject taught to one class.
///
/// `students` only ever holds students enrolled in `class_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: DocId,
    pub name: String,
    pub class_id: DocId,
    pub teacher_id: DocId,
    #[serde(default)]
    pub students: Vec<DocId>,
    #[serde(default = "default_allow_student_addition")]
    pub allow_student_addition: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_allow_student_addition() -> bool {
    true
}

impl Subject {
    pub fn new(name: String, class_id: DocId, teacher_id: DocId) -> Self {
        let now = Utc::now();
        Self {
            id: DocId::generate(),
            name,
            class_id,
            teacher_id,
            students: Vec::new(),
            allow_student_addition: default_allow_student_addition(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add students not already on the roster; returns how many were new.
    pub fn enroll(&mut self, students: impl IntoIterator<Item = DocId>) -> usize {
        let before = self.students.len();
        for student in students {
            if !self.students.contains(&student) {
                self.students.push(student);
            }
        }
        self.students.len() - before
    }

    /// Take a student off the roster; returns whether they were on it.
    pub fn withdraw(&mut self, student: &DocId) -> bool {
        let before = self.students.len();
        self.students.retain(|s| s != student);
        self.updated_at = Utc::now();
        self.students.len() != before
    }
}

impl Document for Subject {
    const COLLECTION: &'static str = "subjects";

    fn id(&self) -> &DocId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enroll_ignores_duplicates() {
        let mut subject = Subject::new("Biology".into(), "c1".into(), "t1".into());
        let ids = |names: &[&str]| names.iter().map(|n| DocId::from(*n)).collect::<Vec<_>>();
        assert_eq!(subject.enroll(ids(&["s1", "s2", "s1"])), 2);
        assert_eq!(subject.enroll(ids(&["s2"])), 0);
        assert_eq!(subject.students.len(), 2);
    }

    #[test]
    fn test_withdraw() {
        let mut subject = Subject::new("Biology".into(), "c1".into(), "t1".into());
        subject.enroll(["s1", "s2"].map(DocId::from));
        assert!(subject.withdraw(&DocId::from("s1")));
        assert!(!subject.withdraw(&DocId::from("s1")));
        assert_eq!(subject.students, vec![DocId::from("s2")]);
    }

    #[test]
    fn test_addition_flag_defaults_open_when_absent() {
        let json = serde_json::json!({
            "id": "x",
            "name": "Physics",
            "classId": "c1",
            "teacherId": "t1",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        });
        let subject: Subject = serde_json::from_value(json).unwrap();
        assert!(subject.allow_student_addition);
        assert!(subject.students.is_empty());
    }
}
