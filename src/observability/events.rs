//! Observable events
//!
//! Every log line names one of these. Events are explicit and typed.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    ConfigLoaded,
    StoreOpened,
    StoreFlushFailed,
    StoreRollbackFailed,

    // Identity
    AdminRegistered,
    AdminUpdated,
    TeacherCreated,
    TeacherUpdated,
    StudentCreated,
    StudentUpdated,

    // Classes and subjects
    ClassCreated,
    ClassTeacherAssigned,
    SubjectCreated,
    SubjectStudentsAdded,
    SubjectAdditionToggled,

    // Calendar
    SessionCreated,
    TermCreated,
    TermScoringToggled,

    // Scores
    ScoresAssigned,

    /// A write was refused (validation, uniqueness, references, policy)
    WriteRejected,
    /// A write failed for a reason outside the caller's control
    WriteFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpened => "STORE_OPENED",
            Event::StoreFlushFailed => "STORE_FLUSH_FAILED",
            Event::StoreRollbackFailed => "STORE_ROLLBACK_FAILED",
            Event::AdminRegistered => "ADMIN_REGISTERED",
            Event::AdminUpdated => "ADMIN_UPDATED",
            Event::TeacherCreated => "TEACHER_CREATED",
            Event::TeacherUpdated => "TEACHER_UPDATED",
            Event::StudentCreated => "STUDENT_CREATED",
            Event::StudentUpdated => "STUDENT_UPDATED",
            Event::ClassCreated => "CLASS_CREATED",
            Event::ClassTeacherAssigned => "CLASS_TEACHER_ASSIGNED",
            Event::SubjectCreated => "SUBJECT_CREATED",
            Event::SubjectStudentsAdded => "SUBJECT_STUDENTS_ADDED",
            Event::SubjectAdditionToggled => "SUBJECT_ADDITION_TOGGLED",
            Event::SessionCreated => "SESSION_CREATED",
            Event::TermCreated => "TERM_CREATED",
            Event::TermScoringToggled => "TERM_SCORING_TOGGLED",
            Event::ScoresAssigned => "SCORES_ASSIGNED",
            Event::WriteRejected => "WRITE_REJECTED",
            Event::WriteFailed => "WRITE_FAILED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_screaming_snake() {
        for event in [Event::ScoresAssigned, Event::TermScoringToggled, Event::WriteRejected] {
            let name = event.as_str();
            assert!(name.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }
}
