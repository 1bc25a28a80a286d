//! Entity records
//!
//! Typed records for the eight stored entities. Every record carries a
//! store `id` plus `createdAt`/`updatedAt` and serializes camelCase.
//! References between records are store ids (`DocId`).

mod admin;
mod calendar;
mod class;
mod score;
mod student;
mod subject;
mod teacher;

pub use admin::Admin;
pub use calendar::{Session, Term};
pub use class::Class;
pub use score::Score;
pub use student::Student;
pub use subject::Subject;
pub use teacher::Teacher;

/// Records owned by a single school
pub trait SchoolScoped {
    fn school_id(&self) -> &str;
}

impl SchoolScoped for Teacher {
    fn school_id(&self) -> &str {
        &self.school_id
    }
}

impl SchoolScoped for Student {
    fn school_id(&self) -> &str {
        &self.school_id
    }
}

impl SchoolScoped for Class {
    fn school_id(&self) -> &str {
        &self.school_id
    }
}
