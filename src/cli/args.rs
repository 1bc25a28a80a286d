//! CLI argument definitions using clap
//!
//! Commands:
//! - schooldesk init --config <path>
//! - schooldesk validate <operation> [--config <path>]
//! - schooldesk exec <operation> --config <path> [--school <code>] [--id <id>]

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// schooldesk - school administration records with validated writes
#[derive(Parser, Debug)]
#[command(name = "schooldesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory, writing a default config if none exists
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./schooldesk.json")]
        config: PathBuf,
    },

    /// Validate a JSON payload from stdin without touching the store
    Validate {
        operation: Operation,

        /// Configuration supplying the password policy
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run an operation with a JSON payload from stdin
    Exec {
        operation: Operation,

        /// Path to configuration file
        #[arg(long, default_value = "./schooldesk.json")]
        config: PathBuf,

        /// Acting school (`SCH-...`) for school-scoped operations
        #[arg(long)]
        school: Option<String>,

        /// Record id for update operations
        #[arg(long)]
        id: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    RegisterAdmin,
    UpdateAdmin,
    CreateTeacher,
    UpdateTeacher,
    CreateStudent,
    UpdateStudent,
    CreateClass,
    AssignTeacher,
    ListStudents,
    ListTeacherClasses,
    CreateSubject,
    AddSubjectStudents,
    ToggleStudentAddition,
    CreateSession,
    CreateTerm,
    ToggleScoring,
    AssignScores,
    GetScores,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::RegisterAdmin => "register-admin",
            Operation::UpdateAdmin => "update-admin",
            Operation::CreateTeacher => "create-teacher",
            Operation::UpdateTeacher => "update-teacher",
            Operation::CreateStudent => "create-student",
            Operation::UpdateStudent => "update-student",
            Operation::CreateClass => "create-class",
            Operation::AssignTeacher => "assign-teacher",
            Operation::ListStudents => "list-students",
            Operation::ListTeacherClasses => "list-teacher-classes",
            Operation::CreateSubject => "create-subject",
            Operation::AddSubjectStudents => "add-subject-students",
            Operation::ToggleStudentAddition => "toggle-student-addition",
            Operation::CreateSession => "create-session",
            Operation::CreateTerm => "create-term",
            Operation::ToggleScoring => "toggle-scoring",
            Operation::AssignScores => "assign-scores",
            Operation::GetScores => "get-scores",
        }
    }

    /// Operations acting inside one school need `--school`
    pub fn needs_school(&self) -> bool {
        matches!(
            self,
            Operation::CreateTeacher
                | Operation::UpdateTeacher
                | Operation::CreateStudent
                | Operation::UpdateStudent
                | Operation::CreateClass
                | Operation::AssignTeacher
                | Operation::ListStudents
                | Operation::ListTeacherClasses
                | Operation::CreateSubject
                | Operation::AddSubjectStudents
                | Operation::ToggleStudentAddition
                | Operation::AssignScores
                | Operation::GetScores
        )
    }

    /// Updates address an existing record through `--id`
    pub fn needs_id(&self) -> bool {
        matches!(
            self,
            Operation::UpdateAdmin | Operation::UpdateTeacher | Operation::UpdateStudent
        )
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
