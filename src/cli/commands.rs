//! CLI command implementations

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::{Argon2Hasher, PasswordPolicy};
use crate::config::SchoolConfig;
use crate::ids::DocId;
use crate::observability::{Event, Logger};
use crate::school::{SchoolError, SchoolResult, SchoolService};
use crate::store::FileStore;
use crate::validation::{self as v, report};

use super::args::{Command, Operation};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_failure, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Validate { operation, config } => validate(operation, config.as_deref()),
        Command::Exec {
            operation,
            config,
            school,
            id,
        } => exec(&config, operation, school.as_deref(), id.as_deref()),
    }
}

/// Create the data directory.
///
/// A missing config file is written out with defaults first.
pub fn init(config_path: &Path) -> CliResult<()> {
    if !config_path.exists() {
        let defaults = serde_json::to_string_pretty(&SchoolConfig::default())?;
        fs::write(config_path, defaults).map_err(|e| {
            CliError::config_error(format!("Failed to write {:?}: {}", config_path, e))
        })?;
    }

    let config = SchoolConfig::load(config_path)?;
    let data_dir = config.data_dir.as_path();

    if is_initialized(data_dir) {
        return Err(CliError::already_initialized());
    }

    fs::create_dir_all(data_dir).map_err(|e| {
        CliError::config_error(format!("Failed to create directory {:?}: {}", data_dir, e))
    })?;

    write_response(json!({
        "initialized": true,
        "data_dir": data_dir.display().to_string()
    }))
}

/// Run only the validator of an operation and print its report.
pub fn validate(operation: Operation, config_path: Option<&Path>) -> CliResult<()> {
    let policy = match config_path {
        Some(path) => SchoolConfig::load(path)?.password_policy,
        None => PasswordPolicy::default(),
    };
    let payload = read_request()?;
    write_response(validation_report(operation, &payload, &policy))
}

/// `{ error?, value }` report for one operation's validator
pub fn validation_report(operation: Operation, payload: &Value, policy: &PasswordPolicy) -> Value {
    match operation {
        Operation::RegisterAdmin => report(payload, &v::validate_register_admin(payload, policy)),
        Operation::UpdateAdmin => report(payload, &v::validate_update_admin(payload, policy)),
        Operation::CreateTeacher => report(payload, &v::validate_create_teacher(payload, policy)),
        Operation::UpdateTeacher => report(payload, &v::validate_update_teacher(payload, policy)),
        Operation::CreateStudent => report(payload, &v::validate_create_student(payload, policy)),
        Operation::UpdateStudent => report(payload, &v::validate_update_student(payload, policy)),
        Operation::CreateClass => report(payload, &v::validate_create_class(payload)),
        Operation::AssignTeacher => report(payload, &v::validate_assign_teacher(payload)),
        Operation::ListStudents => report(payload, &v::validate_list_students(payload)),
        Operation::ListTeacherClasses => {
            report(payload, &v::validate_list_teacher_classes(payload))
        }
        Operation::CreateSubject => report(payload, &v::validate_create_subject(payload)),
        Operation::AddSubjectStudents => {
            report(payload, &v::validate_add_subject_students(payload))
        }
        Operation::ToggleStudentAddition => {
            report(payload, &v::validate_toggle_student_addition(payload))
        }
        Operation::CreateSession => report(payload, &v::validate_create_session(payload)),
        Operation::CreateTerm => report(payload, &v::validate_create_term(payload)),
        Operation::ToggleScoring => report(payload, &v::validate_toggle_scoring(payload)),
        Operation::AssignScores => report(payload, &v::validate_assign_scores(payload)),
        Operation::GetScores => report(payload, &v::validate_get_scores(payload)),
    }
}

/// Run one operation against the file store.
pub fn exec(
    config_path: &Path,
    operation: Operation,
    school: Option<&str>,
    id: Option<&str>,
) -> CliResult<()> {
    let config = SchoolConfig::load(config_path)?;
    Logger::set_min_severity(config.log_level);
    Logger::info(
        Event::ConfigLoaded.as_str(),
        &[("path", config_path.display().to_string().as_str())],
    );

    if !is_initialized(&config.data_dir) {
        return Err(CliError::not_initialized());
    }

    let school = match (operation.needs_school(), school) {
        (true, None) => return Err(CliError::missing_argument("--school", operation.name())),
        (_, school) => school.unwrap_or_default(),
    };
    let id = match (operation.needs_id(), id) {
        (true, None) => return Err(CliError::missing_argument("--id", operation.name())),
        (_, id) => DocId::from(id.unwrap_or_default()),
    };

    let store = FileStore::open(&config.data_dir)?;
    let hasher = Argon2Hasher::new(config.hashing.clone())
        .map_err(|e| CliError::config_error(e.to_string()))?;
    let service = SchoolService::with_config(store, hasher, &config);

    let payload = read_request()?;
    match dispatch(&service, operation, school, &id, &payload) {
        Ok(data) => write_response(data),
        Err(err) => {
            write_failure(&err)?;
            Err(CliError::operation_failed(&err))
        }
    }
}

fn dispatch(
    service: &SchoolService<FileStore, Argon2Hasher>,
    operation: Operation,
    school: &str,
    id: &DocId,
    payload: &Value,
) -> SchoolResult<Value> {
    match operation {
        Operation::RegisterAdmin => to_data(service.register_admin(payload)),
        Operation::UpdateAdmin => to_data(service.update_admin(id, payload)),
        Operation::CreateTeacher => to_data(service.create_teacher(school, payload)),
        Operation::UpdateTeacher => to_data(service.update_teacher(school, id, payload)),
        Operation::CreateStudent => to_data(service.create_student(school, payload)),
        Operation::UpdateStudent => to_data(service.update_student(school, id, payload)),
        Operation::CreateClass => to_data(service.create_class(school, payload)),
        Operation::AssignTeacher => to_data(service.assign_teacher(school, payload)),
        Operation::ListStudents => to_data(service.list_students(school, payload)),
        Operation::ListTeacherClasses => {
            to_data(service.list_classes_for_teacher(school, payload))
        }
        Operation::CreateSubject => to_data(service.create_subject(school, payload)),
        Operation::AddSubjectStudents => to_data(service.add_students_to_subject(school, payload)),
        Operation::ToggleStudentAddition => {
            to_data(service.toggle_student_addition(school, payload))
        }
        Operation::CreateSession => to_data(service.create_session(payload)),
        Operation::CreateTerm => to_data(service.create_term(payload)),
        Operation::ToggleScoring => to_data(service.toggle_scoring(payload)),
        Operation::AssignScores => to_data(service.assign_scores(school, payload)),
        Operation::GetScores => to_data(service.get_scores(school, payload)),
    }
}

fn to_data<T: Serialize>(result: SchoolResult<T>) -> SchoolResult<Value> {
    let value = result?;
    serde_json::to_value(value).map_err(|e| SchoolError::Storage(e.to_string()))
}

fn is_initialized(data_dir: &Path) -> bool {
    data_dir.is_dir()
}
