//! CLI module for schooldesk
//!
//! Provides command-line interface for:
//! - init: Create the data directory (and a default config)
//! - validate: Check a payload against an operation's rules
//! - exec: Run an operation against the file-backed store

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, Operation};
pub use commands::{exec, init, run, run_command, validate, validation_report};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, redact_credentials, write_error, write_failure, write_response};
