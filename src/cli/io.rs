//! JSON I/O handling for CLI
//!
//! - Input: one JSON document on stdin
//! - Output: one JSON object on stdout
//! - Credential hashes never reach the output

use std::io::{self, Read, Write};

use serde_json::{json, Value};

use crate::school::SchoolError;

use super::errors::{CliError, CliResult};

/// Read a JSON payload from stdin
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_request(&input)
}

pub fn parse_request(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }
    Ok(serde_json::from_str(input)?)
}

/// Drop every `password` key, at any depth.
pub fn redact_credentials(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove("password");
            for v in map.values_mut() {
                redact_credentials(v);
            }
        }
        Value::Array(items) => {
            for v in items {
                redact_credentials(v);
            }
        }
        _ => {}
    }
}

/// Write a success response to stdout
pub fn write_response(mut data: Value) -> CliResult<()> {
    redact_credentials(&mut data);
    write_value(&json!({
        "status": "ok",
        "data": data
    }))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_value(&json!({
        "status": "error",
        "code": code,
        "message": message
    }))
}

/// Write a rejected operation; validation failures carry their details.
pub fn write_failure(err: &SchoolError) -> CliResult<()> {
    write_value(&failure_body(err))
}

pub fn failure_body(err: &SchoolError) -> Value {
    let mut body = json!({
        "status": "error",
        "code": err.code(),
        "message": err.to_string()
    });
    if let SchoolError::Validation(details) = err {
        body["details"] = json!(details.details);
    }
    body
}

fn write_value(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
