//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` first, then `severity`, then fields in key order
//! - Synchronous, no buffering
//! - TRACE..WARN go to stdout, ERROR and FATAL to stderr

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Trace = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    Fatal = 4,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => Severity::Trace,
            1 => Severity::Info,
            2 => Severity::Warn,
            3 => Severity::Error,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static MIN_SEVERITY: AtomicU8 = AtomicU8::new(Severity::Info as u8);

/// Process-wide structured logger
pub struct Logger;

impl Logger {
    /// Drop every line below `severity`
    pub fn set_min_severity(severity: Severity) {
        MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
    }

    pub fn min_severity() -> Severity {
        Severity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
    }

    pub fn enabled(severity: Severity) -> bool {
        severity >= Self::min_severity()
    }

    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if !Self::enabled(severity) {
            return;
        }
        if severity >= Severity::Error {
            Self::write_line(&mut io::stderr(), severity, event, fields);
        } else {
            Self::write_line(&mut io::stdout(), severity, event, fields);
        }
    }

    fn write_line<W: Write>(writer: &mut W, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let line = format_line(severity, event, fields);
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    pub fn trace(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Trace, event, fields);
    }

    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }

    pub fn fatal(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Fatal, event, fields);
    }
}

/// Render one log line, newline-terminated.
///
/// Field keys are sorted; `event` and `severity` always lead and cannot be
/// shadowed by a field of the same name.
pub fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut sorted: Vec<&(&str, &str)> = fields
        .iter()
        .filter(|(k, _)| *k != "event" && *k != "severity")
        .collect();
    sorted.sort_by_key(|(k, _)| *k);

    // serde_json's Map keeps insertion order only with `preserve_order`,
    // so each piece is encoded separately.
    let mut out = String::with_capacity(128);
    out.push('{');
    push_pair(&mut out, "event", event);
    out.push(',');
    push_pair(&mut out, "severity", severity.as_str());
    for (key, value) in sorted {
        out.push(',');
        push_pair(&mut out, key, value);
    }
    out.push_str("}\n");
    out
}

fn push_pair(out: &mut String, key: &str, value: &str) {
    out.push_str(&Value::String(key.to_string()).to_string());
    out.push(':');
    out.push_str(&Value::String(value.to_string()).to_string());
}

/// Parse a rendered line back into its fields (test and tooling helper).
pub fn parse_line(line: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str(line.trim_end()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_line_is_valid_json() {
        let line = format_line(Severity::Info, "CLASS_CREATED", &[("class_id", "c1")]);
        let parsed = parse_line(&line).unwrap();
        assert_eq!(parsed["event"], "CLASS_CREATED");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["class_id"], "c1");
    }

    #[test]
    fn test_deterministic_ordering() {
        let a = format_line(Severity::Warn, "E", &[("zebra", "1"), ("apple", "2")]);
        let b = format_line(Severity::Warn, "E", &[("apple", "2"), ("zebra", "1")]);
        assert_eq!(a, b);
        assert!(a.find("apple").unwrap() < a.find("zebra").unwrap());
        assert!(a.find("\"event\"").unwrap() < a.find("\"severity\"").unwrap());
    }

    #[test]
    fn test_escaping_and_single_line() {
        let line = format_line(Severity::Info, "E", &[("msg", "say \"hi\"\nbye")]);
        assert_eq!(line.matches('\n').count(), 1);
        assert_eq!(parse_line(&line).unwrap()["msg"], "say \"hi\"\nbye");
    }

    #[test]
    fn test_reserved_keys_not_shadowed() {
        let line = format_line(Severity::Info, "REAL", &[("event", "FAKE")]);
        assert_eq!(parse_line(&line).unwrap()["event"], "REAL");
    }

    #[test]
    fn test_severity_from_config_text() {
        let s: Severity = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(s, Severity::Warn);
    }
}
