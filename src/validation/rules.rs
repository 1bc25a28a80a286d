//! Field-level rules shared by every validator.
//!
//! A `FieldReader` walks one JSON object, pulls typed values out of it and
//! records a violation for every field that does not match. Nothing is
//! coerced: `"2"` is not an integer and `"true"` is not a boolean.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::auth::PasswordPolicy;

use super::errors::{PathSegment, ValidationDetail, ValidationError};

static EMAIL_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn email_pattern() -> Option<&'static Regex> {
    EMAIL_PATTERN
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[A-Za-z]{2,}$").ok())
        .as_ref()
}

/// Character bounds for a string field
#[derive(Debug, Clone, Copy)]
pub struct Length {
    pub min: usize,
    pub max: usize,
}

pub const NAME_LENGTH: Length = Length { min: 3, max: 50 };

/// Largest integer a JSON number holds exactly as a double
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Collects typed fields and violations from a JSON object.
pub struct FieldReader<'a> {
    object: Option<&'a Map<String, Value>>,
    prefix: Vec<PathSegment>,
    errors: Vec<ValidationDetail>,
}

impl<'a> FieldReader<'a> {
    /// Reader over a top-level payload. Keys outside `allowed` are rejected.
    pub fn new(payload: &'a Value, allowed: &[&str]) -> Self {
        Self::at(payload, Vec::new(), allowed)
    }

    fn at(value: &'a Value, prefix: Vec<PathSegment>, allowed: &[&str]) -> Self {
        let mut reader = Self {
            object: value.as_object(),
            prefix,
            errors: Vec::new(),
        };

        match reader.object {
            Some(obj) => {
                let unknown: Vec<&String> =
                    obj.keys().filter(|k| !allowed.contains(&k.as_str())).collect();
                for key in unknown {
                    let path = reader.path(key);
                    let label = label_of(&path);
                    reader
                        .errors
                        .push(ValidationDetail::new(path, format!("\"{}\" is not allowed", label)));
                }
            }
            None => {
                let path = reader.prefix.clone();
                let label = if path.is_empty() {
                    "value".to_string()
                } else {
                    label_of(&path)
                };
                reader.errors.push(ValidationDetail::new(
                    path,
                    format!("\"{}\" must be of type object", label),
                ));
            }
        }

        reader
    }

    /// Reader over a nested object found at `segments` below this reader.
    pub fn nested(&self, segments: Vec<PathSegment>, value: &'a Value, allowed: &[&str]) -> Self {
        let mut prefix = self.prefix.clone();
        prefix.extend(segments);
        Self::at(value, prefix, allowed)
    }

    /// Take over every violation recorded by a nested reader.
    pub fn absorb(&mut self, child: FieldReader<'_>) {
        self.errors.extend(child.errors);
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_error(self) -> ValidationError {
        ValidationError::new(self.errors)
    }

    fn path(&self, key: &str) -> Vec<PathSegment> {
        let mut path = self.prefix.clone();
        path.push(PathSegment::Key(key.to_string()));
        path
    }

    fn fail(&mut self, key: &str, rule: impl FnOnce(&str) -> String) {
        let path = self.path(key);
        let message = rule(&label_of(&path));
        self.errors.push(ValidationDetail::new(path, message));
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.object.and_then(|obj| obj.get(key))
    }

    fn present(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// A required, non-empty string. Surrounding whitespace is trimmed.
    pub fn required_string(&mut self, key: &str) -> Option<String> {
        if self.object.is_some() && !self.present(key) {
            self.fail(key, |l| format!("\"{}\" is required", l));
            return None;
        }
        self.optional_string(key)
    }

    /// An optional string; when present it must be non-empty.
    pub fn optional_string(&mut self, key: &str) -> Option<String> {
        let value = self.get(key)?;
        let Some(s) = value.as_str() else {
            self.fail(key, |l| format!("\"{}\" must be a string", l));
            return None;
        };
        let trimmed = s.trim();
        if trimmed.is_empty() {
            self.fail(key, |l| format!("\"{}\" is not allowed to be empty", l));
            return None;
        }
        Some(trimmed.to_string())
    }

    fn check_length(&mut self, key: &str, value: String, bounds: Length) -> Option<String> {
        let len = value.chars().count();
        if len < bounds.min {
            self.fail(key, |l| {
                format!("\"{}\" length must be at least {} characters long", l, bounds.min)
            });
            return None;
        }
        if len > bounds.max {
            self.fail(key, |l| {
                format!(
                    "\"{}\" length must be less than or equal to {} characters long",
                    l, bounds.max
                )
            });
            return None;
        }
        Some(value)
    }

    /// A required string whose character count lies within `bounds`.
    pub fn required_bounded(&mut self, key: &str, bounds: Length) -> Option<String> {
        let value = self.required_string(key)?;
        self.check_length(key, value, bounds)
    }

    pub fn optional_bounded(&mut self, key: &str, bounds: Length) -> Option<String> {
        let value = self.optional_string(key)?;
        self.check_length(key, value, bounds)
    }

    fn check_email(&mut self, key: &str, value: String) -> Option<String> {
        let valid = email_pattern().map(|re| re.is_match(&value)).unwrap_or(false);
        if !valid {
            self.fail(key, |l| format!("\"{}\" must be a valid email", l));
            return None;
        }
        Some(value.to_lowercase())
    }

    /// A required email address, returned lower-cased.
    pub fn required_email(&mut self, key: &str) -> Option<String> {
        let value = self.required_string(key)?;
        self.check_email(key, value)
    }

    pub fn optional_email(&mut self, key: &str) -> Option<String> {
        let value = self.optional_string(key)?;
        self.check_email(key, value)
    }

    fn check_password(&mut self, key: &str, value: String, policy: &PasswordPolicy) -> Option<String> {
        if let Err(reason) = policy.check(&value) {
            self.fail(key, |l| format!("\"{}\" {}", l, reason));
            return None;
        }
        Some(value)
    }

    /// A required plaintext password satisfying `policy`. Not trimmed.
    pub fn required_password(&mut self, key: &str, policy: &PasswordPolicy) -> Option<String> {
        if self.object.is_some() && !self.present(key) {
            self.fail(key, |l| format!("\"{}\" is required", l));
            return None;
        }
        self.optional_password(key, policy)
    }

    pub fn optional_password(&mut self, key: &str, policy: &PasswordPolicy) -> Option<String> {
        let value = self.get(key)?;
        let Some(s) = value.as_str() else {
            self.fail(key, |l| format!("\"{}\" must be a string", l));
            return None;
        };
        if s.is_empty() {
            self.fail(key, |l| format!("\"{}\" is not allowed to be empty", l));
            return None;
        }
        self.check_password(key, s.to_string(), policy)
    }

    /// An optional integer no smaller than `min`. Whole-valued floats such
    /// as `2.0` count as integers.
    pub fn optional_int_min(&mut self, key: &str, min: u64) -> Option<u64> {
        let value = self.get(key)?;
        let Some(n) = value.as_f64() else {
            self.fail(key, |l| format!("\"{}\" must be a number", l));
            return None;
        };
        if n.fract() != 0.0 {
            self.fail(key, |l| format!("\"{}\" must be an integer", l));
            return None;
        }
        if n < min as f64 {
            self.fail(key, |l| format!("\"{}\" must be greater than or equal to {}", l, min));
            return None;
        }
        match value.as_u64() {
            Some(exact) => Some(exact),
            None if n <= MAX_SAFE_INTEGER => Some(n as u64),
            None => {
                self.fail(key, |l| format!("\"{}\" must be a safe number", l));
                None
            }
        }
    }

    /// An optional number within `[min, max]`.
    pub fn optional_number_between(&mut self, key: &str, min: f64, max: f64) -> Option<f64> {
        let value = self.get(key)?;
        let Some(n) = value.as_f64() else {
            self.fail(key, |l| format!("\"{}\" must be a number", l));
            return None;
        };
        if n < min {
            self.fail(key, |l| format!("\"{}\" must be greater than or equal to {}", l, min));
            return None;
        }
        if n > max {
            self.fail(key, |l| format!("\"{}\" must be less than or equal to {}", l, max));
            return None;
        }
        Some(n)
    }

    pub fn required_bool(&mut self, key: &str) -> Option<bool> {
        if self.object.is_some() && !self.present(key) {
            self.fail(key, |l| format!("\"{}\" is required", l));
            return None;
        }
        let value = self.get(key)?;
        match value.as_bool() {
            Some(b) => Some(b),
            None => {
                self.fail(key, |l| format!("\"{}\" must be a boolean", l));
                None
            }
        }
    }

    /// A required array with at least `min_items` elements.
    pub fn required_array(&mut self, key: &str, min_items: usize) -> Option<&'a Vec<Value>> {
        if self.object.is_some() && !self.present(key) {
            self.fail(key, |l| format!("\"{}\" is required", l));
            return None;
        }
        let value = self.get(key)?;
        let Some(items) = value.as_array() else {
            self.fail(key, |l| format!("\"{}\" must be an array", l));
            return None;
        };
        if items.len() < min_items {
            self.fail(key, |l| format!("\"{}\" must contain at least {} items", l, min_items));
            return None;
        }
        Some(items)
    }

    /// A required array of non-empty strings, at least `min_items` long.
    pub fn required_string_list(&mut self, key: &str, min_items: usize) -> Option<Vec<String>> {
        let items = self.required_array(key, min_items)?;
        let mut out = Vec::with_capacity(items.len());
        let mut clean = true;
        for (i, item) in items.iter().enumerate() {
            let mut path = self.path(key);
            path.push(PathSegment::Index(i));
            let label = label_of(&path);
            match item.as_str().map(str::trim) {
                Some(s) if !s.is_empty() => out.push(s.to_string()),
                Some(_) => {
                    self.errors.push(ValidationDetail::new(
                        path,
                        format!("\"{}\" is not allowed to be empty", label),
                    ));
                    clean = false;
                }
                None => {
                    self.errors
                        .push(ValidationDetail::new(path, format!("\"{}\" must be a string", label)));
                    clean = false;
                }
            }
        }
        clean.then_some(out)
    }

    /// Require that at least one of `keys` is present (update payloads).
    pub fn require_any(&mut self, keys: &[&str]) {
        if self.object.is_none() || keys.iter().any(|k| self.present(k)) {
            return;
        }
        let path = self.prefix.clone();
        let label = if path.is_empty() {
            "value".to_string()
        } else {
            label_of(&path)
        };
        self.errors.push(ValidationDetail::new(
            path,
            format!("\"{}\" must contain at least one of [{}]", label, keys.join(", ")),
        ));
    }
}

/// Label used inside messages: the rendered path, e.g. `scores[0].test1`.
fn label_of(path: &[PathSegment]) -> String {
    ValidationDetail::new(path.to_vec(), String::new()).field()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_object_payload() {
        let payload = json!("nope");
        let reader = FieldReader::new(&payload, &["name"]);
        let err = reader.into_error();
        assert_eq!(err.details[0].message, "\"value\" must be of type object");
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let payload = json!({ "name": "abc", "extra": 1 });
        let mut reader = FieldReader::new(&payload, &["name"]);
        assert_eq!(reader.required_string("name").as_deref(), Some("abc"));
        let err = reader.into_error();
        assert!(err.has_field("extra"));
        assert_eq!(err.details[0].message, "\"extra\" is not allowed");
    }

    #[test]
    fn test_no_string_to_int_coercion() {
        let payload = json!({ "page": "2" });
        let mut reader = FieldReader::new(&payload, &["page"]);
        assert_eq!(reader.optional_int_min("page", 1), None);
        assert_eq!(reader.into_error().messages_for("page"), vec!["\"page\" must be a number"]);
    }

    #[test]
    fn test_fractional_int_rejected() {
        let payload = json!({ "limit": 2.5 });
        let mut reader = FieldReader::new(&payload, &["limit"]);
        assert_eq!(reader.optional_int_min("limit", 1), None);
        assert_eq!(
            reader.into_error().messages_for("limit"),
            vec!["\"limit\" must be an integer"]
        );
    }

    #[test]
    fn test_whole_float_accepted_as_int() {
        let payload = json!({ "page": 2.0, "limit": 1e20 });
        let mut reader = FieldReader::new(&payload, &["page", "limit"]);
        assert_eq!(reader.optional_int_min("page", 1), Some(2));
        assert_eq!(reader.optional_int_min("limit", 1), None);
        assert_eq!(
            reader.into_error().messages_for("limit"),
            vec!["\"limit\" must be a safe number"]
        );
    }

    #[test]
    fn test_negative_int_reports_bound() {
        let payload = json!({ "page": -3 });
        let mut reader = FieldReader::new(&payload, &["page"]);
        assert_eq!(reader.optional_int_min("page", 1), None);
        assert_eq!(
            reader.into_error().messages_for("page"),
            vec!["\"page\" must be greater than or equal to 1"]
        );
    }

    #[test]
    fn test_whitespace_only_string_is_empty() {
        let payload = json!({ "classId": "   " });
        let mut reader = FieldReader::new(&payload, &["classId"]);
        assert_eq!(reader.required_string("classId"), None);
        assert_eq!(
            reader.into_error().messages_for("classId"),
            vec!["\"classId\" is not allowed to be empty"]
        );
    }

    #[test]
    fn test_email_lowercased() {
        let payload = json!({ "email": "Ada@School.ORG" });
        let mut reader = FieldReader::new(&payload, &["email"]);
        assert_eq!(reader.required_email("email").as_deref(), Some("ada@school.org"));
        assert!(reader.is_clean());
    }

    #[test]
    fn test_bad_email() {
        let payload = json!({ "email": "not-an-email" });
        let mut reader = FieldReader::new(&payload, &["email"]);
        assert_eq!(reader.required_email("email"), None);
        assert!(!reader.is_clean());
    }

    #[test]
    fn test_nested_paths() {
        let payload = json!({ "scores": [{ "exam": 120 }] });
        let mut reader = FieldReader::new(&payload, &["scores"]);
        let items = reader.required_array("scores", 1).unwrap();
        let mut child = reader.nested(vec!["scores".into(), 0usize.into()], &items[0], &["exam"]);
        assert_eq!(child.optional_number_between("exam", 0.0, 100.0), None);
        reader.absorb(child);
        let err = reader.into_error();
        assert_eq!(
            err.messages_for("scores[0].exam"),
            vec!["\"scores[0].exam\" must be less than or equal to 100"]
        );
    }

    #[test]
    fn test_require_any() {
        let payload = json!({});
        let mut reader = FieldReader::new(&payload, &["fullName", "email"]);
        reader.require_any(&["fullName", "email"]);
        assert_eq!(
            reader.into_error().details[0].message,
            "\"value\" must contain at least one of [fullName, email]"
        );
    }
}
