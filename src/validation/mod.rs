//! Field-level validation rules shared by every resource.
//!
//! Each create/update request is checked by an explicit `validate` function that
//! collects every violated constraint into [`ValidationErrors`] before anything
//! is written to the store.

mod coordinates;

pub use coordinates::*;

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

static RE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"));

/// A single violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Accumulator for field violations.
#[derive(Debug, Default, Clone)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }

    /// One-line description listing every violation.
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        format!("Validation failed: {}", parts.join(", "))
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }

    /// `Ok(value)` when nothing was recorded, otherwise the collected errors.
    pub fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// A closed set of string values accepted by a field.
pub trait Choice: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }

    fn allowed() -> String {
        Self::ALL
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Required text field: trimmed when `trim` is set, must be non-empty.
pub fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    trim: bool,
    message: &str,
) -> Option<String> {
    match value.map(|v| if trim { v.trim() } else { v }) {
        Some(v) if !v.trim().is_empty() => Some(v.to_string()),
        _ => {
            errors.push(field, message);
            None
        }
    }
}

/// Text supplied in a partial update: present-but-blank counts as a violation.
pub fn supplied_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    trim: bool,
    message: &str,
) -> Option<String> {
    value.and_then(|_| required_text(errors, field, value, trim, message))
}

pub fn max_chars(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
    message: &str,
) {
    if let Some(v) = value {
        if v.chars().count() > max {
            errors.push(field, message);
        }
    }
}

pub fn choice<T: Choice>(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
) -> Option<T> {
    let raw = value?;
    let parsed = T::parse(raw);
    if parsed.is_none() {
        let message = format!(
            "`{}` is not a valid {} (expected one of: {})",
            raw,
            field,
            T::allowed()
        );
        errors.push(field, message);
    }
    parsed
}

/// Lowercases and pattern-checks an email address.
pub fn email(errors: &mut ValidationErrors, field: &str, value: Option<&str>) -> Option<String> {
    let value = value?.trim().to_lowercase();
    if RE_EMAIL.is_match(&value) {
        Some(value)
    } else {
        errors.push(field, "Please provide a valid email address");
        None
    }
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates.
pub fn date(errors: &mut ValidationErrors, field: &str, value: Option<&str>) -> Option<String> {
    let raw = value?.trim();
    match parse_date(raw) {
        Some(dt) => Some(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => {
            errors.push(field, format!("{} must be a valid date", field));
            None
        }
    }
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Trims each entry and drops empty ones.
pub fn trimmed_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
