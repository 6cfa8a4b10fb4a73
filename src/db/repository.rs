//! Database repository shared by the per-resource operations.
//!
//! Post, project and contact operations live in sibling modules as further
//! `impl Repository` blocks. Writes are single statements; nothing here opens
//! a multi-document transaction.

use chrono::{SecondsFormat, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::errors::AppError;
use crate::validation::Choice;

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pub(super) pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Current time as stored in `created_at`/`updated_at`.
///
/// Fixed millisecond precision keeps the text columns sortable.
pub(super) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Checks that `id` is a well-formed key before it reaches a query.
pub(super) fn parse_id(id: &str) -> Result<String, AppError> {
    uuid::Uuid::parse_str(id)
        .map(|uuid| uuid.to_string())
        .map_err(|_| AppError::InvalidId(format!("Invalid identifier: {}", id)))
}

pub(super) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(super) fn to_json_list(values: &[String]) -> Result<String, AppError> {
    Ok(serde_json::to_string(values)?)
}

pub(super) fn parse_json_list(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}

/// Reads an enumerated column back into its typed value.
pub(super) fn stored_choice<T: Choice>(row: &SqliteRow, column: &str) -> Result<T, AppError> {
    let raw: String = row.get(column);
    T::parse(&raw)
        .ok_or_else(|| AppError::Internal(format!("Unexpected {} value in store: {}", column, raw)))
}
