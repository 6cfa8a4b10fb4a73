//! Query options for list operations.

use sqlx::{QueryBuilder, Sqlite};

/// A value an exact-match filter compares against.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Bool(bool),
}

/// Exact-match filters and an optional row limit for a `find_*` call.
///
/// Sort order is fixed per resource and applied by the repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    filters: Vec<(&'static str, FilterValue)>,
    limit: Option<u32>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `column = value`. Column names come from code, never from input.
    pub fn eq_text(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.filters.push((column, FilterValue::Text(value.into())));
        self
    }

    pub fn eq_bool(mut self, column: &'static str, value: bool) -> Self {
        self.filters.push((column, FilterValue::Bool(value)));
        self
    }

    /// Truncate the result. `0` keeps it unbounded.
    pub fn limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit.filter(|n| *n > 0);
        self
    }

    pub(crate) fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        for (i, (column, value)) in self.filters.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            qb.push(*column);
            qb.push(" = ");
            match value {
                FilterValue::Text(s) => qb.push_bind(s.clone()),
                FilterValue::Bool(b) => qb.push_bind(*b),
            };
        }
    }

    pub(crate) fn push_limit(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        if let Some(limit) = self.limit {
            qb.push(" LIMIT ");
            qb.push_bind(i64::from(limit));
        }
    }
}
