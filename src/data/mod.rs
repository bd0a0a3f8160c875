//! Storage operations over the workspace database.
//!
//! Every operation takes a borrowed connection and returns a `DataError`
//! carrying a stable error code that the IPC layer forwards unchanged.

pub mod activities;
pub mod gallery;
pub mod participants;
pub mod performance;
pub mod students;
pub mod winners;

use serde_json::json;
use std::fmt;

#[derive(Debug, Clone)]
pub struct DataError {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

pub type DataResult<T> = Result<T, DataError>;

impl DataError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn bad_params(message: impl Into<String>) -> Self {
        Self::new("bad_params", message)
    }

    pub fn not_found(what: &str) -> Self {
        Self::new("not_found", format!("{} not found", what))
    }

    /// Wraps a failed write, tagging the table like the query errors do.
    pub fn write_failed(code: &'static str, table: &str, e: rusqlite::Error) -> Self {
        if is_unique_violation(&e) {
            return Self::new("duplicate", e.to_string()).with_details(json!({ "table": table }));
        }
        Self::new(code, e.to_string()).with_details(json!({ "table": table }))
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for DataError {}

impl From<rusqlite::Error> for DataError {
    fn from(e: rusqlite::Error) -> Self {
        DataError::new("db_query_failed", e.to_string())
    }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    match e {
        rusqlite::Error::SqliteFailure(err, _) => {
            err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        }
        _ => false,
    }
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> DataResult<()> {
    if value.trim().is_empty() {
        return Err(DataError::bad_params(format!("{} must not be empty", field)));
    }
    Ok(())
}

pub(crate) fn require_date(field: &str, value: &str) -> DataResult<()> {
    require_non_empty(field, value)?;
    if !crate::model::is_valid_date(value) {
        return Err(DataError::bad_params(format!(
            "{} must be YYYY-MM-DD or an RFC 3339 timestamp",
            field
        ))
        .with_details(json!({ field: value })));
    }
    Ok(())
}
