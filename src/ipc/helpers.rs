use crate::data::DataError;
use crate::ipc::types::AppState;
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::path::{Path, PathBuf};

pub type HandlerResult = Result<serde_json::Value, DataError>;

pub fn db_conn(state: &AppState) -> Result<&Connection, DataError> {
    state
        .db
        .as_ref()
        .ok_or_else(|| DataError::new("no_workspace", "select a workspace first"))
}

pub fn workspace_path(state: &AppState) -> Result<&Path, DataError> {
    state
        .workspace
        .as_deref()
        .ok_or_else(|| DataError::new("no_workspace", "select a workspace first"))
}

pub fn required_str(params: &serde_json::Value, key: &str) -> Result<String, DataError> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DataError::bad_params(format!("missing {}", key)))
}

pub fn optional_str(params: &serde_json::Value, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn required_i64(params: &serde_json::Value, key: &str) -> Result<i64, DataError> {
    params
        .get(key)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| DataError::bad_params(format!("missing {}", key)))
}

pub fn optional_bool(params: &serde_json::Value, key: &str) -> bool {
    params.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
}

pub fn required_path(params: &serde_json::Value, key: &str) -> Result<PathBuf, DataError> {
    required_str(params, key).map(PathBuf::from)
}

/// Deserializes `params[key]` into a typed input.
pub fn parse_param<T: DeserializeOwned>(params: &serde_json::Value, key: &str) -> Result<T, DataError> {
    let Some(v) = params.get(key) else {
        return Err(DataError::bad_params(format!("missing {}", key)));
    };
    serde_json::from_value(v.clone()).map_err(|e| {
        DataError::bad_params(format!("invalid {}: {}", key, e)).with_details(json!({ "field": key }))
    })
}

/// Deserializes the whole params object, e.g. list filters.
pub fn parse_params<T: DeserializeOwned + Default>(params: &serde_json::Value) -> Result<T, DataError> {
    if params.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(params.clone())
        .map_err(|e| DataError::bad_params(format!("invalid params: {}", e)))
}

/// Mutations need a live admin token once credentials are configured.
pub fn require_admin(state: &AppState, params: &serde_json::Value) -> Result<(), DataError> {
    if !state.config.admin_enabled() {
        return Ok(());
    }
    match params.get("adminToken").and_then(|v| v.as_str()) {
        Some(token) if state.sessions.check(token) => Ok(()),
        _ => Err(DataError::new("unauthorized", "admin login required")),
    }
}

pub fn io_failed(e: anyhow::Error) -> DataError {
    DataError::new("io_failed", format!("{e:#}"))
}

pub fn write_output(path: &Path, bytes: &[u8]) -> Result<(), DataError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            DataError::new("io_failed", e.to_string())
                .with_details(json!({ "path": parent.to_string_lossy() }))
        })?;
    }
    std::fs::write(path, bytes).map_err(|e| {
        DataError::new("io_failed", e.to_string()).with_details(json!({ "path": path.to_string_lossy() }))
    })
}
