use crate::backup::{export_workspace_bundle, import_workspace_bundle};
use crate::data::DataError;
use crate::ipc::error::reply;
use crate::ipc::handlers::core::open_workspace;
use crate::ipc::helpers::{
    io_failed, require_admin, required_path, workspace_path, HandlerResult,
};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_export(state: &mut AppState, req: &Request) -> HandlerResult {
    let workspace = workspace_path(state)?;
    let out = required_path(&req.params, "outPath")?;
    let summary = export_workspace_bundle(workspace, &out).map_err(io_failed)?;
    tracing::info!(out = %out.to_string_lossy(), entries = summary.entry_count, "workspace exported");
    Ok(json!({
        "bundleFormat": summary.bundle_format,
        "entryCount": summary.entry_count,
        "path": out.to_string_lossy(),
    }))
}

fn handle_import(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let workspace = workspace_path(state)?.to_path_buf();
    let in_path = required_path(&req.params, "inPath")?;
    if !in_path.is_file() {
        return Err(DataError::not_found("backup file")
            .with_details(json!({ "inPath": in_path.to_string_lossy() })));
    }

    // Release the live connection before its file is replaced.
    state.db = None;
    let imported = import_workspace_bundle(&in_path, &workspace).map_err(io_failed);
    open_workspace(state, &workspace)
        .map_err(|e| DataError::new("db_open_failed", format!("{e:#}")))?;
    let summary = imported?;

    tracing::info!(
        from = %in_path.to_string_lossy(),
        format = %summary.bundle_format_detected,
        images = summary.images_restored,
        "workspace restored"
    );
    Ok(json!({
        "bundleFormatDetected": summary.bundle_format_detected,
        "imagesRestored": summary.images_restored,
        "workspacePath": workspace.to_string_lossy(),
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "backup.exportWorkspace" => handle_export(state, req),
        "backup.importWorkspace" => handle_import(state, req),
        _ => return None,
    };
    Some(reply(&req.id, result))
}
