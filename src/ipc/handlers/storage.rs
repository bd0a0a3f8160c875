use crate::data::DataError;
use crate::ipc::error::reply;
use crate::ipc::helpers::{
    io_failed, require_admin, required_path, required_str, workspace_path, HandlerResult,
};
use crate::ipc::types::{AppState, Request};
use crate::storage::{is_image_file, is_valid_bucket, store_image, IMAGE_EXTENSIONS};
use serde_json::json;

fn handle_upload_image(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let workspace = workspace_path(state)?;
    let bucket = required_str(&req.params, "bucket")?;
    if !is_valid_bucket(&bucket) {
        return Err(DataError::bad_params(
            "bucket may only contain a-z, 0-9, '_' and '-'",
        )
        .with_details(json!({ "bucket": bucket })));
    }
    let source = required_path(&req.params, "sourcePath")?;
    if !is_image_file(&source) {
        return Err(DataError::bad_params("unsupported image type")
            .with_details(json!({ "allowed": IMAGE_EXTENSIONS })));
    }
    if !source.is_file() {
        return Err(DataError::not_found("source file")
            .with_details(json!({ "sourcePath": source.to_string_lossy() })));
    }
    let stored = store_image(workspace, &bucket, &source).map_err(io_failed)?;
    serde_json::to_value(stored).map_err(|e| DataError::new("io_failed", e.to_string()))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "storage.uploadImage" => handle_upload_image(state, req),
        _ => return None,
    };
    Some(reply(&req.id, result))
}
