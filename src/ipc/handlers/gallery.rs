use crate::data::gallery::{
    create_gallery_image, delete_gallery_image, list_gallery, update_gallery_image,
};
use crate::data::DataError;
use crate::ipc::error::reply;
use crate::ipc::helpers::{db_conn, parse_param, require_admin, required_i64, HandlerResult};
use crate::ipc::types::{AppState, Request};
use crate::model::GalleryImageInput;
use serde_json::json;

fn handle_list(state: &mut AppState, _req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    Ok(json!({ "images": list_gallery(conn)? }))
}

fn handle_create(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    let input: GalleryImageInput = parse_param(&req.params, "image")?;
    Ok(json!({ "image": create_gallery_image(conn, &input)? }))
}

fn handle_update(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    let input: GalleryImageInput = parse_param(&req.params, "image")?;
    let id = input
        .id
        .ok_or_else(|| DataError::bad_params("missing image.id"))?;
    Ok(json!({ "image": update_gallery_image(conn, id, &input)? }))
}

fn handle_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    delete_gallery_image(conn, required_i64(&req.params, "id")?)?;
    Ok(json!({ "deleted": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "gallery.list" => handle_list(state, req),
        "gallery.create" => handle_create(state, req),
        "gallery.update" => handle_update(state, req),
        "gallery.delete" => handle_delete(state, req),
        _ => return None,
    };
    Some(reply(&req.id, result))
}
