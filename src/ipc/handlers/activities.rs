use crate::data::activities::{
    create_activity, delete_activity, get_activity, list_activities, update_activity,
};
use crate::data::DataError;
use crate::ipc::error::reply;
use crate::ipc::helpers::{
    db_conn, optional_bool, optional_str, parse_param, require_admin, required_i64, HandlerResult,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{ActivityInput, ActivityStatus};
use serde_json::json;

fn handle_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let status = match optional_str(&req.params, "status") {
        Some(s) => Some(ActivityStatus::parse(&s).ok_or_else(|| {
            DataError::bad_params(format!("unknown status: {}", s))
        })?),
        None => None,
    };
    Ok(json!({ "activities": list_activities(conn, status)? }))
}

fn handle_get(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let id = required_i64(&req.params, "id")?;
    Ok(json!({ "activity": get_activity(conn, id)? }))
}

fn handle_create(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    let input: ActivityInput = parse_param(&req.params, "activity")?;
    let activity = create_activity(conn, &input)?;
    tracing::info!(id = activity.id, status = activity.status.as_str(), "activity created");
    Ok(json!({ "activity": activity }))
}

fn handle_update(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    let input: ActivityInput = parse_param(&req.params, "activity")?;
    let id = input
        .id
        .ok_or_else(|| DataError::bad_params("missing activity.id"))?;
    let activity = update_activity(conn, id, &input)?;
    tracing::info!(id, status = activity.status.as_str(), "activity updated");
    Ok(json!({ "activity": activity }))
}

fn handle_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    let id = required_i64(&req.params, "id")?;
    let cascade = optional_bool(&req.params, "cascade");
    let removed = delete_activity(conn, id, cascade)?;
    tracing::info!(id, participants_removed = removed, "activity deleted");
    Ok(json!({ "deleted": true, "participantsDeleted": removed }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "activities.list" => handle_list(state, req),
        "activities.get" => handle_get(state, req),
        "activities.create" => handle_create(state, req),
        "activities.update" => handle_update(state, req),
        "activities.delete" => handle_delete(state, req),
        _ => return None,
    };
    Some(reply(&req.id, result))
}
