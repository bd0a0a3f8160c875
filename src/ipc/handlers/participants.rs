use crate::data::participants::{
    create_participant, delete_participant, list_participants, rank_participants,
    update_participant,
};
use crate::data::DataError;
use crate::ipc::error::reply;
use crate::ipc::helpers::{
    db_conn, optional_bool, optional_str, parse_param, require_admin, required_i64, HandlerResult,
};
use crate::ipc::types::{AppState, Request};
use crate::model::ParticipantInput;
use serde_json::json;

fn handle_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let activity_id = req.params.get("activityId").and_then(|v| v.as_i64());
    let search = optional_str(&req.params, "search");
    let mut participants = list_participants(conn, activity_id, search.as_deref())?;
    if optional_bool(&req.params, "ranked") {
        rank_participants(&mut participants);
    }
    Ok(json!({ "participants": participants }))
}

fn handle_create(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    let input: ParticipantInput = parse_param(&req.params, "participant")?;
    Ok(json!({ "participant": create_participant(conn, &input)? }))
}

fn handle_update(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    let input: ParticipantInput = parse_param(&req.params, "participant")?;
    let id = input
        .id
        .ok_or_else(|| DataError::bad_params("missing participant.id"))?;
    Ok(json!({ "participant": update_participant(conn, id, &input)? }))
}

fn handle_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    delete_participant(conn, required_i64(&req.params, "id")?)?;
    Ok(json!({ "deleted": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "participants.list" => handle_list(state, req),
        "participants.create" => handle_create(state, req),
        "participants.update" => handle_update(state, req),
        "participants.delete" => handle_delete(state, req),
        _ => return None,
    };
    Some(reply(&req.id, result))
}
