use crate::data::winners::{
    create_winner, delete_winner, group_winners, list_winners, update_winner, winner_facets,
    GroupBy, WinnerFilter,
};
use crate::data::DataError;
use crate::ipc::error::reply;
use crate::ipc::helpers::{
    db_conn, parse_param, parse_params, require_admin, required_i64, HandlerResult,
};
use crate::ipc::types::{AppState, Request};
use crate::model::WinnerInput;
use serde_json::json;

fn handle_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let filter: WinnerFilter = parse_params(&req.params)?;
    let winners = list_winners(conn, &filter)?;
    // Facets always describe the full set so the dropdowns don't shrink.
    let facets = winner_facets(&list_winners(conn, &WinnerFilter::default())?);
    Ok(json!({ "winners": winners, "facets": facets }))
}

fn handle_grouped(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let by: GroupBy = parse_param(&req.params, "by")?;
    let filter: WinnerFilter = parse_params(&req.params)?;
    let winners = list_winners(conn, &filter)?;
    Ok(json!({ "groups": group_winners(&winners, by) }))
}

fn handle_create(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    let input: WinnerInput = parse_param(&req.params, "winner")?;
    let winner = create_winner(conn, &input)?;
    tracing::info!(id = winner.id, event = %winner.event, "winner created");
    Ok(json!({ "winner": winner }))
}

fn handle_update(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    let input: WinnerInput = parse_param(&req.params, "winner")?;
    let id = input
        .id
        .ok_or_else(|| DataError::bad_params("missing winner.id"))?;
    Ok(json!({ "winner": update_winner(conn, id, &input)? }))
}

fn handle_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    let id = required_i64(&req.params, "id")?;
    delete_winner(conn, id)?;
    Ok(json!({ "deleted": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "winners.list" => handle_list(state, req),
        "winners.grouped" => handle_grouped(state, req),
        "winners.create" => handle_create(state, req),
        "winners.update" => handle_update(state, req),
        "winners.delete" => handle_delete(state, req),
        _ => return None,
    };
    Some(reply(&req.id, result))
}
