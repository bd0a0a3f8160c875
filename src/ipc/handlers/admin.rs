use crate::auth::verify_credentials;
use crate::data::DataError;
use crate::ipc::error::reply;
use crate::ipc::helpers::{optional_str, required_str, HandlerResult};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_login(state: &mut AppState, req: &Request) -> HandlerResult {
    if !state.config.admin_enabled() {
        return Err(DataError::new(
            "admin_disabled",
            "admin credentials are not configured",
        ));
    }
    let username = required_str(&req.params, "username")?;
    // Passwords are taken verbatim.
    let password = req
        .params
        .get("password")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DataError::bad_params("missing password"))?;
    if !verify_credentials(&state.config, &username, password) {
        tracing::warn!(username = %username, "admin login rejected");
        return Err(DataError::new("unauthorized", "invalid username or password"));
    }
    let token = state.sessions.issue();
    tracing::info!(username = %username, "admin logged in");
    Ok(json!({ "token": token }))
}

fn handle_logout(state: &mut AppState, req: &Request) -> HandlerResult {
    let token = required_str(&req.params, "adminToken")?;
    Ok(json!({ "loggedOut": state.sessions.revoke(&token) }))
}

fn handle_status(state: &mut AppState, req: &Request) -> HandlerResult {
    let enabled = state.config.admin_enabled();
    let authenticated = !enabled
        || optional_str(&req.params, "adminToken")
            .map(|t| state.sessions.check(&t))
            .unwrap_or(false);
    Ok(json!({
        "adminEnabled": enabled,
        "authenticated": authenticated,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "admin.login" => handle_login(state, req),
        "admin.logout" => handle_logout(state, req),
        "admin.status" => handle_status(state, req),
        _ => return None,
    };
    Some(reply(&req.id, result))
}
