use crate::data::performance::student_performance;
use crate::data::students::{
    bulk_create_students, create_student, delete_student, get_student_by_pin, list_students,
    set_extra_marks, update_student,
};
use crate::data::DataError;
use crate::ipc::error::reply;
use crate::ipc::helpers::{
    db_conn, parse_param, require_admin, required_i64, required_str, HandlerResult,
};
use crate::ipc::types::{AppState, Request};
use crate::model::StudentInput;
use serde_json::json;

fn handle_list(state: &mut AppState, _req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    Ok(json!({ "students": list_students(conn)? }))
}

fn handle_get_by_pin(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let pin = required_str(&req.params, "pin")?;
    Ok(json!({ "student": get_student_by_pin(conn, &pin)? }))
}

fn handle_create(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    let input: StudentInput = parse_param(&req.params, "student")?;
    Ok(json!({ "student": create_student(conn, &input)? }))
}

fn handle_bulk_create(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    let inputs: Vec<StudentInput> = parse_param(&req.params, "students")?;
    let created = bulk_create_students(conn, &inputs)?;
    tracing::info!(created, "students bulk created");
    Ok(json!({ "created": created }))
}

fn handle_update(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    let input: StudentInput = parse_param(&req.params, "student")?;
    let id = input
        .id
        .ok_or_else(|| DataError::bad_params("missing student.id"))?;
    Ok(json!({ "student": update_student(conn, id, &input)? }))
}

fn handle_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    delete_student(conn, required_i64(&req.params, "id")?)?;
    Ok(json!({ "deleted": true }))
}

fn handle_set_extra_marks(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    let pin = required_str(&req.params, "pin")?;
    let marks = required_i64(&req.params, "extraMarks")?;
    Ok(json!({ "student": set_extra_marks(conn, &pin, marks)? }))
}

fn handle_performance(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let pin = required_str(&req.params, "pin")?;
    let perf = student_performance(conn, &pin)?;
    serde_json::to_value(perf).map_err(|e| DataError::new("db_query_failed", e.to_string()))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "students.list" => handle_list(state, req),
        "students.getByPin" => handle_get_by_pin(state, req),
        "students.create" => handle_create(state, req),
        "students.bulkCreate" => handle_bulk_create(state, req),
        "students.update" => handle_update(state, req),
        "students.delete" => handle_delete(state, req),
        "students.setExtraMarks" => handle_set_extra_marks(state, req),
        "performance.get" => handle_performance(state, req),
        _ => return None,
    };
    Some(reply(&req.id, result))
}
