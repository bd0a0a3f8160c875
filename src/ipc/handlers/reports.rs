use crate::data::activities::get_activity;
use crate::data::participants::list_participants;
use crate::data::performance::student_performance;
use crate::data::students::list_students;
use crate::data::DataError;
use crate::export::{
    activity_participants_csv, activity_participants_file_name, students_report_csv,
    students_report_file_name,
};
use crate::ipc::error::reply;
use crate::ipc::helpers::{
    db_conn, optional_str, required_i64, required_path, required_str, write_output, HandlerResult,
};
use crate::ipc::types::{AppState, Request};
use crate::pdf::render_performance_pdf;
use serde_json::json;
use std::path::PathBuf;

/// Writes to `params.outPath` when given and reports where it went.
fn maybe_write(req: &Request, contents: &str) -> Result<Option<String>, DataError> {
    let Some(out) = optional_str(&req.params, "outPath").map(PathBuf::from) else {
        return Ok(None);
    };
    write_output(&out, contents.as_bytes())?;
    Ok(Some(out.to_string_lossy().to_string()))
}

fn handle_students_csv(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let students = list_students(conn)?;
    let participants = list_participants(conn, None, None)?;
    let csv = students_report_csv(&students, &participants);
    let path = maybe_write(req, &csv)?;
    Ok(json!({
        "csv": csv,
        "fileName": students_report_file_name(chrono::Local::now().date_naive()),
        "studentCount": students.len(),
        "path": path,
    }))
}

fn handle_activity_participants_csv(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let activity = get_activity(conn, required_i64(&req.params, "activityId")?)?;
    let participants = list_participants(conn, Some(activity.id), None)?;
    let csv = activity_participants_csv(&participants);
    let path = maybe_write(req, &csv)?;
    Ok(json!({
        "csv": csv,
        "fileName": activity_participants_file_name(&activity.name),
        "rowCount": participants.len(),
        "path": path,
    }))
}

fn handle_performance_pdf(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let pin = required_str(&req.params, "pin")?;
    let out = required_path(&req.params, "outPath")?;
    let report = student_performance(conn, &pin)?;
    let bytes = render_performance_pdf(&report, chrono::Local::now().date_naive())
        .map_err(|e| DataError::new("pdf_failed", format!("{e:#}")))?;
    write_output(&out, &bytes)?;
    tracing::info!(pin = %report.student.pin, bytes = bytes.len(), "performance report written");
    Ok(json!({
        "path": out.to_string_lossy(),
        "bytes": bytes.len(),
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "reports.studentsCsv" => handle_students_csv(state, req),
        "reports.activityParticipantsCsv" => handle_activity_participants_csv(state, req),
        "reports.performancePdf" => handle_performance_pdf(state, req),
        _ => return None,
    };
    Some(reply(&req.id, result))
}
