use crate::csv_import::{
    import_extra_marks, import_participants, import_students, load_csv_text,
    parse_extra_marks_csv, parse_participants_csv, parse_students_csv, CsvWarning, ParsedCsv,
};
use crate::data::DataError;
use crate::ipc::error::reply;
use crate::ipc::helpers::{db_conn, optional_str, require_admin, HandlerResult};
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::PathBuf;

fn csv_text(req: &Request) -> Result<String, DataError> {
    let text = req.params.get("text").and_then(|v| v.as_str());
    let path = optional_str(&req.params, "path").map(PathBuf::from);
    load_csv_text(text, path.as_deref())
}

fn require_rows<T>(parsed: &ParsedCsv<T>) -> Result<(), DataError> {
    if parsed.rows.is_empty() {
        return Err(DataError::new("bad_csv", "No valid rows found in the CSV")
            .with_details(json!({ "warnings": parsed.warnings })));
    }
    Ok(())
}

fn log_warnings(kind: &str, warnings: &[CsvWarning]) {
    for w in warnings {
        tracing::warn!(kind, line = w.line, code = w.code, "{}", w.message);
    }
}

fn handle_participants(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    let parsed = parse_participants_csv(&csv_text(req)?);
    log_warnings("participants", &parsed.warnings);
    require_rows(&parsed)?;

    let summary = import_participants(conn, &parsed.rows, &state.config.college);
    tracing::info!(
        added = summary.added,
        linked = summary.linked_to_students,
        failed = summary.failed,
        "participants imported"
    );
    Ok(json!({
        "added": summary.added,
        "linkedToStudents": summary.linked_to_students,
        "failed": summary.failed,
        "failures": summary.failures,
        "warnings": parsed.warnings,
        "headerSkipped": parsed.header_skipped,
    }))
}

fn handle_extra_marks(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    let parsed = parse_extra_marks_csv(&csv_text(req)?);
    log_warnings("extraMarks", &parsed.warnings);
    require_rows(&parsed)?;

    let summary = import_extra_marks(conn, &parsed.rows);
    tracing::info!(updated = summary.updated, failed = summary.failed, "extra marks imported");
    Ok(json!({
        "updated": summary.updated,
        "failed": summary.failed,
        "failedPins": summary.failed_pins,
        "warnings": parsed.warnings,
        "headerSkipped": parsed.header_skipped,
    }))
}

fn handle_students(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, &req.params)?;
    let conn = db_conn(state)?;
    let parsed = parse_students_csv(&csv_text(req)?);
    log_warnings("students", &parsed.warnings);
    require_rows(&parsed)?;

    let created = import_students(conn, &parsed.rows)?;
    tracing::info!(created, "students imported");
    Ok(json!({
        "created": created,
        "warnings": parsed.warnings,
        "headerSkipped": parsed.header_skipped,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "import.participantsCsv" => handle_participants(state, req),
        "import.extraMarksCsv" => handle_extra_marks(state, req),
        "import.studentsCsv" => handle_students(state, req),
        _ => return None,
    };
    Some(reply(&req.id, result))
}
