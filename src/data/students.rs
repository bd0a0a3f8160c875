use super::{require_non_empty, DataError, DataResult};
use crate::model::{now_timestamp, student_from_row, Student, StudentInput, STUDENT_COLUMNS};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;

pub fn list_students(conn: &Connection) -> DataResult<Vec<Student>> {
    let sql = format!(
        "SELECT {} FROM students ORDER BY name COLLATE NOCASE, id",
        STUDENT_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], student_from_row)
        .and_then(|it| it.collect::<Result<Vec<_>, _>>())?;
    Ok(rows)
}

/// PIN lookups ignore case and surrounding whitespace.
pub fn find_student_by_pin(conn: &Connection, pin: &str) -> DataResult<Option<Student>> {
    let pin = pin.trim();
    if pin.is_empty() {
        return Ok(None);
    }
    let sql = format!(
        "SELECT {} FROM students WHERE pin = ? COLLATE NOCASE",
        STUDENT_COLUMNS
    );
    Ok(conn.query_row(&sql, [pin], student_from_row).optional()?)
}

pub fn get_student_by_pin(conn: &Connection, pin: &str) -> DataResult<Student> {
    find_student_by_pin(conn, pin)?.ok_or_else(|| DataError::not_found("student"))
}

pub fn get_student(conn: &Connection, id: i64) -> DataResult<Student> {
    let sql = format!("SELECT {} FROM students WHERE id = ?", STUDENT_COLUMNS);
    conn.query_row(&sql, [id], student_from_row)
        .optional()?
        .ok_or_else(|| DataError::not_found("student"))
}

fn validate(input: &StudentInput) -> DataResult<()> {
    require_non_empty("pin", &input.pin)?;
    require_non_empty("name", &input.name)?;
    require_non_empty("branch", &input.branch)?;
    require_non_empty("year", &input.year)?;
    require_non_empty("section", &input.section)?;
    Ok(())
}

fn insert_student(conn: &Connection, s: &StudentInput) -> DataResult<i64> {
    conn.execute(
        "INSERT INTO students(pin, name, branch, year, section, created_at)
         VALUES(?, ?, ?, ?, ?, ?)",
        params![s.pin, s.name, s.branch, s.year, s.section, now_timestamp()],
    )
    .map_err(|e| {
        DataError::write_failed("db_insert_failed", "students", e)
            .with_details(json!({ "table": "students", "pin": s.pin }))
    })?;
    Ok(conn.last_insert_rowid())
}

pub fn create_student(conn: &Connection, input: &StudentInput) -> DataResult<Student> {
    let s = input.trimmed();
    validate(&s)?;
    let id = insert_student(conn, &s)?;
    get_student(conn, id)
}

/// All rows go in or none do.
pub fn bulk_create_students(conn: &Connection, inputs: &[StudentInput]) -> DataResult<usize> {
    if inputs.is_empty() {
        return Err(DataError::bad_params("no students to add"));
    }
    let trimmed: Vec<StudentInput> = inputs.iter().map(StudentInput::trimmed).collect();
    for (i, s) in trimmed.iter().enumerate() {
        validate(s).map_err(|e| e.with_details(json!({ "index": i, "pin": s.pin })))?;
    }

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| DataError::new("db_tx_failed", e.to_string()))?;
    for s in &trimmed {
        // Dropping `tx` on the error path rolls everything back.
        insert_student(&tx, s)?;
    }
    tx.commit()
        .map_err(|e| DataError::new("db_tx_failed", e.to_string()))?;
    Ok(trimmed.len())
}

pub fn update_student(conn: &Connection, id: i64, input: &StudentInput) -> DataResult<Student> {
    let s = input.trimmed();
    validate(&s)?;
    let changed = conn
        .execute(
            "UPDATE students SET pin = ?, name = ?, branch = ?, year = ?, section = ? WHERE id = ?",
            params![s.pin, s.name, s.branch, s.year, s.section, id],
        )
        .map_err(|e| DataError::write_failed("db_update_failed", "students", e))?;
    if changed == 0 {
        return Err(DataError::not_found("student"));
    }
    get_student(conn, id)
}

pub fn delete_student(conn: &Connection, id: i64) -> DataResult<()> {
    let changed = conn
        .execute("DELETE FROM students WHERE id = ?", [id])
        .map_err(|e| DataError::write_failed("db_delete_failed", "students", e))?;
    if changed == 0 {
        return Err(DataError::not_found("student"));
    }
    Ok(())
}

pub fn set_extra_marks(conn: &Connection, pin: &str, extra_marks: i64) -> DataResult<Student> {
    if extra_marks < 0 {
        return Err(DataError::bad_params("extraMarks must not be negative"));
    }
    let student = get_student_by_pin(conn, pin)?;
    conn.execute(
        "UPDATE students SET extra_marks = ? WHERE id = ?",
        params![extra_marks, student.id],
    )
    .map_err(|e| DataError::write_failed("db_update_failed", "students", e))?;
    get_student(conn, student.id)
}
