use super::{activities, require_non_empty, DataError, DataResult};
use crate::model::{
    now_timestamp, participant_from_row, Participant, ParticipantInput, PARTICIPANT_COLUMNS,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

/// Newest first. `search` matches name or roll number, case-insensitively.
pub fn list_participants(
    conn: &Connection,
    activity_id: Option<i64>,
    search: Option<&str>,
) -> DataResult<Vec<Participant>> {
    let mut sql = format!("SELECT {} FROM participants", PARTICIPANT_COLUMNS);
    let mut clauses: Vec<&str> = Vec::new();
    let mut bind: Vec<Value> = Vec::new();
    if let Some(id) = activity_id {
        clauses.push("activity_id = ?");
        bind.push(Value::Integer(id));
    }
    if let Some(q) = search.map(str::trim).filter(|q| !q.is_empty()) {
        clauses.push("(instr(lower(name), lower(?)) > 0 OR instr(lower(roll_number), lower(?)) > 0)");
        bind.push(Value::Text(q.to_string()));
        bind.push(Value::Text(q.to_string()));
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY created_at DESC, id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(bind), participant_from_row)
        .and_then(|it| it.collect::<Result<Vec<_>, _>>())?;
    Ok(rows)
}

/// Stable: podium places first, then participation, then volunteers.
pub fn rank_participants(participants: &mut [Participant]) {
    participants.sort_by_key(|p| p.award.rank());
}

pub fn get_participant(conn: &Connection, id: i64) -> DataResult<Participant> {
    let sql = format!("SELECT {} FROM participants WHERE id = ?", PARTICIPANT_COLUMNS);
    conn.query_row(&sql, [id], participant_from_row)
        .optional()?
        .ok_or_else(|| DataError::not_found("participant"))
}

fn validate(conn: &Connection, input: &ParticipantInput) -> DataResult<()> {
    require_non_empty("name", &input.name)?;
    require_non_empty("rollNumber", &input.roll_number)?;
    require_non_empty("department", &input.department)?;
    require_non_empty("college", &input.college)?;
    if input.marks.is_some_and(|m| m < 0) {
        return Err(DataError::bad_params("marks must not be negative"));
    }
    if activities::find_activity(conn, input.activity_id)?.is_none() {
        return Err(DataError::not_found("activity"));
    }
    Ok(())
}

pub fn create_participant(conn: &Connection, input: &ParticipantInput) -> DataResult<Participant> {
    validate(conn, input)?;
    let rec = input.to_record();
    conn.execute(
        "INSERT INTO participants(activity_id, name, roll_number, department, college, award,
                                  student_pin, marks, created_at)
         VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            rec.activity_id,
            rec.name,
            rec.roll_number,
            rec.department,
            rec.college,
            rec.award,
            rec.student_pin,
            rec.marks,
            now_timestamp()
        ],
    )
    .map_err(|e| DataError::write_failed("db_insert_failed", "participants", e))?;
    get_participant(conn, conn.last_insert_rowid())
}

pub fn update_participant(
    conn: &Connection,
    id: i64,
    input: &ParticipantInput,
) -> DataResult<Participant> {
    validate(conn, input)?;
    let rec = input.to_record();
    let changed = conn
        .execute(
            "UPDATE participants
             SET activity_id = ?, name = ?, roll_number = ?, department = ?, college = ?,
                 award = ?, student_pin = ?, marks = ?
             WHERE id = ?",
            params![
                rec.activity_id,
                rec.name,
                rec.roll_number,
                rec.department,
                rec.college,
                rec.award,
                rec.student_pin,
                rec.marks,
                id
            ],
        )
        .map_err(|e| DataError::write_failed("db_update_failed", "participants", e))?;
    if changed == 0 {
        return Err(DataError::not_found("participant"));
    }
    get_participant(conn, id)
}

pub fn delete_participant(conn: &Connection, id: i64) -> DataResult<()> {
    let changed = conn
        .execute("DELETE FROM participants WHERE id = ?", [id])
        .map_err(|e| DataError::write_failed("db_delete_failed", "participants", e))?;
    if changed == 0 {
        return Err(DataError::not_found("participant"));
    }
    Ok(())
}
