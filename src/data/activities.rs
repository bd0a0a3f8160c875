use super::{require_date, require_non_empty, DataError, DataResult};
use crate::model::{
    activity_from_row, now_timestamp, Activity, ActivityInput, ActivityStatus, ACTIVITY_COLUMNS,
};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;

/// Upcoming activities soonest first, followed by completed ones most recent first.
pub fn list_activities(
    conn: &Connection,
    status: Option<ActivityStatus>,
) -> DataResult<Vec<Activity>> {
    let mut out = Vec::new();
    for (s, order) in [
        (ActivityStatus::Upcoming, "ASC"),
        (ActivityStatus::Completed, "DESC"),
    ] {
        if status.is_some_and(|wanted| wanted != s) {
            continue;
        }
        let sql = format!(
            "SELECT {} FROM activities WHERE status = ? ORDER BY activity_date {}, id {}",
            ACTIVITY_COLUMNS, order, order
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([s], activity_from_row)
            .and_then(|it| it.collect::<Result<Vec<_>, _>>())?;
        out.extend(rows);
    }
    Ok(out)
}

pub fn find_activity(conn: &Connection, id: i64) -> DataResult<Option<Activity>> {
    let sql = format!("SELECT {} FROM activities WHERE id = ?", ACTIVITY_COLUMNS);
    Ok(conn.query_row(&sql, [id], activity_from_row).optional()?)
}

pub fn get_activity(conn: &Connection, id: i64) -> DataResult<Activity> {
    find_activity(conn, id)?.ok_or_else(|| DataError::not_found("activity"))
}

fn validate(input: &ActivityInput) -> DataResult<()> {
    require_non_empty("name", &input.name)?;
    require_date("date", &input.date)?;
    Ok(())
}

pub fn create_activity(conn: &Connection, input: &ActivityInput) -> DataResult<Activity> {
    validate(input)?;
    let rec = input.to_record();
    conn.execute(
        "INSERT INTO activities(title, activity_date, description, details, poster_url,
                                image_url, form_link, photos, status, created_at)
         VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            rec.title,
            rec.activity_date,
            rec.description,
            rec.details,
            rec.poster_url,
            rec.image_url,
            rec.form_link,
            rec.photos,
            rec.status,
            now_timestamp()
        ],
    )
    .map_err(|e| DataError::write_failed("db_insert_failed", "activities", e))?;
    get_activity(conn, conn.last_insert_rowid())
}

/// Status is an ordinary column, so completing an activity keeps its id and
/// every participant row that points at it.
pub fn update_activity(conn: &Connection, id: i64, input: &ActivityInput) -> DataResult<Activity> {
    validate(input)?;
    let rec = input.to_record();
    let changed = conn
        .execute(
            "UPDATE activities
             SET title = ?, activity_date = ?, description = ?, details = ?, poster_url = ?,
                 image_url = ?, form_link = ?, photos = ?, status = ?
             WHERE id = ?",
            params![
                rec.title,
                rec.activity_date,
                rec.description,
                rec.details,
                rec.poster_url,
                rec.image_url,
                rec.form_link,
                rec.photos,
                rec.status,
                id
            ],
        )
        .map_err(|e| DataError::write_failed("db_update_failed", "activities", e))?;
    if changed == 0 {
        return Err(DataError::not_found("activity"));
    }
    get_activity(conn, id)
}

pub fn participant_count(conn: &Connection, activity_id: i64) -> DataResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM participants WHERE activity_id = ?",
        [activity_id],
        |r| r.get(0),
    )?)
}

/// Returns the number of participant rows removed alongside the activity.
pub fn delete_activity(conn: &Connection, id: i64, cascade: bool) -> DataResult<usize> {
    if find_activity(conn, id)?.is_none() {
        return Err(DataError::not_found("activity"));
    }
    let participants = participant_count(conn, id)?;
    if participants > 0 && !cascade {
        return Err(DataError::new(
            "has_participants",
            "activity has participants; pass cascade to delete them too",
        )
        .with_details(json!({ "participantCount": participants })));
    }

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| DataError::new("db_tx_failed", e.to_string()))?;
    let removed = tx
        .execute("DELETE FROM participants WHERE activity_id = ?", [id])
        .map_err(|e| DataError::write_failed("db_delete_failed", "participants", e))?;
    tx.execute("DELETE FROM activities WHERE id = ?", [id])
        .map_err(|e| DataError::write_failed("db_delete_failed", "activities", e))?;
    tx.commit()
        .map_err(|e| DataError::new("db_tx_failed", e.to_string()))?;
    Ok(removed)
}

pub fn count_completed(conn: &Connection) -> DataResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM activities WHERE status = 'completed'",
        [],
        |r| r.get(0),
    )?)
}
