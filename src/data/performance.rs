use super::{activities, students, DataResult};
use crate::model::{participant_from_row, Participant, Student, PARTICIPANT_COLUMNS};
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participation {
    #[serde(flatten)]
    pub participant: Participant,
    pub activity_name: String,
    pub activity_date: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPerformance {
    pub student: Student,
    pub participations: Vec<Participation>,
    pub total_marks: i64,
    pub extra_marks: i64,
    pub overall_marks: i64,
    pub total_events: i64,
    pub participation_rate: i64,
    pub standing: &'static str,
}

pub fn participation_rate(participated: usize, total_events: i64) -> i64 {
    if total_events <= 0 {
        return 0;
    }
    ((participated as f64 / total_events as f64) * 100.0).round() as i64
}

pub fn standing_for(rate: i64) -> &'static str {
    if rate >= 70 {
        "Outstanding Performance!"
    } else if rate >= 40 {
        "Keep Going!"
    } else {
        "Participate More!"
    }
}

pub fn student_performance(conn: &Connection, pin: &str) -> DataResult<StudentPerformance> {
    let student = students::get_student_by_pin(conn, pin)?;

    let columns = PARTICIPANT_COLUMNS
        .split(", ")
        .map(|c| format!("p.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT {}, a.title, a.activity_date
         FROM participants p
         LEFT JOIN activities a ON a.id = p.activity_id
         WHERE p.student_pin = ? COLLATE NOCASE
         ORDER BY p.created_at DESC, p.id DESC",
        columns
    );
    let mut stmt = conn.prepare(&sql)?;
    let participations = stmt
        .query_map([&student.pin], |row| {
            let participant = participant_from_row(row)?;
            let activity_name: Option<String> = row.get(10)?;
            let activity_date: Option<String> = row.get(11)?;
            Ok(Participation {
                participant,
                activity_name: activity_name.unwrap_or_else(|| "Unknown Activity".to_string()),
                activity_date: activity_date.unwrap_or_default(),
            })
        })
        .and_then(|it| it.collect::<Result<Vec<_>, _>>())?;

    let total_marks: i64 = participations.iter().map(|p| p.participant.marks).sum();
    let extra_marks = student.extra_marks.unwrap_or(0);
    let total_events = activities::count_completed(conn)?;
    let rate = participation_rate(participations.len(), total_events);

    Ok(StudentPerformance {
        student,
        participations,
        total_marks,
        extra_marks,
        overall_marks: total_marks + extra_marks,
        total_events,
        participation_rate: rate,
        standing: standing_for(rate),
    })
}
