use crate::data::participants::rank_participants;
use crate::model::{Participant, Student};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Quotes a cell only when it would otherwise break the row.
pub fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn csv_quote_always(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub const STUDENTS_REPORT_HEADER: &str =
    "PIN Number,Name,Branch,Year,Section,Events Participated";

pub const ACTIVITY_PARTICIPANTS_HEADER: &str =
    "S.No,Name,Roll No,Department,Award/Participation,College,Type";

/// One row per student with the number of participations linked to their PIN.
pub fn students_report_csv(students: &[Student], participants: &[Participant]) -> String {
    let mut events: HashMap<&str, usize> = HashMap::new();
    for p in participants {
        if let Some(pin) = p.student_pin.as_deref() {
            *events.entry(pin).or_insert(0) += 1;
        }
    }

    let mut lines = Vec::with_capacity(students.len() + 1);
    lines.push(STUDENTS_REPORT_HEADER.to_string());
    for s in students {
        let count = events.get(s.pin.as_str()).copied().unwrap_or(0).to_string();
        let cells = [
            s.pin.as_str(),
            s.name.as_str(),
            s.branch.as_str(),
            s.year.as_str(),
            s.section.as_str(),
            count.as_str(),
        ];
        lines.push(
            cells
                .iter()
                .map(|c| csv_quote_always(c))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

pub fn students_report_file_name(today: NaiveDate) -> String {
    format!("student_report_{}.csv", today.format("%Y-%m-%d"))
}

/// Winners first; `Type` separates podium places from everyone else.
pub fn activity_participants_csv(participants: &[Participant]) -> String {
    let mut ranked = participants.to_vec();
    rank_participants(&mut ranked);

    let mut lines = Vec::with_capacity(ranked.len() + 1);
    lines.push(ACTIVITY_PARTICIPANTS_HEADER.to_string());
    for (i, p) in ranked.iter().enumerate() {
        let kind = if p.award.is_podium() {
            "Winner"
        } else {
            p.award.as_str()
        };
        let cells = [
            (i + 1).to_string(),
            csv_quote(&p.name),
            csv_quote(&p.roll_number),
            csv_quote(&p.department),
            csv_quote(p.award.as_str()),
            csv_quote(&p.college),
            csv_quote(kind),
        ];
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

/// Path separators in the activity name would escape the output directory.
pub fn activity_participants_file_name(activity_name: &str) -> String {
    let safe: String = activity_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let safe = if safe.is_empty() { "activity".to_string() } else { safe };
    format!("{}-participants.csv", safe)
}
