use super::{require_date, require_non_empty, DataError, DataResult};
use crate::model::{
    winner_from_row, Winner, WinnerInput, YearValue, WINNER_COLUMNS, WINNER_MARKS,
};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerFilter {
    #[serde(default, deserialize_with = "year_filter")]
    pub year: Option<String>,
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub week_number: Option<i64>,
    #[serde(default)]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub this_week_only: bool,
}

fn year_filter<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<YearValue>::deserialize(d)?.map(|y| match y {
        YearValue::Number(n) => n.to_string(),
        YearValue::Text(s) => s,
    }))
}

fn selected(v: &Option<String>) -> Option<&str> {
    // "all" is what the filter dropdowns send when nothing is picked.
    v.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
}

impl WinnerFilter {
    pub fn matches(&self, w: &Winner) -> bool {
        if let Some(year) = selected(&self.year) {
            if w.year != year {
                return false;
            }
        }
        if let Some(event) = selected(&self.event) {
            if w.event != event {
                return false;
            }
        }
        if let Some(week) = self.week_number {
            if w.week_number != Some(week) {
                return false;
            }
        }
        if let Some(kind) = selected(&self.activity_type) {
            if w.activity_type != kind {
                return false;
            }
        }
        if self.this_week_only && !w.is_this_week_winner {
            return false;
        }
        true
    }
}

/// Newest first.
pub fn list_winners(conn: &Connection, filter: &WinnerFilter) -> DataResult<Vec<Winner>> {
    let sql = format!(
        "SELECT {} FROM winners ORDER BY created_at DESC, id DESC",
        WINNER_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], winner_from_row)
        .and_then(|it| it.collect::<Result<Vec<_>, _>>())?;
    Ok(rows.into_iter().filter(|w| filter.matches(w)).collect())
}

pub fn get_winner(conn: &Connection, id: i64) -> DataResult<Winner> {
    let sql = format!("SELECT {} FROM winners WHERE id = ?", WINNER_COLUMNS);
    conn.query_row(&sql, [id], winner_from_row)
        .optional()?
        .ok_or_else(|| DataError::not_found("winner"))
}

fn validate(input: &WinnerInput) -> DataResult<()> {
    require_non_empty("name", &input.name)?;
    require_non_empty("event", &input.event)?;
    require_date("date", &input.date)?;
    Ok(())
}

/// A named winner always holds full marks on their participation rows.
fn raise_participant_marks(conn: &Connection, roll_number: &str) -> DataResult<usize> {
    if roll_number.is_empty() {
        return Ok(0);
    }
    conn.execute(
        "UPDATE participants SET marks = ? WHERE roll_number = ? COLLATE NOCASE",
        params![WINNER_MARKS, roll_number],
    )
    .map_err(|e| DataError::write_failed("db_update_failed", "participants", e))
}

pub fn create_winner(conn: &Connection, input: &WinnerInput) -> DataResult<Winner> {
    validate(input)?;
    let rec = input.to_record();
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| DataError::new("db_tx_failed", e.to_string()))?;
    tx.execute(
        "INSERT INTO winners(name, roll_number, event, date, photo_url, year, is_week_winner,
                             position, activity_type, week_number, created_at)
         VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            rec.name,
            rec.roll_number,
            rec.event,
            rec.date,
            rec.photo_url,
            rec.year,
            rec.is_week_winner,
            rec.position,
            rec.activity_type,
            rec.week_number,
            crate::model::now_timestamp()
        ],
    )
    .map_err(|e| DataError::write_failed("db_insert_failed", "winners", e))?;
    let id = tx.last_insert_rowid();
    raise_participant_marks(&tx, &rec.roll_number)?;
    tx.commit()
        .map_err(|e| DataError::new("db_tx_failed", e.to_string()))?;
    get_winner(conn, id)
}

pub fn update_winner(conn: &Connection, id: i64, input: &WinnerInput) -> DataResult<Winner> {
    validate(input)?;
    let rec = input.to_record();
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| DataError::new("db_tx_failed", e.to_string()))?;
    let changed = tx
        .execute(
            "UPDATE winners
             SET name = ?, roll_number = ?, event = ?, date = ?, photo_url = ?, year = ?,
                 is_week_winner = ?, position = ?, activity_type = ?, week_number = ?
             WHERE id = ?",
            params![
                rec.name,
                rec.roll_number,
                rec.event,
                rec.date,
                rec.photo_url,
                rec.year,
                rec.is_week_winner,
                rec.position,
                rec.activity_type,
                rec.week_number,
                id
            ],
        )
        .map_err(|e| DataError::write_failed("db_update_failed", "winners", e))?;
    if changed == 0 {
        return Err(DataError::not_found("winner"));
    }
    raise_participant_marks(&tx, &rec.roll_number)?;
    tx.commit()
        .map_err(|e| DataError::new("db_tx_failed", e.to_string()))?;
    get_winner(conn, id)
}

pub fn delete_winner(conn: &Connection, id: i64) -> DataResult<()> {
    let changed = conn
        .execute("DELETE FROM winners WHERE id = ?", [id])
        .map_err(|e| DataError::write_failed("db_delete_failed", "winners", e))?;
    if changed == 0 {
        return Err(DataError::not_found("winner"));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    Event,
    Week,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerGroup {
    pub event: Option<String>,
    pub week: Option<i64>,
    pub activity_type: Option<String>,
    pub winners: Vec<Winner>,
}

/// Event groups come back alphabetically; week groups newest week first,
/// then by activity type. Winners inside a group are ordered by position.
pub fn group_winners(winners: &[Winner], by: GroupBy) -> Vec<WinnerGroup> {
    let mut groups = match by {
        GroupBy::Event => {
            let mut by_event: BTreeMap<String, Vec<Winner>> = BTreeMap::new();
            for w in winners {
                by_event.entry(w.event.clone()).or_default().push(w.clone());
            }
            by_event
                .into_iter()
                .map(|(event, winners)| WinnerGroup {
                    event: Some(event),
                    week: None,
                    activity_type: None,
                    winners,
                })
                .collect::<Vec<_>>()
        }
        GroupBy::Week => {
            let mut by_week: BTreeMap<(std::cmp::Reverse<i64>, String), Vec<Winner>> =
                BTreeMap::new();
            // Winners without a week number are not part of any weekly group.
            for w in winners {
                let Some(week) = w.week_number else {
                    continue;
                };
                by_week
                    .entry((std::cmp::Reverse(week), w.activity_type.clone()))
                    .or_default()
                    .push(w.clone());
            }
            by_week
                .into_iter()
                .map(|((week, activity_type), winners)| WinnerGroup {
                    event: None,
                    week: Some(week.0),
                    activity_type: Some(activity_type),
                    winners,
                })
                .collect::<Vec<_>>()
        }
    };
    for g in &mut groups {
        g.winners.sort_by_key(|w| w.position);
    }
    groups
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerFacets {
    pub years: Vec<String>,
    pub events: Vec<String>,
    pub weeks: Vec<i64>,
    pub activity_types: Vec<String>,
}

pub fn winner_facets(winners: &[Winner]) -> WinnerFacets {
    let years: BTreeSet<&str> = winners.iter().map(|w| w.year.as_str()).collect();
    let events: BTreeSet<&str> = winners.iter().map(|w| w.event.as_str()).collect();
    let weeks: BTreeSet<i64> = winners.iter().filter_map(|w| w.week_number).collect();
    let kinds: BTreeSet<&str> = winners
        .iter()
        .map(|w| w.activity_type.as_str())
        .filter(|k| *k != "General")
        .collect();
    WinnerFacets {
        years: years.into_iter().rev().map(str::to_string).collect(),
        events: events.into_iter().map(str::to_string).collect(),
        weeks: weeks.into_iter().rev().collect(),
        activity_types: kinds.into_iter().map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::memory_db;
    use serde_json::json;

    fn winner(v: serde_json::Value) -> WinnerInput {
        serde_json::from_value(v).expect("winner input")
    }

    #[test]
    fn create_winner_raises_matching_participant_marks() {
        let conn = memory_db();
        conn.execute(
            "INSERT INTO activities(title, activity_date, status) VALUES('Quiz', '2025-01-01', 'completed')",
            [],
        )
        .expect("activity");
        conn.execute(
            "INSERT INTO participants(activity_id, name, roll_number, department, college, award, marks)
             VALUES(1, 'A', '21a51a0501', 'CSE', 'AU', 'Participation', 5),
                   (1, 'B', '21A51A0599', 'CSE', 'AU', 'Participation', 5)",
            [],
        )
        .expect("participants");

        let w = create_winner(
            &conn,
            &winner(json!({
                "name": "A",
                "rollNumber": "21A51A0501",
                "event": "Quiz",
                "date": "2025-01-02",
                "position": 1
            })),
        )
        .expect("create winner");
        assert_eq!(w.roll_number.as_deref(), Some("21A51A0501"));

        let mut stmt = conn
            .prepare("SELECT marks FROM participants ORDER BY id")
            .expect("prepare");
        let marks: Vec<i64> = stmt
            .query_map([], |r| r.get(0))
            .and_then(|it| it.collect::<Result<Vec<_>, _>>())
            .expect("marks");
        assert_eq!(marks, vec![10, 5]);
    }

    #[test]
    fn update_winner_raises_marks_for_new_roll_number() {
        let conn = memory_db();
        conn.execute(
            "INSERT INTO activities(title, activity_date, status) VALUES('Quiz', '2025-01-01', 'completed')",
            [],
        )
        .expect("activity");
        conn.execute(
            "INSERT INTO participants(activity_id, name, roll_number, department, college, award, marks)
             VALUES(1, 'A', '21A51A0501', 'CSE', 'AU', 'Participation', 5),
                   (1, 'B', '21a51a0599', 'CSE', 'AU', 'Volunteer', 5)",
            [],
        )
        .expect("participants");

        let w = create_winner(
            &conn,
            &winner(json!({ "name": "B", "event": "Quiz", "date": "2025-01-02", "position": 2 })),
        )
        .expect("create winner");
        let marks = |conn: &Connection| -> Vec<i64> {
            let mut stmt = conn
                .prepare("SELECT marks FROM participants ORDER BY id")
                .expect("prepare");
            let marks = stmt
                .query_map([], |r| r.get(0))
                .and_then(|it| it.collect::<Result<Vec<_>, _>>())
                .expect("marks");
            marks
        };
        assert_eq!(marks(&conn), vec![5, 5]);

        let updated = update_winner(
            &conn,
            w.id,
            &winner(json!({
                "name": "B",
                "rollNumber": "21A51A0599",
                "event": "Quiz",
                "date": "2025-01-02",
                "position": 2
            })),
        )
        .expect("update winner");
        assert_eq!(updated.roll_number.as_deref(), Some("21A51A0599"));
        assert_eq!(marks(&conn), vec![5, 10]);
    }

    #[test]
    fn update_and_delete_missing_winner_is_not_found() {
        let conn = memory_db();
        let input = winner(json!({ "name": "A", "event": "Quiz", "date": "2025-01-02" }));
        let e = update_winner(&conn, 42, &input).expect_err("missing");
        assert_eq!(e.code, "not_found");
        let e = delete_winner(&conn, 42).expect_err("missing");
        assert_eq!(e.code, "not_found");
    }

    #[test]
    fn create_winner_validates_required_fields() {
        let conn = memory_db();
        let e = create_winner(
            &conn,
            &winner(json!({ "name": " ", "event": "Quiz", "date": "2025-01-02" })),
        )
        .expect_err("empty name");
        assert_eq!(e.code, "bad_params");
        let e = create_winner(
            &conn,
            &winner(json!({ "name": "A", "event": "Quiz", "date": "yesterday" })),
        )
        .expect_err("bad date");
        assert_eq!(e.code, "bad_params");
    }

    #[test]
    fn filter_and_grouping() {
        let conn = memory_db();
        for (name, event, pos, week, kind, this_week) in [
            ("C", "Quiz", 3, Some(2), "Coding", false),
            ("A", "Quiz", 1, Some(2), "Coding", true),
            ("B", "Debate", 2, Some(1), "General", false),
            ("D", "Art", 1, None, "General", false),
        ] {
            create_winner(
                &conn,
                &winner(json!({
                    "name": name,
                    "event": event,
                    "date": "2025-01-02",
                    "year": "2025",
                    "position": pos,
                    "weekNumber": week,
                    "activityType": kind,
                    "isThisWeekWinner": this_week
                })),
            )
            .expect("create");
        }

        let all = list_winners(&conn, &WinnerFilter::default()).expect("list");
        assert_eq!(all.len(), 4);

        let quiz = list_winners(
            &conn,
            &WinnerFilter {
                event: Some("Quiz".into()),
                year: Some("all".into()),
                ..Default::default()
            },
        )
        .expect("list quiz");
        assert_eq!(quiz.len(), 2);

        let this_week = list_winners(
            &conn,
            &WinnerFilter {
                this_week_only: true,
                ..Default::default()
            },
        )
        .expect("list this week");
        assert_eq!(this_week.len(), 1);
        assert_eq!(this_week[0].name, "A");

        let by_event = group_winners(&all, GroupBy::Event);
        let events: Vec<_> = by_event
            .iter()
            .map(|g| g.event.clone().unwrap_or_default())
            .collect();
        assert_eq!(events, vec!["Art", "Debate", "Quiz"]);
        let quiz_names: Vec<_> = by_event[2].winners.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(quiz_names, vec!["A", "C"]);

        let by_week = group_winners(&all, GroupBy::Week);
        assert_eq!(by_week.len(), 2);
        assert_eq!(by_week[0].week, Some(2));
        assert_eq!(by_week[1].week, Some(1));

        let facets = winner_facets(&all);
        assert_eq!(facets.weeks, vec![2, 1]);
        assert_eq!(facets.activity_types, vec!["Coding".to_string()]);
        assert_eq!(facets.events, vec!["Art", "Debate", "Quiz"]);
    }

    #[test]
    fn filter_year_accepts_number_or_text() {
        let f: WinnerFilter = serde_json::from_value(json!({ "year": 2024, "weekNumber": 3 }))
            .expect("numeric year");
        assert_eq!(f.year.as_deref(), Some("2024"));
        assert_eq!(f.week_number, Some(3));
        let f: WinnerFilter =
            serde_json::from_value(json!({ "year": "all" })).expect("text year");
        assert_eq!(f.year.as_deref(), Some("all"));
        let f: WinnerFilter = serde_json::from_value(json!({})).expect("empty");
        assert_eq!(f.year, None);
        assert!(!f.this_week_only);
    }
}
