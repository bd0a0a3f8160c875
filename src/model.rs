//! Domain objects and their mapping to and from SQLite rows.
//!
//! Rows are snake_case columns; objects serialize camelCase on the wire.
//! Null columns are filled with the defaults the web front-end expects.

use chrono::{Datelike, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

pub const WINNER_MARKS: i64 = 10;
pub const PARTICIPATION_MARKS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Award {
    #[serde(rename = "1st Place")]
    FirstPlace,
    #[serde(rename = "2nd Place")]
    SecondPlace,
    #[serde(rename = "3rd Place")]
    ThirdPlace,
    #[serde(rename = "Participation")]
    Participation,
    #[serde(rename = "Volunteer")]
    Volunteer,
}

impl Award {
    pub const ALL: [Award; 5] = [
        Award::FirstPlace,
        Award::SecondPlace,
        Award::ThirdPlace,
        Award::Participation,
        Award::Volunteer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Award::FirstPlace => "1st Place",
            Award::SecondPlace => "2nd Place",
            Award::ThirdPlace => "3rd Place",
            Award::Participation => "Participation",
            Award::Volunteer => "Volunteer",
        }
    }

    /// Accepts the wire labels, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Award> {
        let t = s.trim();
        Award::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(t))
    }

    pub fn is_podium(self) -> bool {
        matches!(
            self,
            Award::FirstPlace | Award::SecondPlace | Award::ThirdPlace
        )
    }

    /// Lowest mark a participant with this award can hold.
    pub fn marks_floor(self) -> i64 {
        if self.is_podium() {
            WINNER_MARKS
        } else {
            PARTICIPATION_MARKS
        }
    }

    /// Winners first, then participation, then volunteers.
    pub fn rank(self) -> u8 {
        match self {
            Award::FirstPlace => 1,
            Award::SecondPlace => 2,
            Award::ThirdPlace => 3,
            Award::Participation => 4,
            Award::Volunteer => 5,
        }
    }
}

impl FromSql for Award {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Award::parse(s).ok_or_else(|| FromSqlError::Other(format!("unknown award: {s}").into()))
    }
}

impl ToSql for Award {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    #[default]
    Upcoming,
    Completed,
}

impl ActivityStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityStatus::Upcoming => "upcoming",
            ActivityStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<ActivityStatus> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Some(ActivityStatus::Upcoming),
            "completed" | "previous" => Some(ActivityStatus::Completed),
            _ => None,
        }
    }
}

impl FromSql for ActivityStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        ActivityStatus::parse(s)
            .ok_or_else(|| FromSqlError::Other(format!("unknown activity status: {s}").into()))
    }
}

impl ToSql for ActivityStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn current_year() -> i64 {
    i64::from(Utc::now().year())
}

/// Dates are either `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn is_valid_date(s: &str) -> bool {
    let t = s.trim();
    NaiveDate::parse_from_str(t, "%Y-%m-%d").is_ok()
        || chrono::DateTime::parse_from_rfc3339(t).is_ok()
}

pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339()
}

// --- Winners ---

pub const WINNER_COLUMNS: &str = "id, name, roll_number, event, date, photo_url, year, \
     is_week_winner, position, activity_type, week_number, created_at";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Winner {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
    pub event: String,
    pub date: String,
    pub photo: String,
    pub year: String,
    pub is_this_week_winner: bool,
    pub position: i64,
    pub activity_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

pub fn winner_from_row(row: &Row<'_>) -> rusqlite::Result<Winner> {
    let year: Option<i64> = row.get(6)?;
    Ok(Winner {
        id: row.get(0)?,
        name: non_empty(row.get(1)?).unwrap_or_else(|| "Unknown Name".to_string()),
        roll_number: non_empty(row.get(2)?),
        event: non_empty(row.get(3)?).unwrap_or_else(|| "Unknown Event".to_string()),
        date: non_empty(row.get(4)?).unwrap_or_else(now_timestamp),
        photo: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        year: year.unwrap_or_else(current_year).to_string(),
        is_this_week_winner: row.get::<_, Option<bool>>(7)?.unwrap_or(false),
        position: row
            .get::<_, Option<i64>>(8)?
            .filter(|p| *p > 0)
            .unwrap_or(1),
        activity_type: non_empty(row.get(9)?).unwrap_or_else(|| "General".to_string()),
        week_number: row.get::<_, Option<i64>>(10)?.filter(|w| *w > 0),
        created_at: row.get(11)?,
    })
}

/// Year arrives as a string from forms and as a number from scripts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum YearValue {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerInput {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub roll_number: Option<String>,
    pub event: String,
    pub date: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub year: Option<YearValue>,
    #[serde(default)]
    pub is_this_week_winner: Option<bool>,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub week_number: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WinnerRecord {
    pub name: String,
    pub roll_number: String,
    pub event: String,
    pub date: String,
    pub photo_url: String,
    pub year: i64,
    pub is_week_winner: bool,
    pub position: i64,
    pub activity_type: String,
    pub week_number: Option<i64>,
}

impl WinnerInput {
    pub fn to_record(&self) -> WinnerRecord {
        let year = match &self.year {
            Some(YearValue::Number(n)) => Some(*n),
            Some(YearValue::Text(s)) => s.trim().parse::<i64>().ok(),
            None => None,
        };
        WinnerRecord {
            name: self.name.trim().to_string(),
            roll_number: self
                .roll_number
                .as_deref()
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
            event: self.event.trim().to_string(),
            date: self.date.trim().to_string(),
            photo_url: self.photo.clone().unwrap_or_default(),
            year: year.unwrap_or_else(current_year),
            is_week_winner: self.is_this_week_winner.unwrap_or(false),
            position: self.position.filter(|p| *p > 0).unwrap_or(1),
            activity_type: non_empty(self.activity_type.clone())
                .unwrap_or_else(|| "General".to_string()),
            week_number: self.week_number.filter(|w| *w > 0),
        }
    }
}

// --- Activities ---

pub const ACTIVITY_COLUMNS: &str = "id, title, activity_date, description, details, poster_url, \
     image_url, form_link, photos, status, created_at";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,
    pub name: String,
    pub date: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub photos: Vec<String>,
    pub status: ActivityStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

fn parse_photos(raw: Option<String>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str::<Vec<String>>(&s).ok())
        .unwrap_or_default()
}

pub fn activity_from_row(row: &Row<'_>) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: row.get(0)?,
        name: row.get(1)?,
        date: row.get(2)?,
        description: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        details: non_empty(row.get(4)?),
        poster: non_empty(row.get(5)?),
        image: non_empty(row.get(6)?),
        form_link: non_empty(row.get(7)?),
        photos: parse_photos(row.get(8)?),
        status: row.get(9)?,
        created_at: row.get(10)?,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityInput {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub date: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub photos: Option<Vec<String>>,
    #[serde(default)]
    pub status: ActivityStatus,
    #[serde(default)]
    pub form_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    pub title: String,
    pub activity_date: String,
    pub description: Option<String>,
    pub details: Option<String>,
    pub poster_url: Option<String>,
    pub image_url: Option<String>,
    pub form_link: Option<String>,
    pub photos: Option<String>,
    pub status: ActivityStatus,
}

impl ActivityInput {
    pub fn to_record(&self) -> ActivityRecord {
        let photos = self
            .photos
            .as_ref()
            .map(|p| {
                p.iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|p| !p.is_empty())
            .and_then(|p| serde_json::to_string(&p).ok());
        ActivityRecord {
            title: self.name.trim().to_string(),
            activity_date: self.date.trim().to_string(),
            description: non_empty(self.description.clone()),
            details: non_empty(self.details.clone()),
            poster_url: non_empty(self.poster.clone()),
            image_url: non_empty(self.image.clone()),
            form_link: non_empty(self.form_link.clone()),
            photos,
            status: self.status,
        }
    }
}

// --- Gallery ---

pub const GALLERY_COLUMNS: &str = "id, image_url, title, uploaded_at";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: i64,
    pub url: String,
    pub caption: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
}

pub fn gallery_from_row(row: &Row<'_>) -> rusqlite::Result<GalleryImage> {
    Ok(GalleryImage {
        id: row.get(0)?,
        url: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        caption: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        uploaded_at: row.get(3)?,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImageInput {
    #[serde(default)]
    pub id: Option<i64>,
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
}

impl GalleryImageInput {
    /// `(image_url, title)`
    pub fn to_record(&self) -> (String, Option<String>) {
        (self.url.trim().to_string(), non_empty(self.caption.clone()))
    }
}

// --- Participants ---

pub const PARTICIPANT_COLUMNS: &str = "id, activity_id, name, roll_number, department, college, \
     award, student_pin, marks, created_at";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: i64,
    pub activity_id: i64,
    pub name: String,
    pub roll_number: String,
    pub department: String,
    pub college: String,
    pub award: Award,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_pin: Option<String>,
    pub marks: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Stored marks never read back below the award's floor.
pub fn effective_marks(stored: Option<i64>, award: Award) -> i64 {
    let floor = award.marks_floor();
    match stored {
        Some(m) => m.max(floor),
        None => floor,
    }
}

pub fn participant_from_row(row: &Row<'_>) -> rusqlite::Result<Participant> {
    let award: Award = row.get(6)?;
    Ok(Participant {
        id: row.get(0)?,
        activity_id: row.get(1)?,
        name: row.get(2)?,
        roll_number: row.get(3)?,
        department: row.get(4)?,
        college: row.get(5)?,
        award,
        student_pin: non_empty(row.get(7)?),
        marks: effective_marks(row.get(8)?, award),
        created_at: row.get(9)?,
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInput {
    #[serde(default)]
    pub id: Option<i64>,
    pub activity_id: i64,
    pub name: String,
    pub roll_number: String,
    pub department: String,
    pub college: String,
    pub award: Award,
    #[serde(default)]
    pub student_pin: Option<String>,
    #[serde(default)]
    pub marks: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantRecord {
    pub activity_id: i64,
    pub name: String,
    pub roll_number: String,
    pub department: String,
    pub college: String,
    pub award: Award,
    pub student_pin: Option<String>,
    pub marks: i64,
}

impl ParticipantInput {
    pub fn to_record(&self) -> ParticipantRecord {
        // Zero means "not entered" on the admin form.
        let marks = self
            .marks
            .filter(|m| *m != 0)
            .unwrap_or_else(|| self.award.marks_floor());
        ParticipantRecord {
            activity_id: self.activity_id,
            name: self.name.trim().to_string(),
            roll_number: self.roll_number.trim().to_string(),
            department: self.department.trim().to_string(),
            college: self.college.trim().to_string(),
            award: self.award,
            student_pin: non_empty(self.student_pin.clone()),
            marks,
        }
    }
}

// --- Students ---

pub const STUDENT_COLUMNS: &str = "id, pin, name, branch, year, section, extra_marks, created_at";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub pin: String,
    pub name: String,
    pub branch: String,
    pub year: String,
    pub section: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_marks: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

pub fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        pin: row.get(1)?,
        name: row.get(2)?,
        branch: row.get(3)?,
        year: row.get(4)?,
        section: row.get(5)?,
        extra_marks: row.get(6)?,
        created_at: row.get(7)?,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInput {
    #[serde(default)]
    pub id: Option<i64>,
    pub pin: String,
    pub name: String,
    pub branch: String,
    pub year: String,
    pub section: String,
}

impl StudentInput {
    pub fn trimmed(&self) -> StudentInput {
        StudentInput {
            id: self.id,
            pin: self.pin.trim().to_string(),
            name: self.name.trim().to_string(),
            branch: self.branch.trim().to_string(),
            year: self.year.trim().to_string(),
            section: self.section.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::memory_db;

    #[test]
    fn award_floor_and_rank() {
        assert_eq!(Award::FirstPlace.marks_floor(), 10);
        assert_eq!(Award::ThirdPlace.marks_floor(), 10);
        assert_eq!(Award::Participation.marks_floor(), 5);
        assert_eq!(Award::Volunteer.marks_floor(), 5);
        assert!(Award::SecondPlace.rank() < Award::Participation.rank());
        assert_eq!(Award::parse(" 1st place "), Some(Award::FirstPlace));
        assert_eq!(Award::parse("Gold"), None);
    }

    #[test]
    fn award_serializes_with_wire_labels() {
        let v = serde_json::to_value(Award::SecondPlace).expect("serialize");
        assert_eq!(v, serde_json::json!("2nd Place"));
        let a: Award = serde_json::from_value(serde_json::json!("Volunteer")).expect("parse");
        assert_eq!(a, Award::Volunteer);
    }

    #[test]
    fn effective_marks_never_below_floor() {
        assert_eq!(effective_marks(None, Award::Participation), 5);
        assert_eq!(effective_marks(None, Award::FirstPlace), 10);
        assert_eq!(effective_marks(Some(3), Award::Volunteer), 5);
        assert_eq!(effective_marks(Some(7), Award::SecondPlace), 10);
        assert_eq!(effective_marks(Some(12), Award::Participation), 12);
    }

    #[test]
    fn participant_input_defaults_marks_from_award() {
        let mut input = ParticipantInput {
            id: None,
            activity_id: 1,
            name: " Jane ".into(),
            roll_number: "21A51A0502".into(),
            department: "IT".into(),
            college: "Aditya University".into(),
            award: Award::Participation,
            student_pin: Some("   ".into()),
            marks: None,
        };
        let rec = input.to_record();
        assert_eq!(rec.marks, 5);
        assert_eq!(rec.name, "Jane");
        assert_eq!(rec.student_pin, None);

        input.award = Award::FirstPlace;
        input.marks = Some(0);
        assert_eq!(input.to_record().marks, 10);

        input.marks = Some(8);
        assert_eq!(input.to_record().marks, 8);
    }

    #[test]
    fn winner_record_parses_year_and_fills_defaults() {
        let input: WinnerInput = serde_json::from_value(serde_json::json!({
            "name": "John",
            "event": "Quiz",
            "date": "2025-02-01",
            "year": "2024",
            "position": 0
        }))
        .expect("winner input");
        let rec = input.to_record();
        assert_eq!(rec.year, 2024);
        assert_eq!(rec.roll_number, "");
        assert_eq!(rec.position, 1);
        assert_eq!(rec.activity_type, "General");
        assert!(!rec.is_week_winner);

        let numeric: WinnerInput = serde_json::from_value(serde_json::json!({
            "name": "John",
            "event": "Quiz",
            "date": "2025-02-01",
            "year": 2023
        }))
        .expect("winner input");
        assert_eq!(numeric.to_record().year, 2023);

        let garbage: WinnerInput = serde_json::from_value(serde_json::json!({
            "name": "John",
            "event": "Quiz",
            "date": "2025-02-01",
            "year": "twenty"
        }))
        .expect("winner input");
        assert_eq!(garbage.to_record().year, current_year());
    }

    #[test]
    fn winner_row_nulls_map_to_defaults() {
        let conn = memory_db();
        conn.execute(
            "INSERT INTO winners(name, roll_number, event, date) VALUES('', '', 'Hackathon', '2025-03-01')",
            [],
        )
        .expect("insert winner");
        let sql = format!("SELECT {} FROM winners", WINNER_COLUMNS);
        let w = conn
            .query_row(&sql, [], winner_from_row)
            .expect("read winner");
        assert_eq!(w.name, "Unknown Name");
        assert_eq!(w.roll_number, None);
        assert_eq!(w.event, "Hackathon");
        assert_eq!(w.photo, "");
        assert_eq!(w.year, current_year().to_string());
        assert!(!w.is_this_week_winner);
        assert_eq!(w.position, 1);
        assert_eq!(w.activity_type, "General");
        assert_eq!(w.week_number, None);
    }

    #[test]
    fn activity_row_maps_photos_and_optionals() {
        let conn = memory_db();
        let input = ActivityInput {
            name: "Code Sprint".into(),
            date: "2025-04-10".into(),
            details: Some("".into()),
            photos: Some(vec!["a.jpg".into(), " ".into(), "b.jpg".into()]),
            status: ActivityStatus::Completed,
            ..Default::default()
        };
        let rec = input.to_record();
        assert_eq!(rec.details, None);
        conn.execute(
            "INSERT INTO activities(title, activity_date, description, details, poster_url, image_url, form_link, photos, status)
             VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                rec.title,
                rec.activity_date,
                rec.description,
                rec.details,
                rec.poster_url,
                rec.image_url,
                rec.form_link,
                rec.photos,
                rec.status
            ],
        )
        .expect("insert activity");

        let sql = format!("SELECT {} FROM activities", ACTIVITY_COLUMNS);
        let a = conn
            .query_row(&sql, [], activity_from_row)
            .expect("read activity");
        assert_eq!(a.name, "Code Sprint");
        assert_eq!(a.description, "");
        assert_eq!(a.details, None);
        assert_eq!(a.photos, vec!["a.jpg".to_string(), "b.jpg".to_string()]);
        assert_eq!(a.status, ActivityStatus::Completed);

        let json = serde_json::to_value(&a).expect("serialize");
        assert_eq!(json["status"], "completed");
        assert!(json.get("formLink").is_none());
    }

    #[test]
    fn participant_row_applies_marks_floor() {
        let conn = memory_db();
        conn.execute(
            "INSERT INTO activities(title, activity_date, status) VALUES('Quiz', '2025-01-01', 'completed')",
            [],
        )
        .expect("activity");
        conn.execute(
            "INSERT INTO participants(activity_id, name, roll_number, department, college, award, marks)
             VALUES(1, 'A', 'R1', 'CSE', 'AU', '1st Place', NULL),
                   (1, 'B', 'R2', 'CSE', 'AU', 'Volunteer', 2)",
            [],
        )
        .expect("participants");
        let sql = format!("SELECT {} FROM participants ORDER BY id", PARTICIPANT_COLUMNS);
        let mut stmt = conn.prepare(&sql).expect("prepare");
        let rows = stmt
            .query_map([], participant_from_row)
            .and_then(|it| it.collect::<Result<Vec<_>, _>>())
            .expect("read participants");
        assert_eq!(rows[0].marks, 10);
        assert_eq!(rows[1].marks, 5);
        assert_eq!(rows[0].award, Award::FirstPlace);

        let json = serde_json::to_value(&rows[0]).expect("serialize");
        assert_eq!(json["rollNumber"], "R1");
        assert_eq!(json["activityId"], 1);
        assert_eq!(json["award"], "1st Place");
    }

    #[test]
    fn date_validation_accepts_plain_and_rfc3339() {
        assert!(is_valid_date("2025-01-31"));
        assert!(is_valid_date("2025-01-31T10:00:00Z"));
        assert!(!is_valid_date("31/01/2025"));
        assert!(!is_valid_date(""));
    }
}
