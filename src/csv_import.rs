//! Bulk CSV uploads: participants, student extra marks and the student roster.
//!
//! Files are positional. A header line is recognised by keyword and skipped;
//! blank lines are ignored. Rows that cannot be used become warnings carrying
//! their 1-based line number instead of failing the whole upload.

use crate::data::participants::create_participant;
use crate::data::students::{bulk_create_students, find_student_by_pin, set_extra_marks};
use crate::data::{DataError, DataResult};
use crate::model::{Award, ParticipantInput, StudentInput};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvWarning {
    pub line: usize,
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCsv<T> {
    pub rows: Vec<T>,
    pub warnings: Vec<CsvWarning>,
    pub header_skipped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantCsvRow {
    pub line: usize,
    pub activity_id: i64,
    pub roll_number: String,
    pub name: String,
    pub department: String,
    pub award: Award,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtraMarksCsvRow {
    pub line: usize,
    pub pin: String,
    pub extra_marks: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentCsvRow {
    pub line: usize,
    pub student: StudentInput,
}

/// Splits one line on commas. A field whose first non-space character is `"`
/// is quoted: it may contain commas and `""` stands for a literal quote.
/// Quotes anywhere else are plain text, so unquoted text splits on every comma.
pub fn parse_csv_record(line: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    buf.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => buf.push(ch),
            }
            continue;
        }
        match ch {
            '"' if buf.trim().is_empty() => {
                buf.clear();
                in_quotes = true;
            }
            ',' => out.push(std::mem::take(&mut buf)),
            _ => buf.push(ch),
        }
    }
    out.push(buf);
    out.into_iter().map(|f| f.trim().to_string()).collect()
}

/// Non-blank lines with their 1-based line numbers.
fn content_lines(text: &str) -> Vec<(usize, &str)> {
    text.split('\n')
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .collect()
}

fn parse_with<T, H, R>(text: &str, is_header: H, mut parse_row: R) -> ParsedCsv<T>
where
    H: Fn(&str) -> bool,
    R: FnMut(usize, Vec<String>) -> Result<T, CsvWarning>,
{
    let lines = content_lines(text);
    let header_skipped = lines
        .first()
        .map(|(_, l)| is_header(&l.to_ascii_lowercase()))
        .unwrap_or(false);

    let mut rows = Vec::new();
    let mut warnings = Vec::new();
    for (line_no, line) in lines.into_iter().skip(usize::from(header_skipped)) {
        match parse_row(line_no, parse_csv_record(line)) {
            Ok(row) => rows.push(row),
            Err(w) => warnings.push(w),
        }
    }
    ParsedCsv {
        rows,
        warnings,
        header_skipped,
    }
}

fn warning(line: usize, code: &'static str, message: impl Into<String>) -> CsvWarning {
    CsvWarning {
        line,
        code,
        message: message.into(),
    }
}

/// Columns: Activity ID, Roll Number, Name, Department, Award.
pub fn parse_participants_csv(text: &str) -> ParsedCsv<ParticipantCsvRow> {
    parse_with(
        text,
        |first| first.contains("activity"),
        |line, fields| {
            if fields.len() < 5 {
                return Err(warning(
                    line,
                    "too_few_fields",
                    format!("expected 5 fields, found {}", fields.len()),
                ));
            }
            let activity_id = fields[0].parse::<i64>().map_err(|_| {
                warning(
                    line,
                    "bad_activity_id",
                    format!("activity id is not a number: {}", fields[0]),
                )
            })?;
            if fields[1].is_empty() || fields[2].is_empty() {
                return Err(warning(
                    line,
                    "missing_field",
                    "roll number and name are required",
                ));
            }
            let award = Award::parse(&fields[4]).ok_or_else(|| {
                warning(line, "bad_award", format!("unknown award: {}", fields[4]))
            })?;
            Ok(ParticipantCsvRow {
                line,
                activity_id,
                roll_number: fields[1].clone(),
                name: fields[2].clone(),
                department: fields[3].clone(),
                award,
            })
        },
    )
}

/// Columns: PIN, Extra Marks.
pub fn parse_extra_marks_csv(text: &str) -> ParsedCsv<ExtraMarksCsvRow> {
    parse_with(
        text,
        |first| first.contains("pin") || first.contains("roll"),
        |line, fields| {
            if fields.len() < 2 {
                return Err(warning(
                    line,
                    "too_few_fields",
                    format!("expected 2 fields, found {}", fields.len()),
                ));
            }
            if fields[0].is_empty() {
                return Err(warning(line, "missing_field", "PIN is required"));
            }
            match fields[1].parse::<i64>() {
                Ok(m) if m >= 0 => Ok(ExtraMarksCsvRow {
                    line,
                    pin: fields[0].clone(),
                    extra_marks: m,
                }),
                _ => Err(warning(
                    line,
                    "bad_marks",
                    format!("extra marks must be a whole number >= 0: {}", fields[1]),
                )),
            }
        },
    )
}

/// Columns: PIN, Name, Branch, Year, Section.
pub fn parse_students_csv(text: &str) -> ParsedCsv<StudentCsvRow> {
    parse_with(
        text,
        |first| first.contains("pin"),
        |line, fields| {
            if fields.len() < 5 {
                return Err(warning(
                    line,
                    "too_few_fields",
                    format!("expected 5 fields, found {}", fields.len()),
                ));
            }
            if fields[..5].iter().any(|f| f.is_empty()) {
                return Err(warning(line, "missing_field", "every column is required"));
            }
            Ok(StudentCsvRow {
                line,
                student: StudentInput {
                    id: None,
                    pin: fields[0].clone(),
                    name: fields[1].clone(),
                    branch: fields[2].clone(),
                    year: fields[3].clone(),
                    section: fields[4].clone(),
                },
            })
        },
    )
}

/// Upload text comes inline or from a `.csv` file on disk.
pub fn load_csv_text(text: Option<&str>, path: Option<&Path>) -> DataResult<String> {
    if let Some(t) = text {
        return Ok(t.to_string());
    }
    let Some(path) = path else {
        return Err(DataError::bad_params("missing text or path"));
    };
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if !is_csv {
        return Err(DataError::bad_params("Please upload a CSV file"));
    }
    let bytes = std::fs::read(path).map_err(|e| {
        DataError::new("io_failed", e.to_string())
            .with_details(serde_json::json!({ "path": path.to_string_lossy() }))
    })?;
    let text = String::from_utf8_lossy(&bytes);
    // Spreadsheet exports often start with a byte-order mark.
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowFailure {
    pub line: usize,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantImportSummary {
    pub added: usize,
    pub linked_to_students: usize,
    pub failed: usize,
    pub failures: Vec<RowFailure>,
}

/// One row at a time; a failing row does not stop the rest.
pub fn import_participants(
    conn: &Connection,
    rows: &[ParticipantCsvRow],
    college: &str,
) -> ParticipantImportSummary {
    let mut summary = ParticipantImportSummary::default();
    for row in rows {
        let result = find_student_by_pin(conn, &row.roll_number).and_then(|student| {
            let input = ParticipantInput {
                id: None,
                activity_id: row.activity_id,
                name: row.name.clone(),
                roll_number: row.roll_number.clone(),
                department: row.department.clone(),
                college: college.to_string(),
                award: row.award,
                student_pin: student.as_ref().map(|s| s.pin.clone()),
                marks: Some(row.award.marks_floor()),
            };
            create_participant(conn, &input).map(|_| student.is_some())
        });
        match result {
            Ok(linked) => {
                summary.added += 1;
                if linked {
                    summary.linked_to_students += 1;
                }
            }
            Err(e) => {
                tracing::warn!(line = row.line, roll_number = %row.roll_number, error = %e, "participant row rejected");
                summary.failed += 1;
                summary.failures.push(RowFailure {
                    line: row.line,
                    code: e.code.to_string(),
                    message: format!("Failed to add {} ({}): {}", row.name, row.roll_number, e.message),
                });
            }
        }
    }
    summary
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraMarksImportSummary {
    pub updated: usize,
    pub failed: usize,
    pub failed_pins: Vec<String>,
}

pub fn import_extra_marks(conn: &Connection, rows: &[ExtraMarksCsvRow]) -> ExtraMarksImportSummary {
    let mut summary = ExtraMarksImportSummary::default();
    for row in rows {
        match set_extra_marks(conn, &row.pin, row.extra_marks) {
            Ok(_) => summary.updated += 1,
            Err(e) => {
                tracing::warn!(line = row.line, pin = %row.pin, error = %e, "extra marks row rejected");
                summary.failed += 1;
                summary.failed_pins.push(row.pin.clone());
            }
        }
    }
    summary
}

pub fn import_students(conn: &Connection, rows: &[StudentCsvRow]) -> DataResult<usize> {
    let students: Vec<StudentInput> = rows.iter().map(|r| r.student.clone()).collect();
    bulk_create_students(conn, &students)
}
