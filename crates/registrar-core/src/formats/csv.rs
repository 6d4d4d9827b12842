//! CSV record parsing.
//!
//! The first row is a header and is skipped. Fields follow RFC 4180 quoting,
//! so a quoted name may contain commas. Fields are trimmed and blank lines
//! are ignored. Student and course rows have exactly three fields; advisor
//! rows are a name followed by any number of student ids.

use super::{AdvisorRecord, CourseRecord, StudentRecord};
use crate::error::FormatError;
use csv::{ReaderBuilder, StringRecord, Trim};

/// Data rows with their 1-based line numbers, header skipped.
fn rows(text: &str) -> Result<Vec<(usize, StringRecord)>, FormatError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map_or(0, |p| p.line() as usize);
        rows.push((line, record));
    }
    Ok(rows)
}

fn field<'a>(
    record: &'a StringRecord,
    pos: usize,
    line: usize,
    name: &'static str,
) -> Result<&'a str, FormatError> {
    match record.get(pos) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(FormatError::MissingField { line, field: name }),
    }
}

/// Rows with a fixed column count must not carry extra fields.
fn exact_width(record: &StringRecord, line: usize, expected: usize) -> Result<(), FormatError> {
    if record.len() > expected {
        return Err(FormatError::ExtraFields {
            line,
            expected,
            found: record.len(),
        });
    }
    Ok(())
}

pub fn parse_students_csv(text: &str) -> Result<Vec<StudentRecord>, FormatError> {
    rows(text)?
        .into_iter()
        .map(|(line, record)| -> Result<StudentRecord, FormatError> {
            exact_width(&record, line, 3)?;
            Ok(StudentRecord {
                id: field(&record, 0, line, "id")?.to_string(),
                name: field(&record, 1, line, "name")?.to_string(),
                student_type: field(&record, 2, line, "student_type")?.to_string(),
            })
        })
        .collect()
}

pub fn parse_courses_csv(text: &str) -> Result<Vec<CourseRecord>, FormatError> {
    rows(text)?
        .into_iter()
        .map(|(line, record)| -> Result<CourseRecord, FormatError> {
            exact_width(&record, line, 3)?;
            let raw = field(&record, 2, line, "max_capacity")?;
            let max_capacity = match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(FormatError::InvalidCapacity {
                        line,
                        value: raw.to_string(),
                    });
                }
            };
            Ok(CourseRecord {
                code: field(&record, 0, line, "code")?.to_string(),
                name: field(&record, 1, line, "name")?.to_string(),
                max_capacity,
            })
        })
        .collect()
}

pub fn parse_advisors_csv(text: &str) -> Result<Vec<AdvisorRecord>, FormatError> {
    rows(text)?
        .into_iter()
        .map(|(line, record)| -> Result<AdvisorRecord, FormatError> {
            Ok(AdvisorRecord {
                name: field(&record, 0, line, "name")?.to_string(),
                assigned_students: record
                    .iter()
                    .skip(1)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect(),
            })
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
