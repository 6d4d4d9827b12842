//! # Report Module
//!
//! Standard text layouts for engine state and operation outcomes.
//!
//! Everything here is a pure transformation from engine values to strings;
//! callers decide where the text goes.

use crate::advisor::AdvisorStore;
use crate::course::{CourseStore, RosterSnapshot};
use crate::engine::{DecisionOutcome, DropOutcome, EnrollOutcome, EnrollmentEngine, PendingView};
use crate::error::EnrollmentError;
use crate::student::StudentStore;
use crate::{CourseCode, StudentId};

// =============================================================================
// TABLES
// =============================================================================

const COURSE_HEADERS: [&str; 5] = [
    "Course Code",
    "Course Name",
    "Max Capacity",
    "Enrolled Students",
    "Student Names",
];

/// Grid table of every course with its enrolled student names.
#[must_use]
pub fn course_table(engine: &EnrollmentEngine) -> String {
    let rows: Vec<[String; 5]> = engine
        .rosters()
        .iter()
        .map(|snapshot| {
            [
                snapshot.code.to_string(),
                snapshot.name.clone(),
                snapshot.max_capacity.to_string(),
                snapshot.enrolled_count.to_string(),
                student_names(engine, snapshot),
            ]
        })
        .collect();
    grid(&COURSE_HEADERS, &rows, &[false, false, true, true, false])
}

/// Comma-separated student names for a roster, or "None".
fn student_names(engine: &EnrollmentEngine, snapshot: &RosterSnapshot) -> String {
    if snapshot.students.is_empty() {
        return String::from("None");
    }
    snapshot
        .students
        .iter()
        .map(|id| student_name(engine, id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render rows as a `+---+` bordered grid with a `=` rule under the header.
fn grid<const N: usize>(headers: &[&str; N], rows: &[[String; N]], numeric: &[bool; N]) -> String {
    let mut widths = headers.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule = |fill: char| {
        let mut line = String::from("+");
        for width in &widths {
            line.extend(std::iter::repeat_n(fill, width + 2));
            line.push('+');
        }
        line.push('\n');
        line
    };
    let line = |cells: &[String; N], align_numbers: bool| {
        let mut out = String::from("|");
        for ((cell, width), right) in cells.iter().zip(widths.iter().copied()).zip(numeric) {
            if align_numbers && *right {
                out.push_str(&format!(" {cell:>width$} |"));
            } else {
                out.push_str(&format!(" {cell:<width$} |"));
            }
        }
        out.push('\n');
        out
    };

    let mut output = rule('-');
    output.push_str(&line(&headers.map(String::from), false));
    output.push_str(&rule('='));
    for row in rows {
        output.push_str(&line(row, true));
        output.push_str(&rule('-'));
    }
    output
}

/// Course heading followed by one indented line per enrolled student.
#[must_use]
pub fn roster_listing(engine: &EnrollmentEngine, course: &CourseCode) -> Option<String> {
    let record = engine.courses().get(course)?;
    let mut output = format!("{record}\n");
    if record.roster().is_empty() {
        output.push_str("  None\n");
    }
    for id in record.roster() {
        match engine.students().get(id) {
            Some(student) => output.push_str(&format!("  {student}\n")),
            None => output.push_str(&format!("  {id}\n")),
        }
    }
    Some(output)
}

/// Numbered pending requests as presented to an advisor.
#[must_use]
pub fn pending_listing(views: &[PendingView]) -> String {
    views
        .iter()
        .map(|v| {
            format!(
                "{}. Student {} requests to enroll in {}.\n",
                v.index, v.student_name, v.course_name
            )
        })
        .collect()
}

// =============================================================================
// OUTCOME MESSAGES
// =============================================================================

/// Operator-facing text for an enroll attempt.
#[must_use]
pub fn enroll_message(
    engine: &EnrollmentEngine,
    result: &Result<EnrollOutcome, EnrollmentError>,
) -> String {
    match result {
        Ok(EnrollOutcome::Enrolled { student, course }) => format!(
            "Success! Student \"{}\" enrolled in course \"{}\".",
            student_name(engine, student),
            course_name(engine, course)
        ),
        Ok(EnrollOutcome::PendingApproval { advisor, .. }) => {
            let name = engine
                .advisors()
                .get(*advisor)
                .map(|a| a.name().to_string())
                .unwrap_or_default();
            format!("Request sent to advisor {name} for approval.")
        }
        Err(EnrollmentError::AlreadyEnrolled { student, course }) => {
            let (s, c) = (student_name(engine, student), course_name(engine, course));
            format!(
                "Student {s} is already enrolled in {c}.\n\
                 Failure! Student \"{s}\" NOT enrolled in course \"{c}\"."
            )
        }
        Err(EnrollmentError::CapacityExceededForStudent { student, limit }) => format!(
            "Student {} cannot enroll in more than {limit} courses.",
            student_name(engine, student)
        ),
        Err(EnrollmentError::CourseFull { course, .. }) => {
            format!("Course \"{}\" is full.", course_name(engine, course))
        }
        Err(EnrollmentError::NoAdvisorAssigned(student)) => {
            format!("No advisor found for {}.", student_name(engine, student))
        }
        Err(EnrollmentError::AlreadyRequested { student, course }) => format!(
            "Student {} already has a pending request for {}.",
            student_name(engine, student),
            course_name(engine, course)
        ),
        Err(other) => error_message(other),
    }
}

/// Operator-facing text for a drop attempt.
#[must_use]
pub fn drop_message(
    engine: &EnrollmentEngine,
    result: &Result<DropOutcome, EnrollmentError>,
) -> String {
    match result {
        Ok(DropOutcome { student, course }) => format!(
            "Success! Student \"{}\" dropped from course \"{}\".",
            student_name(engine, student),
            course_name(engine, course)
        ),
        Err(EnrollmentError::NotEnrolled { student, course }) => format!(
            "Failure! Student \"{}\" NOT enrolled in \"{}\".",
            student_name(engine, student),
            course_name(engine, course)
        ),
        Err(other) => error_message(other),
    }
}

/// Operator-facing text for an advisor decision.
#[must_use]
pub fn decision_message(
    engine: &EnrollmentEngine,
    result: &Result<DecisionOutcome, EnrollmentError>,
) -> String {
    match result {
        Ok(DecisionOutcome::Approved { student, course }) => format!(
            "Request approved. {} is now enrolled in {}.",
            student_name(engine, student),
            course_name(engine, course)
        ),
        Ok(DecisionOutcome::Denied { student, .. }) => {
            format!("Request denied for {}.", student_name(engine, student))
        }
        Err(EnrollmentError::CourseFullAtApproval { course, .. }) => format!(
            "Course \"{}\" is full. The request stays pending.",
            course_name(engine, course)
        ),
        Err(EnrollmentError::InvalidRequestIndex { .. }) => String::from("Invalid request number."),
        Err(EnrollmentError::AlreadyEnrolled { student, course }) => format!(
            "Student {} is already enrolled in {}. The request stays pending.",
            student_name(engine, student),
            course_name(engine, course)
        ),
        Err(EnrollmentError::CapacityExceededForStudent { student, limit }) => format!(
            "Student {} cannot enroll in more than {limit} courses. The request stays pending.",
            student_name(engine, student)
        ),
        Err(other) => error_message(other),
    }
}

fn error_message(err: &EnrollmentError) -> String {
    match err {
        EnrollmentError::StudentNotFound(name)
        | EnrollmentError::CourseNotFound(name)
        | EnrollmentError::AdvisorNotFound(name) => format!("\"{name}\" not found."),
        other => format!("Failure! {other}."),
    }
}

fn student_name(engine: &EnrollmentEngine, id: &StudentId) -> String {
    engine
        .students()
        .get(id)
        .map(|s| s.name().to_string())
        .unwrap_or_else(|| id.to_string())
}

fn course_name(engine: &EnrollmentEngine, code: &CourseCode) -> String {
    engine
        .courses()
        .get(code)
        .map(|c| c.name().to_string())
        .unwrap_or_else(|| code.to_string())
}

// =============================================================================
// TESTS
// =============================================================================
