//! # Error Types
//!
//! Every failure the core can report, as typed values.
//!
//! Engine failures never leave partial state behind: when an operation
//! returns an [`EnrollmentError`], no registry has been touched.

use crate::{AdvisorId, CourseCode, StudentId};
use thiserror::Error;

/// Failure of an engine operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrollmentError {
    #[error("student not found: {0}")]
    StudentNotFound(String),

    #[error("course not found: {0}")]
    CourseNotFound(String),

    #[error("advisor not found: {0}")]
    AdvisorNotFound(String),

    #[error("student {student} is already enrolled in {course}")]
    AlreadyEnrolled {
        student: StudentId,
        course: CourseCode,
    },

    #[error("student {student} is not enrolled in {course}")]
    NotEnrolled {
        student: StudentId,
        course: CourseCode,
    },

    #[error("student {student} cannot enroll in more than {limit} courses")]
    CapacityExceededForStudent { student: StudentId, limit: usize },

    #[error("course {course} is full ({capacity} students)")]
    CourseFull { course: CourseCode, capacity: usize },

    #[error("no advisor assigned to student {0}")]
    NoAdvisorAssigned(StudentId),

    #[error("student {student} already has a pending request for {course}")]
    AlreadyRequested {
        student: StudentId,
        course: CourseCode,
    },

    #[error("request #{index} does not exist ({pending} pending)")]
    InvalidRequestIndex { index: usize, pending: usize },

    #[error("course {course} filled up before the request could be approved")]
    CourseFullAtApproval {
        advisor: AdvisorId,
        course: CourseCode,
    },

    #[error("inconsistent state: {0}")]
    InconsistentState(String),
}

impl EnrollmentError {
    /// True when the error signals an internal invariant breach rather than
    /// a user-recoverable condition.
    #[must_use]
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::InconsistentState(_))
    }
}

/// Failure while registering records at load time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate student id: {0}")]
    DuplicateStudent(StudentId),

    #[error("duplicate course code: {0}")]
    DuplicateCourse(CourseCode),

    #[error("course {0} must have a positive capacity")]
    ZeroCapacity(CourseCode),

    #[error("advisor {advisor} already has {capacity} assigned students")]
    AdvisorFull { advisor: String, capacity: usize },

    #[error("student {student} is already assigned to advisor {advisor}")]
    AlreadyAssigned { advisor: String, student: StudentId },

    #[error("unknown advisor handle {0:?}")]
    UnknownAdvisor(AdvisorId),
}

/// Failure while parsing record text.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("line {line}: missing field `{field}`")]
    MissingField { line: usize, field: &'static str },

    #[error("line {line}: invalid capacity `{value}` (expected a positive integer)")]
    InvalidCapacity { line: usize, value: String },

    #[error("line {line}: expected {expected} fields, found {found}")]
    ExtraFields {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("`{0}` must be at least 1")]
    ZeroLimit(&'static str),
}

// =============================================================================
// TESTS
// =============================================================================
