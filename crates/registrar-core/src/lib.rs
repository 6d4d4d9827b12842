//! # Registrar Core
//!
//! The deterministic enrollment engine for Registrar.
//!
//! This crate owns the rules for joining and leaving capacity-limited
//! courses, and the advisor approval queue that postgraduate requests pass
//! through before they take effect.
//!
//! ## Layers
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │ EnrollmentEngine (enroll / drop / decide)  │
//! ├──────────────┬──────────────┬──────────────┤
//! │ Students     │ Courses      │ Advisors     │
//! │ (registry)   │ (registry)   │ (+ requests) │
//! └──────────────┴──────────────┴──────────────┘
//! ```
//!
//! The core performs no I/O. Records arrive already parsed (see
//! [`formats`]) and outcomes leave as typed values; rendering is left to
//! the caller (see [`report`] for the standard text layouts).

pub mod advisor;
pub mod config;
pub mod course;
pub mod engine;
pub mod error;
pub mod formats;
pub mod load;
pub mod report;
pub mod student;

pub use advisor::{Advisor, AdvisorRegistry, AdvisorStore, PendingRequest};
pub use config::{ConfigParseError, EngineConfig};
pub use course::{Course, CourseRegistry, CourseStore, RosterSnapshot};
pub use engine::{
    Decision, DecisionOutcome, DropOutcome, EnrollOutcome, EnrollmentEngine, PendingView,
};
pub use error::{ConfigError, EnrollmentError, FormatError, RegistryError};
pub use formats::{AdvisorRecord, CourseRecord, RecordFormat, StudentRecord};
pub use load::{assemble, LoadError, LoadReport, LoadWarning};
pub use student::{Student, StudentRegistry, StudentStore};

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// PRIMITIVES
// =============================================================================

/// Maximum number of courses a student may hold at once.
pub const MAX_COURSES_PER_STUDENT: usize = 4;

/// Maximum number of students an advisor may be assigned.
pub const DEFAULT_ADVISOR_CAPACITY: usize = 3;

/// Stable, unique student identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub String);

impl StudentId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique course code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseCode(pub String);

impl CourseCode {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to an advisor, its position in the advisor registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AdvisorId(pub usize);

/// Which enrollment path a student takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentType {
    /// Enrolls directly.
    #[default]
    Undergraduate,
    /// Enrollment is routed through the assigned advisor.
    Postgraduate,
}

impl StudentType {
    /// Parse a type label. Only "postgraduate" (any case) routes through an
    /// advisor; every other label is treated as undergraduate.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("postgraduate") {
            Self::Postgraduate
        } else {
            Self::Undergraduate
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Undergraduate => "undergraduate",
            Self::Postgraduate => "postgraduate",
        }
    }

    #[must_use]
    pub fn requires_approval(self) -> bool {
        matches!(self, Self::Postgraduate)
    }
}

impl fmt::Display for StudentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive exact name comparison used by every registry lookup.
pub(crate) fn names_match(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

// =============================================================================
// TESTS
// =============================================================================
