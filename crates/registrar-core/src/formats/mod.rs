//! # Formats Module
//!
//! Parsing of student, course and advisor records.
//!
//! This module contains:
//! - The record types exchanged with loaders
//! - CSV parsing (header row, comma-separated fields)
//! - JSON parsing (arrays of records)
//!
//! Note: File I/O operations remain in the app layer (apps/registrar).
//! This module only handles format conversion (pure transformations).

mod csv;
mod json;

pub use csv::{parse_advisors_csv, parse_courses_csv, parse_students_csv};
pub use json::{parse_advisors_json, parse_courses_json, parse_students_json};

use crate::error::FormatError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A student row: `(id, name, type)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    /// Free-text type label, e.g. "undergraduate" or "postgraduate".
    pub student_type: String,
}

/// A course row: `(code, name, max_capacity)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub code: String,
    pub name: String,
    pub max_capacity: usize,
}

/// An advisor row: `(name, assigned student ids...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorRecord {
    pub name: String,
    #[serde(default)]
    pub assigned_students: Vec<String>,
}

/// Supported record encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordFormat {
    #[default]
    Csv,
    Json,
}

impl RecordFormat {
    /// File extension used for data files in this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    pub fn parse_students(self, text: &str) -> Result<Vec<StudentRecord>, FormatError> {
        match self {
            Self::Csv => parse_students_csv(text),
            Self::Json => parse_students_json(text),
        }
    }

    pub fn parse_courses(self, text: &str) -> Result<Vec<CourseRecord>, FormatError> {
        match self {
            Self::Csv => parse_courses_csv(text),
            Self::Json => parse_courses_json(text),
        }
    }

    pub fn parse_advisors(self, text: &str) -> Result<Vec<AdvisorRecord>, FormatError> {
        match self {
            Self::Csv => parse_advisors_csv(text),
            Self::Json => parse_advisors_json(text),
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
