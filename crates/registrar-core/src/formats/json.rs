//! JSON record parsing: each file is an array of records.

use super::{AdvisorRecord, CourseRecord, StudentRecord};
use crate::error::FormatError;

pub fn parse_students_json(text: &str) -> Result<Vec<StudentRecord>, FormatError> {
    Ok(serde_json::from_str(text)?)
}

pub fn parse_courses_json(text: &str) -> Result<Vec<CourseRecord>, FormatError> {
    Ok(serde_json::from_str(text)?)
}

pub fn parse_advisors_json(text: &str) -> Result<Vec<AdvisorRecord>, FormatError> {
    Ok(serde_json::from_str(text)?)
}
