//! # Course Registry
//!
//! Course records, their capacity, and the current roster of each course.
//!
//! Roster mutation is crate-internal. Only the engine adds or removes
//! students, always together with the matching change on the student side.

use crate::error::RegistryError;
use crate::{names_match, CourseCode, StudentId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// COURSE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    code: CourseCode,
    name: String,
    max_capacity: usize,
    /// Enrollment-ordered, no duplicates.
    roster: Vec<StudentId>,
}

impl Course {
    /// Create a course with an empty roster. Capacity must be positive.
    pub fn new(
        code: CourseCode,
        name: impl Into<String>,
        max_capacity: usize,
    ) -> Result<Self, RegistryError> {
        if max_capacity == 0 {
            return Err(RegistryError::ZeroCapacity(code));
        }
        Ok(Self {
            code,
            name: name.into(),
            max_capacity,
            roster: Vec::new(),
        })
    }

    #[must_use]
    pub fn code(&self) -> &CourseCode {
        &self.code
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    #[must_use]
    pub fn roster(&self) -> &[StudentId] {
        &self.roster
    }

    #[must_use]
    pub fn enrolled_count(&self) -> usize {
        self.roster.len()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.roster.len() >= self.max_capacity
    }

    #[must_use]
    pub fn has_student(&self, student: &StudentId) -> bool {
        self.roster.contains(student)
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Code: {}, Enrolled: {}/{})",
            self.name,
            self.code,
            self.roster.len(),
            self.max_capacity
        )
    }
}

// =============================================================================
// ROSTER SNAPSHOT
// =============================================================================

/// Point-in-time copy of a course roster, for listing and reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterSnapshot {
    pub code: CourseCode,
    pub name: String,
    pub max_capacity: usize,
    pub enrolled_count: usize,
    pub students: Vec<StudentId>,
}

impl From<&Course> for RosterSnapshot {
    fn from(course: &Course) -> Self {
        Self {
            code: course.code.clone(),
            name: course.name.clone(),
            max_capacity: course.max_capacity,
            enrolled_count: course.roster.len(),
            students: course.roster.clone(),
        }
    }
}

// =============================================================================
// COURSESTORE TRAIT
// =============================================================================

/// Read-side operations on the course registry.
pub trait CourseStore {
    /// Lookup by course code.
    fn get(&self, code: &CourseCode) -> Option<&Course>;

    /// Case-insensitive exact match on display name; first match wins.
    fn find_by_name(&self, name: &str) -> Option<&Course>;

    /// All courses in registry order.
    fn courses(&self) -> impl Iterator<Item = &Course>;

    /// Number of registered courses.
    fn course_count(&self) -> usize;

    /// Roster snapshot for one course.
    fn snapshot(&self, code: &CourseCode) -> Option<RosterSnapshot> {
        self.get(code).map(RosterSnapshot::from)
    }

    /// Roster snapshots for every course in registry order.
    fn snapshots(&self) -> Vec<RosterSnapshot> {
        self.courses().map(RosterSnapshot::from).collect()
    }
}

// =============================================================================
// COURSE REGISTRY
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct CourseRegistry {
    /// Courses in load order.
    courses: Vec<Course>,
    /// Reverse lookup: CourseCode -> position in `courses`.
    index: BTreeMap<CourseCode, usize>,
}

impl CourseRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a course at load time.
    pub fn insert(&mut self, course: Course) -> Result<(), RegistryError> {
        if self.index.contains_key(course.code()) {
            return Err(RegistryError::DuplicateCourse(course.code().clone()));
        }
        self.index.insert(course.code().clone(), self.courses.len());
        self.courses.push(course);
        Ok(())
    }

    /// Add a student to a roster.
    ///
    /// Fails if the course is unknown, at capacity, or already lists the
    /// student.
    pub(crate) fn add_student(&mut self, course: &CourseCode, student: &StudentId) -> bool {
        let Some(course) = self.get_mut(course) else {
            return false;
        };
        if course.is_full() || course.has_student(student) {
            return false;
        }
        course.roster.push(student.clone());
        true
    }

    /// Remove a student from a roster. Fails if the student is not on it.
    pub(crate) fn remove_student(&mut self, course: &CourseCode, student: &StudentId) -> bool {
        let Some(course) = self.get_mut(course) else {
            return false;
        };
        match course.roster.iter().position(|s| s == student) {
            Some(pos) => {
                course.roster.remove(pos);
                true
            }
            None => false,
        }
    }

    fn get_mut(&mut self, code: &CourseCode) -> Option<&mut Course> {
        let pos = *self.index.get(code)?;
        self.courses.get_mut(pos)
    }
}

impl CourseStore for CourseRegistry {
    fn get(&self, code: &CourseCode) -> Option<&Course> {
        self.index.get(code).and_then(|&pos| self.courses.get(pos))
    }

    fn find_by_name(&self, name: &str) -> Option<&Course> {
        self.courses.iter().find(|c| names_match(c.name(), name))
    }

    fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.iter()
    }

    fn course_count(&self) -> usize {
        self.courses.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================
