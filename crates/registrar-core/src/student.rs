//! # Student Registry
//!
//! Student records and their current course memberships.
//!
//! Registry order is load order. Name lookups scan in that order, so when
//! two students share a display name the first one loaded wins.

use crate::error::RegistryError;
use crate::{names_match, CourseCode, StudentId, StudentType, MAX_COURSES_PER_STUDENT};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// STUDENT
// =============================================================================

/// A student and the courses they currently hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    id: StudentId,
    name: String,
    student_type: StudentType,
    /// Insertion-ordered, no duplicates.
    enrolled: Vec<CourseCode>,
}

impl Student {
    #[must_use]
    pub fn new(id: StudentId, name: impl Into<String>, student_type: StudentType) -> Self {
        Self {
            id,
            name: name.into(),
            student_type,
            enrolled: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &StudentId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn student_type(&self) -> StudentType {
        self.student_type
    }

    /// Courses in the order they were joined.
    #[must_use]
    pub fn enrolled_courses(&self) -> &[CourseCode] {
        &self.enrolled
    }

    #[must_use]
    pub fn is_enrolled_in(&self, course: &CourseCode) -> bool {
        self.enrolled.contains(course)
    }

    #[must_use]
    pub fn course_count(&self) -> usize {
        self.enrolled.len()
    }

    /// Returns false if the course was already held.
    pub(crate) fn add_course(&mut self, course: CourseCode) -> bool {
        if self.enrolled.contains(&course) {
            return false;
        }
        self.enrolled.push(course);
        true
    }

    /// Returns false if the course was not held.
    pub(crate) fn drop_course(&mut self, course: &CourseCode) -> bool {
        match self.enrolled.iter().position(|c| c == course) {
            Some(pos) => {
                self.enrolled.remove(pos);
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (ID: {}, Type: {})",
            self.name, self.id, self.student_type
        )
    }
}

// =============================================================================
// STUDENTSTORE TRAIT
// =============================================================================

/// Read-side operations on the student registry.
pub trait StudentStore {
    /// Lookup by identifier.
    fn get(&self, id: &StudentId) -> Option<&Student>;

    /// Case-insensitive exact match on display name; first match wins.
    fn find_by_name(&self, name: &str) -> Option<&Student>;

    /// Every student whose display name matches, in registry order.
    fn find_all_by_name(&self, name: &str) -> Vec<&Student>;

    /// True iff the student holds fewer courses than the per-student limit.
    fn is_eligible_to_enroll(&self, student: &Student) -> bool;

    /// All students in registry order.
    fn students(&self) -> impl Iterator<Item = &Student>;

    /// Number of registered students.
    fn student_count(&self) -> usize;
}

// =============================================================================
// STUDENT REGISTRY
// =============================================================================

#[derive(Debug, Clone)]
pub struct StudentRegistry {
    /// Students in load order.
    students: Vec<Student>,
    /// Reverse lookup: StudentId -> position in `students`.
    index: BTreeMap<StudentId, usize>,
    /// Per-student course limit.
    max_courses: usize,
}

impl Default for StudentRegistry {
    fn default() -> Self {
        Self::new(MAX_COURSES_PER_STUDENT)
    }
}

impl StudentRegistry {
    #[must_use]
    pub fn new(max_courses: usize) -> Self {
        Self {
            students: Vec::new(),
            index: BTreeMap::new(),
            max_courses: max_courses.max(1),
        }
    }

    #[must_use]
    pub fn max_courses(&self) -> usize {
        self.max_courses
    }

    /// Register a student at load time.
    pub fn insert(&mut self, student: Student) -> Result<(), RegistryError> {
        if self.index.contains_key(student.id()) {
            return Err(RegistryError::DuplicateStudent(student.id().clone()));
        }
        self.index.insert(student.id().clone(), self.students.len());
        self.students.push(student);
        Ok(())
    }

    pub(crate) fn get_mut(&mut self, id: &StudentId) -> Option<&mut Student> {
        let pos = *self.index.get(id)?;
        self.students.get_mut(pos)
    }
}

impl StudentStore for StudentRegistry {
    fn get(&self, id: &StudentId) -> Option<&Student> {
        self.index.get(id).and_then(|&pos| self.students.get(pos))
    }

    fn find_by_name(&self, name: &str) -> Option<&Student> {
        self.students.iter().find(|s| names_match(s.name(), name))
    }

    fn find_all_by_name(&self, name: &str) -> Vec<&Student> {
        self.students
            .iter()
            .filter(|s| names_match(s.name(), name))
            .collect()
    }

    fn is_eligible_to_enroll(&self, student: &Student) -> bool {
        student.course_count() < self.max_courses
    }

    fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.iter()
    }

    fn student_count(&self) -> usize {
        self.students.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================
