//! # Load
//!
//! Assembles an [`EnrollmentEngine`] from parsed records.
//!
//! Structural problems (duplicate ids or codes, zero capacity) abort the
//! load. Problems confined to a single advisor assignment are skipped and
//! reported as [`LoadWarning`]s so the caller can surface them.

use crate::advisor::{Advisor, AdvisorRegistry, AdvisorStore};
use crate::config::EngineConfig;
use crate::course::{Course, CourseRegistry, CourseStore};
use crate::engine::EnrollmentEngine;
use crate::error::{ConfigError, RegistryError};
use crate::formats::{AdvisorRecord, CourseRecord, StudentRecord};
use crate::student::{Student, StudentRegistry, StudentStore};
use crate::{CourseCode, StudentId, StudentType};
use std::fmt;

/// An advisor assignment that was skipped or is suspicious.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// The advisor row names a student id that was never loaded.
    UnknownStudent { advisor: String, student: StudentId },
    /// The advisor already has the maximum number of students.
    AdvisorFull {
        advisor: String,
        student: StudentId,
        capacity: usize,
    },
    /// The same student id appears twice in one advisor row.
    DuplicateAssignment { advisor: String, student: StudentId },
    /// The student is also assigned to an earlier advisor, which takes
    /// precedence for routing.
    SharedStudent {
        advisor: String,
        student: StudentId,
        routed_to: String,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownStudent { advisor, student } => {
                write!(f, "advisor {advisor}: unknown student id {student}, skipped")
            }
            Self::AdvisorFull {
                advisor,
                student,
                capacity,
            } => write!(
                f,
                "advisor {advisor}: already has {capacity} students, {student} skipped"
            ),
            Self::DuplicateAssignment { advisor, student } => {
                write!(f, "advisor {advisor}: student {student} listed twice")
            }
            Self::SharedStudent {
                advisor,
                student,
                routed_to,
            } => write!(
                f,
                "advisor {advisor}: student {student} is also assigned to {routed_to}, \
                 requests go to {routed_to}"
            ),
        }
    }
}

/// Everything worth telling the operator about a successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub students: usize,
    pub courses: usize,
    pub advisors: usize,
    pub warnings: Vec<LoadWarning>,
}

impl LoadReport {
    /// One-line load summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Initialised {} students, {} advisors including {} courses.",
            self.students, self.advisors, self.courses
        )
    }
}

/// Failure to assemble an engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Build an engine from records, in record order.
pub fn assemble(
    config: EngineConfig,
    students: Vec<StudentRecord>,
    courses: Vec<CourseRecord>,
    advisors: Vec<AdvisorRecord>,
) -> Result<(EnrollmentEngine, LoadReport), LoadError> {
    config.validate()?;

    let mut student_registry = StudentRegistry::new(config.max_courses_per_student);
    for record in students {
        student_registry.insert(Student::new(
            StudentId::new(record.id),
            record.name,
            StudentType::from_label(&record.student_type),
        ))?;
    }

    let mut course_registry = CourseRegistry::new();
    for record in courses {
        course_registry.insert(Course::new(
            CourseCode::new(record.code),
            record.name,
            record.max_capacity,
        )?)?;
    }

    let mut advisor_registry = AdvisorRegistry::new(config.advisor_capacity);
    let mut warnings = Vec::new();
    for record in advisors {
        let name = record.name.clone();
        let id = advisor_registry.insert(Advisor::new(record.name));

        for raw in record.assigned_students {
            let student = StudentId::new(raw);
            if student_registry.get(&student).is_none() {
                warnings.push(LoadWarning::UnknownStudent {
                    advisor: name.clone(),
                    student,
                });
                continue;
            }

            let earlier = advisor_registry
                .find_by_assigned_student(&student)
                .filter(|&other| other != id)
                .and_then(|other| advisor_registry.get(other))
                .map(|other| other.name().to_string());

            match advisor_registry.assign_student(id, student.clone()) {
                Ok(()) => {
                    if let Some(routed_to) = earlier {
                        warnings.push(LoadWarning::SharedStudent {
                            advisor: name.clone(),
                            student,
                            routed_to,
                        });
                    }
                }
                Err(RegistryError::AdvisorFull { capacity, .. }) => {
                    warnings.push(LoadWarning::AdvisorFull {
                        advisor: name.clone(),
                        student,
                        capacity,
                    });
                }
                Err(RegistryError::AlreadyAssigned { .. }) => {
                    warnings.push(LoadWarning::DuplicateAssignment {
                        advisor: name.clone(),
                        student,
                    });
                }
                Err(other) => return Err(other.into()),
            }
        }
    }

    let report = LoadReport {
        students: student_registry.student_count(),
        courses: course_registry.course_count(),
        advisors: advisor_registry.advisor_count(),
        warnings,
    };
    let engine = EnrollmentEngine::new(config, student_registry, course_registry, advisor_registry);
    Ok((engine, report))
}

// =============================================================================
// TESTS
// =============================================================================
