//! # Enrollment Engine
//!
//! The state machine governing every (student, course) pair:
//!
//! ```text
//! Unrelated ──enroll (undergraduate)──────────────────────► Enrolled
//! Unrelated ──enroll (postgraduate)──► PendingApproval ──approve──► Enrolled
//!                                      PendingApproval ──deny─────► Unrelated
//! Enrolled  ──drop────────────────────────────────────────► Unrelated
//! ```
//!
//! The engine owns all three registries. Each operation validates first and
//! mutates last, so a returned error always means nothing changed. The
//! student-side and course-side views of a membership are only ever updated
//! together, inside a single `&mut self` call.

use crate::advisor::{AdvisorRegistry, AdvisorStore, PendingRequest};
use crate::config::EngineConfig;
use crate::course::{CourseRegistry, CourseStore, RosterSnapshot};
use crate::error::EnrollmentError;
use crate::student::{Student, StudentRegistry, StudentStore};
use crate::{AdvisorId, CourseCode, StudentId};
use serde::Serialize;
use std::collections::BTreeSet;

// =============================================================================
// OUTCOMES
// =============================================================================

/// Successful result of an enroll request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EnrollOutcome {
    /// Direct path: the student is on the roster now.
    Enrolled {
        student: StudentId,
        course: CourseCode,
    },
    /// Routed path: the request waits at `position` (1-based) in the
    /// advisor's queue.
    PendingApproval { advisor: AdvisorId, position: usize },
}

/// Successful result of a drop request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropOutcome {
    pub student: StudentId,
    pub course: CourseCode,
}

/// An advisor's verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Deny,
}

/// Successful result of an advisor decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DecisionOutcome {
    Approved {
        student: StudentId,
        course: CourseCode,
    },
    Denied {
        student: StudentId,
        course: CourseCode,
    },
}

/// A pending request with names resolved, as shown to an advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingView {
    /// 1-based position in the advisor's queue.
    pub index: usize,
    pub student: StudentId,
    pub student_name: String,
    pub course: CourseCode,
    pub course_name: String,
}

// =============================================================================
// ENGINE
// =============================================================================

#[derive(Debug, Clone)]
pub struct EnrollmentEngine {
    config: EngineConfig,
    students: StudentRegistry,
    courses: CourseRegistry,
    advisors: AdvisorRegistry,
}

impl EnrollmentEngine {
    /// Assemble an engine from loaded registries.
    ///
    /// Registries built outside this crate cannot carry memberships or
    /// pending requests, so a freshly assembled engine is always consistent.
    #[must_use]
    pub fn new(
        config: EngineConfig,
        students: StudentRegistry,
        courses: CourseRegistry,
        advisors: AdvisorRegistry,
    ) -> Self {
        Self {
            config,
            students,
            courses,
            advisors,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn students(&self) -> &StudentRegistry {
        &self.students
    }

    #[must_use]
    pub fn courses(&self) -> &CourseRegistry {
        &self.courses
    }

    #[must_use]
    pub fn advisors(&self) -> &AdvisorRegistry {
        &self.advisors
    }

    // -------------------------------------------------------------------------
    // Enroll
    // -------------------------------------------------------------------------

    /// Request enrollment of a student in a course.
    pub fn enroll(
        &mut self,
        student: &StudentId,
        course: &CourseCode,
    ) -> Result<EnrollOutcome, EnrollmentError> {
        let record = self.student(student)?;
        self.course_exists(course)?;
        self.check_student_can_join(record, course)?;

        if !record.student_type().requires_approval() {
            self.enroll_direct(student, course)?;
            return Ok(EnrollOutcome::Enrolled {
                student: student.clone(),
                course: course.clone(),
            });
        }

        let advisor = self
            .advisors
            .find_by_assigned_student(student)
            .ok_or_else(|| EnrollmentError::NoAdvisorAssigned(student.clone()))?;
        let position = self
            .advisors
            .enqueue_request(advisor, student.clone(), course.clone())
            .ok_or_else(|| EnrollmentError::AlreadyRequested {
                student: student.clone(),
                course: course.clone(),
            })?;
        Ok(EnrollOutcome::PendingApproval { advisor, position })
    }

    /// [`enroll`](Self::enroll) with student and course given by display name.
    pub fn enroll_by_name(
        &mut self,
        student_name: &str,
        course_name: &str,
    ) -> Result<EnrollOutcome, EnrollmentError> {
        let (student, course) = self.resolve_names(student_name, course_name)?;
        self.enroll(&student, &course)
    }

    // -------------------------------------------------------------------------
    // Drop
    // -------------------------------------------------------------------------

    /// Remove a student from a course they are enrolled in.
    pub fn drop_course(
        &mut self,
        student: &StudentId,
        course: &CourseCode,
    ) -> Result<DropOutcome, EnrollmentError> {
        let record = self.student(student)?;
        self.course_exists(course)?;

        if !record.is_enrolled_in(course) {
            return Err(EnrollmentError::NotEnrolled {
                student: student.clone(),
                course: course.clone(),
            });
        }

        if !self.courses.remove_student(course, student) {
            return Err(EnrollmentError::InconsistentState(format!(
                "student {student} lists {course} but is not on its roster"
            )));
        }

        let dropped = self
            .students
            .get_mut(student)
            .is_some_and(|s| s.drop_course(course));
        debug_assert!(dropped, "membership checked above");

        Ok(DropOutcome {
            student: student.clone(),
            course: course.clone(),
        })
    }

    /// [`drop_course`](Self::drop_course) with student and course given by display name.
    pub fn drop_course_by_name(
        &mut self,
        student_name: &str,
        course_name: &str,
    ) -> Result<DropOutcome, EnrollmentError> {
        let (student, course) = self.resolve_names(student_name, course_name)?;
        self.drop_course(&student, &course)
    }

    // -------------------------------------------------------------------------
    // Advisor decisions
    // -------------------------------------------------------------------------

    /// Approve or deny the advisor's `index`-th (1-based) pending request.
    ///
    /// Approval enrolls first and only then removes the request. When the
    /// enrollment cannot happen the request stays queued, so the advisor can
    /// retry later or deny it.
    pub fn decide(
        &mut self,
        advisor: AdvisorId,
        index: usize,
        decision: Decision,
    ) -> Result<DecisionOutcome, EnrollmentError> {
        let pending = self
            .advisors
            .get(advisor)
            .map(|a| a.pending_requests())
            .ok_or_else(|| EnrollmentError::AdvisorNotFound(format!("#{}", advisor.0)))?;

        let PendingRequest { student, course } = index
            .checked_sub(1)
            .and_then(|i| pending.get(i))
            .cloned()
            .ok_or(EnrollmentError::InvalidRequestIndex {
                index,
                pending: pending.len(),
            })?;

        match decision {
            Decision::Deny => {
                self.advisors.deny(advisor, &student, &course);
                Ok(DecisionOutcome::Denied { student, course })
            }
            Decision::Approve => {
                let record = self.student(&student)?;
                self.course_exists(&course)?;
                self.check_student_can_join(record, &course)?;

                self.enroll_direct(&student, &course)
                    .map_err(|err| match err {
                        EnrollmentError::CourseFull { course, .. } => {
                            EnrollmentError::CourseFullAtApproval { advisor, course }
                        }
                        other => other,
                    })?;
                self.advisors.approve(advisor, &student, &course);
                Ok(DecisionOutcome::Approved { student, course })
            }
        }
    }

    /// [`decide`](Self::decide) with the advisor given by name.
    pub fn decide_by_name(
        &mut self,
        advisor_name: &str,
        index: usize,
        decision: Decision,
    ) -> Result<DecisionOutcome, EnrollmentError> {
        let advisor = self
            .advisors
            .find_by_name(advisor_name)
            .ok_or_else(|| EnrollmentError::AdvisorNotFound(advisor_name.to_string()))?;
        self.decide(advisor, index, decision)
    }

    // -------------------------------------------------------------------------
    // Views
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn roster(&self, course: &CourseCode) -> Option<RosterSnapshot> {
        self.courses.snapshot(course)
    }

    #[must_use]
    pub fn rosters(&self) -> Vec<RosterSnapshot> {
        self.courses.snapshots()
    }

    /// Names of the courses a student holds, in the order they were joined.
    #[must_use]
    pub fn student_courses(&self, student: &StudentId) -> Option<Vec<&str>> {
        let record = self.students.get(student)?;
        Some(
            record
                .enrolled_courses()
                .iter()
                .filter_map(|code| self.courses.get(code).map(|c| c.name()))
                .collect(),
        )
    }

    /// An advisor's queue with names resolved for display.
    #[must_use]
    pub fn pending_requests(&self, advisor: AdvisorId) -> Vec<PendingView> {
        self.advisors
            .pending(advisor)
            .iter()
            .enumerate()
            .map(|(pos, request)| PendingView {
                index: pos + 1,
                student: request.student.clone(),
                student_name: self
                    .students
                    .get(&request.student)
                    .map(|s| s.name().to_string())
                    .unwrap_or_else(|| request.student.to_string()),
                course: request.course.clone(),
                course_name: self
                    .courses
                    .get(&request.course)
                    .map(|c| c.name().to_string())
                    .unwrap_or_else(|| request.course.to_string()),
            })
            .collect()
    }

    /// Verify every invariant the engine maintains.
    ///
    /// Checks both sides of every membership, the per-student and per-course
    /// limits, and uniqueness of pending pairs.
    pub fn check_consistency(&self) -> Result<(), EnrollmentError> {
        let breach = |msg: String| -> Result<(), EnrollmentError> {
            Err(EnrollmentError::InconsistentState(msg))
        };
        let limit = self.students.max_courses();

        for student in self.students.students() {
            if student.course_count() > limit {
                return breach(format!(
                    "student {} holds {} courses",
                    student.id(),
                    student.course_count()
                ));
            }
            for code in student.enrolled_courses() {
                let on_roster = self
                    .courses
                    .get(code)
                    .is_some_and(|c| c.has_student(student.id()));
                if !on_roster {
                    return breach(format!(
                        "student {} lists {code} but is not on its roster",
                        student.id()
                    ));
                }
            }
        }

        for course in self.courses.courses() {
            if course.enrolled_count() > course.max_capacity() {
                return breach(format!("course {} is over capacity", course.code()));
            }
            let unique: BTreeSet<_> = course.roster().iter().collect();
            if unique.len() != course.enrolled_count() {
                return breach(format!("course {} lists a student twice", course.code()));
            }
            for id in course.roster() {
                let listed = self
                    .students
                    .get(id)
                    .is_some_and(|s| s.is_enrolled_in(course.code()));
                if !listed {
                    return breach(format!(
                        "roster of {} has {id} without a matching enrollment",
                        course.code()
                    ));
                }
            }
        }

        for (_, advisor) in self.advisors.advisors() {
            let pending = advisor.pending_requests();
            let unique: BTreeSet<_> = pending.iter().map(|r| (&r.student, &r.course)).collect();
            if unique.len() != pending.len() {
                return breach(format!(
                    "advisor {} has a duplicate pending request",
                    advisor.name()
                ));
            }
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn student(&self, id: &StudentId) -> Result<&Student, EnrollmentError> {
        self.students
            .get(id)
            .ok_or_else(|| EnrollmentError::StudentNotFound(id.to_string()))
    }

    fn course_exists(&self, code: &CourseCode) -> Result<(), EnrollmentError> {
        if self.courses.get(code).is_none() {
            return Err(EnrollmentError::CourseNotFound(code.to_string()));
        }
        Ok(())
    }

    fn resolve_names(
        &self,
        student_name: &str,
        course_name: &str,
    ) -> Result<(StudentId, CourseCode), EnrollmentError> {
        let course = self
            .courses
            .find_by_name(course_name)
            .ok_or_else(|| EnrollmentError::CourseNotFound(course_name.to_string()))?;
        let student = self
            .students
            .find_by_name(student_name)
            .ok_or_else(|| EnrollmentError::StudentNotFound(student_name.to_string()))?;
        Ok((student.id().clone(), course.code().clone()))
    }

    /// Student-side preconditions shared by enroll and approval.
    fn check_student_can_join(
        &self,
        student: &Student,
        course: &CourseCode,
    ) -> Result<(), EnrollmentError> {
        if student.is_enrolled_in(course) {
            return Err(EnrollmentError::AlreadyEnrolled {
                student: student.id().clone(),
                course: course.clone(),
            });
        }
        if !self.students.is_eligible_to_enroll(student) {
            return Err(EnrollmentError::CapacityExceededForStudent {
                student: student.id().clone(),
                limit: self.students.max_courses(),
            });
        }
        Ok(())
    }

    /// Add to the roster and to the student's list as one step.
    fn enroll_direct(
        &mut self,
        student: &StudentId,
        course: &CourseCode,
    ) -> Result<(), EnrollmentError> {
        if !self.courses.add_student(course, student) {
            let Some(record) = self.courses.get(course) else {
                return Err(EnrollmentError::CourseNotFound(course.to_string()));
            };
            if record.has_student(student) {
                return Err(EnrollmentError::InconsistentState(format!(
                    "student {student} is on the roster of {course} without being enrolled"
                )));
            }
            return Err(EnrollmentError::CourseFull {
                course: course.clone(),
                capacity: record.max_capacity(),
            });
        }

        let added = self
            .students
            .get_mut(student)
            .is_some_and(|s| s.add_course(course.clone()));
        if !added {
            self.courses.remove_student(course, student);
            return Err(EnrollmentError::InconsistentState(format!(
                "student {student} could not record enrollment in {course}"
            )));
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
