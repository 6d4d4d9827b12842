//! # Advisor Registry
//!
//! Advisor-to-student assignments and the queue of enrollment requests
//! awaiting each advisor's decision.
//!
//! A pending request references its student and course by identity. A given
//! (student, course) pair is queued at most once per advisor.

use crate::error::RegistryError;
use crate::{names_match, AdvisorId, CourseCode, StudentId, DEFAULT_ADVISOR_CAPACITY};
use serde::Serialize;
use std::fmt;

// =============================================================================
// PENDING REQUEST
// =============================================================================

/// An unconfirmed enrollment intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingRequest {
    pub student: StudentId,
    pub course: CourseCode,
}

impl PendingRequest {
    #[must_use]
    pub fn new(student: StudentId, course: CourseCode) -> Self {
        Self { student, course }
    }

    fn is(&self, student: &StudentId, course: &CourseCode) -> bool {
        &self.student == student && &self.course == course
    }
}

// =============================================================================
// ADVISOR
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisor {
    name: String,
    assigned: Vec<StudentId>,
    pending: Vec<PendingRequest>,
}

impl Advisor {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assigned: Vec::new(),
            pending: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn assigned_students(&self) -> &[StudentId] {
        &self.assigned
    }

    #[must_use]
    pub fn is_assigned(&self, student: &StudentId) -> bool {
        self.assigned.contains(student)
    }

    /// Pending requests in arrival order.
    #[must_use]
    pub fn pending_requests(&self) -> &[PendingRequest] {
        &self.pending
    }

    #[must_use]
    pub fn has_pending(&self, student: &StudentId, course: &CourseCode) -> bool {
        self.pending.iter().any(|r| r.is(student, course))
    }

    fn remove_pending(&mut self, student: &StudentId, course: &CourseCode) -> bool {
        match self.pending.iter().position(|r| r.is(student, course)) {
            Some(pos) => {
                self.pending.remove(pos);
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for Advisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// =============================================================================
// ADVISORSTORE TRAIT
// =============================================================================

/// Read-side operations on the advisor registry.
pub trait AdvisorStore {
    /// Lookup by handle.
    fn get(&self, id: AdvisorId) -> Option<&Advisor>;

    /// Case-insensitive exact match on advisor name; first match wins.
    fn find_by_name(&self, name: &str) -> Option<AdvisorId>;

    /// First advisor (in registry order) whose assignments contain the
    /// student. Overlapping assignments are not rejected; the earliest
    /// advisor is the one that counts.
    fn find_by_assigned_student(&self, student: &StudentId) -> Option<AdvisorId>;

    /// Pending requests for an advisor, in arrival order.
    fn pending(&self, id: AdvisorId) -> &[PendingRequest] {
        self.get(id)
            .map(Advisor::pending_requests)
            .unwrap_or_default()
    }

    /// All advisors in registry order, with their handles.
    fn advisors(&self) -> impl Iterator<Item = (AdvisorId, &Advisor)>;

    /// Number of registered advisors.
    fn advisor_count(&self) -> usize;
}

// =============================================================================
// ADVISOR REGISTRY
// =============================================================================

#[derive(Debug, Clone)]
pub struct AdvisorRegistry {
    advisors: Vec<Advisor>,
    /// Students an advisor may be assigned.
    capacity: usize,
}

impl Default for AdvisorRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_ADVISOR_CAPACITY)
    }
}

impl AdvisorRegistry {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            advisors: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Register an advisor at load time and return its handle.
    pub fn insert(&mut self, advisor: Advisor) -> AdvisorId {
        self.advisors.push(advisor);
        AdvisorId(self.advisors.len() - 1)
    }

    /// Assign a student to an advisor at load time.
    pub fn assign_student(
        &mut self,
        id: AdvisorId,
        student: StudentId,
    ) -> Result<(), RegistryError> {
        let capacity = self.capacity;
        let advisor = self
            .advisors
            .get_mut(id.0)
            .ok_or(RegistryError::UnknownAdvisor(id))?;

        if advisor.is_assigned(&student) {
            return Err(RegistryError::AlreadyAssigned {
                advisor: advisor.name.clone(),
                student,
            });
        }
        if advisor.assigned.len() >= capacity {
            return Err(RegistryError::AdvisorFull {
                advisor: advisor.name.clone(),
                capacity,
            });
        }
        advisor.assigned.push(student);
        Ok(())
    }

    /// Queue a request. Returns its 1-based position, or `None` when the
    /// advisor is unknown or the identical pair is already pending.
    pub(crate) fn enqueue_request(
        &mut self,
        id: AdvisorId,
        student: StudentId,
        course: CourseCode,
    ) -> Option<usize> {
        let advisor = self.advisors.get_mut(id.0)?;
        if advisor.has_pending(&student, &course) {
            return None;
        }
        advisor.pending.push(PendingRequest::new(student, course));
        Some(advisor.pending.len())
    }

    /// Remove an approved request. The caller performs the enrollment.
    pub(crate) fn approve(
        &mut self,
        id: AdvisorId,
        student: &StudentId,
        course: &CourseCode,
    ) -> bool {
        self.advisors
            .get_mut(id.0)
            .is_some_and(|a| a.remove_pending(student, course))
    }

    /// Remove a denied request. Nothing else changes.
    pub(crate) fn deny(&mut self, id: AdvisorId, student: &StudentId, course: &CourseCode) -> bool {
        self.advisors
            .get_mut(id.0)
            .is_some_and(|a| a.remove_pending(student, course))
    }
}

impl AdvisorStore for AdvisorRegistry {
    fn get(&self, id: AdvisorId) -> Option<&Advisor> {
        self.advisors.get(id.0)
    }

    fn find_by_name(&self, name: &str) -> Option<AdvisorId> {
        self.advisors
            .iter()
            .position(|a| names_match(a.name(), name))
            .map(AdvisorId)
    }

    fn find_by_assigned_student(&self, student: &StudentId) -> Option<AdvisorId> {
        self.advisors
            .iter()
            .position(|a| a.is_assigned(student))
            .map(AdvisorId)
    }

    fn advisors(&self) -> impl Iterator<Item = (AdvisorId, &Advisor)> {
        self.advisors
            .iter()
            .enumerate()
            .map(|(pos, advisor)| (AdvisorId(pos), advisor))
    }

    fn advisor_count(&self) -> usize {
        self.advisors.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(id: &str) -> StudentId {
        StudentId::new(id)
    }

    fn code(c: &str) -> CourseCode {
        CourseCode::new(c)
    }

    #[test]
    fn assignment_is_capped() {
        let mut registry = AdvisorRegistry::new(2);
        let adv = registry.insert(Advisor::new("Dr. Grey"));

        assert!(registry.assign_student(adv, sid("S1")).is_ok());
        assert!(registry.assign_student(adv, sid("S2")).is_ok());
        assert_eq!(
            registry.assign_student(adv, sid("S3")),
            Err(RegistryError::AdvisorFull {
                advisor: "Dr. Grey".to_string(),
                capacity: 2,
            })
        );
        assert_eq!(registry.get(adv).map(|a| a.assigned_students().len()), Some(2));
    }

    #[test]
    fn repeated_assignment_is_rejected() {
        let mut registry = AdvisorRegistry::default();
        let adv = registry.insert(Advisor::new("Dr. Grey"));
        assert!(registry.assign_student(adv, sid("S1")).is_ok());
        assert!(matches!(
            registry.assign_student(adv, sid("S1")),
            Err(RegistryError::AlreadyAssigned { .. })
        ));
    }

    #[test]
    fn overlapping_assignment_resolves_to_first_advisor() {
        let mut registry = AdvisorRegistry::default();
        let first = registry.insert(Advisor::new("First"));
        let second = registry.insert(Advisor::new("Second"));
        assert!(registry.assign_student(second, sid("S1")).is_ok());
        assert!(registry.assign_student(first, sid("S1")).is_ok());

        assert_eq!(registry.find_by_assigned_student(&sid("S1")), Some(first));
        assert_eq!(registry.find_by_assigned_student(&sid("S9")), None);
    }

    #[test]
    fn find_by_name_is_case_insensitive() {
        let mut registry = AdvisorRegistry::default();
        let adv = registry.insert(Advisor::new("Dr. Grey"));
        assert_eq!(registry.find_by_name("dr. grey"), Some(adv));
        assert_eq!(registry.find_by_name("Grey"), None);
    }

    #[test]
    fn enqueue_rejects_identical_pair() {
        let mut registry = AdvisorRegistry::default();
        let adv = registry.insert(Advisor::new("Dr. Grey"));

        assert_eq!(registry.enqueue_request(adv, sid("S1"), code("C1")), Some(1));
        assert_eq!(registry.enqueue_request(adv, sid("S1"), code("C2")), Some(2));
        assert_eq!(registry.enqueue_request(adv, sid("S1"), code("C1")), None);
        assert_eq!(registry.pending(adv).len(), 2);
    }

    #[test]
    fn approve_and_deny_remove_only_the_matching_pair() {
        let mut registry = AdvisorRegistry::default();
        let adv = registry.insert(Advisor::new("Dr. Grey"));
        registry.enqueue_request(adv, sid("S1"), code("C1"));
        registry.enqueue_request(adv, sid("S2"), code("C1"));
        registry.enqueue_request(adv, sid("S1"), code("C2"));

        assert!(registry.approve(adv, &sid("S2"), &code("C1")));
        assert!(!registry.approve(adv, &sid("S2"), &code("C1")));
        assert!(registry.deny(adv, &sid("S1"), &code("C2")));
        assert!(!registry.deny(adv, &sid("S1"), &code("C2")));

        assert_eq!(
            registry.pending(adv),
            &[PendingRequest::new(sid("S1"), code("C1"))]
        );
    }

    #[test]
    fn unknown_advisor_has_no_pending() {
        let registry = AdvisorRegistry::default();
        assert!(registry.pending(AdvisorId(7)).is_empty());
    }
}
