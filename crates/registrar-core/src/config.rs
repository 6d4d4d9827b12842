//! # Engine Configuration
//!
//! Tunable limits for the enrollment rules. Every field has a default, so
//! a partial JSON document (or none at all) is a valid configuration.

use crate::error::ConfigError;
use crate::{DEFAULT_ADVISOR_CAPACITY, MAX_COURSES_PER_STUDENT};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Courses a student may hold at once.
    pub max_courses_per_student: usize,
    /// Students an advisor may be assigned.
    pub advisor_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_courses_per_student: MAX_COURSES_PER_STUDENT,
            advisor_capacity: DEFAULT_ADVISOR_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON text and validate it.
    pub fn from_json(text: &str) -> Result<Self, ConfigParseError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_courses_per_student == 0 {
            return Err(ConfigError::ZeroLimit("max_courses_per_student"));
        }
        if self.advisor_capacity == 0 {
            return Err(ConfigError::ZeroLimit("advisor_capacity"));
        }
        Ok(())
    }
}

/// Either the JSON was malformed or the values were out of range.
#[derive(Debug, thiserror::Error)]
pub enum ConfigParseError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] ConfigError),
}

// =============================================================================
// TESTS
// =============================================================================
