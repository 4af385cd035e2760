//! Identifier types for the analysis domain.

use super::AnalysisDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of an analysis history entry.
///
/// Identifiers are caller-supplied strings such as `demo-marketing-1`; the
/// store rejects duplicates on insertion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryEntryId(String);

impl HistoryEntryId {
    /// Wraps a compile-time constant known to be non-empty.
    pub(super) fn from_static(value: &'static str) -> Self {
        Self(value.to_owned())
    }

    /// Creates a validated history entry identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisDomainError::EmptyHistoryEntryId`] when the value is
    /// blank.
    pub fn new(value: impl Into<String>) -> Result<Self, AnalysisDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AnalysisDomainError::EmptyHistoryEntryId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Generates a fresh random identifier with the `analysis-` prefix.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("analysis-{}", Uuid::new_v4()))
    }

    /// Returns `true` for identifiers reserved for seeded demo entries.
    #[must_use]
    pub fn is_demo(&self) -> bool {
        self.0.starts_with(super::DEMO_ID_PREFIX)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for HistoryEntryId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for HistoryEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a saved analysis model or template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    /// Wraps a compile-time constant known to be non-empty.
    pub(super) fn from_static(value: &'static str) -> Self {
        Self(value.to_owned())
    }

    /// Creates a validated model identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisDomainError::EmptyModelId`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, AnalysisDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AnalysisDomainError::EmptyModelId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Generates a fresh random identifier with the `model-` prefix.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("model-{}", Uuid::new_v4()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ModelId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named analysis objective, such as `data-cleaning`.
///
/// Goals are free-form: an unrecognised goal is valid and simply selects an
/// empty task catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(String);

impl GoalId {
    /// Wraps a compile-time constant known to be non-empty.
    pub(super) fn from_static(value: &'static str) -> Self {
        Self(value.to_owned())
    }

    /// Creates a validated goal identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisDomainError::EmptyGoalId`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, AnalysisDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AnalysisDomainError::EmptyGoalId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the goal as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GoalId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
