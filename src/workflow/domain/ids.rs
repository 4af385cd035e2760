//! Identifiers for workflow tasks and categories.

use super::WorkflowDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a workflow task.
///
/// Catalog tasks use stable snake-case names such as
/// `handle_missing_values_target_audience`; custom tasks receive a
/// `custom-` prefixed identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a validated task identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyTaskId`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkflowDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WorkflowDomainError::EmptyTaskId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub(super) fn from_static(value: &'static str) -> Self {
        Self(value.to_owned())
    }

    /// Mints the identifier of a user-defined task on `column`, stamped
    /// with a millisecond timestamp.
    #[must_use]
    pub fn custom(column: &str, timestamp_millis: i64) -> Self {
        Self(format!("custom-{}-{timestamp_millis}", column.trim()))
    }

    /// Returns `true` for identifiers minted for user-defined tasks.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.0.starts_with("custom-")
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a task category, such as `missing-values`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub(super) fn from_static(value: &'static str) -> Self {
        Self(value.to_owned())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CategoryId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
