//! Error types for workflow domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing workflow domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowDomainError {
    /// A task identifier is empty after trimming.
    #[error("task identifier must not be empty")]
    EmptyTaskId,

    /// A custom task was submitted without a description.
    #[error("custom task description must not be empty")]
    EmptyTaskDescription,

    /// A custom task was submitted without a target column.
    #[error("custom task column must not be empty")]
    EmptyTaskColumn,
}

/// Error returned while parsing task states.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task state: {0}")]
pub struct ParseTaskStateError(pub String);

/// Error returned while parsing cleaning bucket names.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown cleaning bucket: {0}")]
pub struct ParseCleaningBucketError(pub String);
