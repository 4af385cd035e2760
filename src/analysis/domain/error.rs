//! Error types for analysis domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing analysis domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalysisDomainError {
    /// A history entry identifier is empty after trimming.
    #[error("history entry identifier must not be empty")]
    EmptyHistoryEntryId,

    /// A model identifier is empty after trimming.
    #[error("model identifier must not be empty")]
    EmptyModelId,

    /// A goal identifier is empty after trimming.
    #[error("goal identifier must not be empty")]
    EmptyGoalId,

    /// A display name is empty after trimming.
    #[error("display name must not be empty")]
    EmptyName,
}

/// Error returned while parsing analysis statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown analysis status: {0}")]
pub struct ParseAnalysisStatusError(pub String);
