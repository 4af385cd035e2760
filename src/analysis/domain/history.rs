//! Analysis history records and history queries.

use super::{AnalysisDomainError, AnalysisModel, HistoryEntryId, ParseAnalysisStatusError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// The analysis finished successfully.
    Completed,
    /// The analysis is still running.
    Processing,
    /// The analysis failed.
    Failed,
}

impl AnalysisStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Processing => "processing",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AnalysisStatus {
    type Error = ParseAnalysisStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "completed" => Ok(Self::Completed),
            "processing" => Ok(Self::Processing),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseAnalysisStatusError(value.to_owned())),
        }
    }
}

/// A past or in-progress analysis run shown in history listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisHistoryEntry {
    id: HistoryEntryId,
    name: String,
    file_name: String,
    status: AnalysisStatus,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<AnalysisModel>,
    insights: u32,
    data_rows: u64,
    data_columns: u32,
}

impl AnalysisHistoryEntry {
    /// Creates a history entry with zero insights and no recorded dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisDomainError::EmptyName`] when the display name is
    /// blank.
    pub fn new(
        id: HistoryEntryId,
        name: impl Into<String>,
        file_name: impl Into<String>,
        status: AnalysisStatus,
        created_at: DateTime<Utc>,
    ) -> Result<Self, AnalysisDomainError> {
        let raw_name = name.into();
        if raw_name.trim().is_empty() {
            return Err(AnalysisDomainError::EmptyName);
        }
        Ok(Self {
            id,
            name: raw_name.trim().to_owned(),
            file_name: file_name.into(),
            status,
            created_at,
            completed_at: None,
            model: None,
            insights: 0,
            data_rows: 0,
            data_columns: 0,
        })
    }

    /// Builds a seeded entry from constants known to be valid.
    pub(super) fn seeded(
        id: HistoryEntryId,
        name: &'static str,
        file_name: &'static str,
        status: AnalysisStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.to_owned(),
            file_name: file_name.to_owned(),
            status,
            created_at,
            completed_at: None,
            model: None,
            insights: 0,
            data_rows: 0,
            data_columns: 0,
        }
    }

    /// Sets the completion timestamp.
    #[must_use]
    pub const fn with_completed_at(mut self, completed_at: DateTime<Utc>) -> Self {
        self.completed_at = Some(completed_at);
        self
    }

    /// Sets the number of insights produced.
    #[must_use]
    pub const fn with_insights(mut self, insights: u32) -> Self {
        self.insights = insights;
        self
    }

    /// Sets the analysed dataset dimensions.
    #[must_use]
    pub const fn with_dimensions(mut self, rows: u64, columns: u32) -> Self {
        self.data_rows = rows;
        self.data_columns = columns;
        self
    }

    /// Attaches a snapshot of the model used for the run.
    #[must_use]
    pub fn with_model(mut self, model: AnalysisModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> &HistoryEntryId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the analysed source file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> AnalysisStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the completion timestamp, if any.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the embedded model snapshot, if any.
    #[must_use]
    pub const fn model(&self) -> Option<&AnalysisModel> {
        self.model.as_ref()
    }

    /// Returns the number of insights produced.
    #[must_use]
    pub const fn insights(&self) -> u32 {
        self.insights
    }

    /// Returns the number of analysed rows.
    #[must_use]
    pub const fn data_rows(&self) -> u64 {
        self.data_rows
    }

    /// Returns the number of analysed columns.
    #[must_use]
    pub const fn data_columns(&self) -> u32 {
        self.data_columns
    }

    /// Returns `true` when this is a seeded demo record.
    #[must_use]
    pub fn is_demo(&self) -> bool {
        self.id.is_demo()
    }

    /// Marks the run completed with its final insight count.
    ///
    /// Completion and failure are the only mutations history entries undergo
    /// after creation.
    pub const fn complete(&mut self, insights: u32, completed_at: DateTime<Utc>) {
        self.status = AnalysisStatus::Completed;
        self.insights = insights;
        self.completed_at = Some(completed_at);
    }

    /// Marks the run failed, keeping the insight count recorded so far.
    pub const fn fail(&mut self, failed_at: DateTime<Utc>) {
        self.status = AnalysisStatus::Failed;
        self.completed_at = Some(failed_at);
    }
}

/// Search criteria applied to history listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    search_term: String,
    status: Option<AnalysisStatus>,
}

impl HistoryFilter {
    /// Creates a filter matching every entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to entries whose name or file name contains the
    /// term, ignoring case.
    #[must_use]
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into().to_lowercase();
        self
    }

    /// Restricts results to entries with the given status.
    #[must_use]
    pub const fn with_status(mut self, status: AnalysisStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns `true` when the entry satisfies every criterion.
    #[must_use]
    pub fn matches(&self, entry: &AnalysisHistoryEntry) -> bool {
        let matches_search = self.search_term.is_empty()
            || entry.name().to_lowercase().contains(&self.search_term)
            || entry.file_name().to_lowercase().contains(&self.search_term);
        let matches_status = self.status.is_none_or(|status| entry.status() == status);
        matches_search && matches_status
    }
}

/// Number of history entries per lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStatusCounts {
    /// Entries with [`AnalysisStatus::Completed`].
    pub completed: usize,
    /// Entries with [`AnalysisStatus::Processing`].
    pub processing: usize,
    /// Entries with [`AnalysisStatus::Failed`].
    pub failed: usize,
}

impl HistoryStatusCounts {
    /// Tallies the statuses of the given entries.
    #[must_use]
    pub fn tally<'a>(entries: impl IntoIterator<Item = &'a AnalysisHistoryEntry>) -> Self {
        entries
            .into_iter()
            .fold(Self::default(), |mut counts, entry| {
                match entry.status() {
                    AnalysisStatus::Completed => counts.completed += 1,
                    AnalysisStatus::Processing => counts.processing += 1,
                    AnalysisStatus::Failed => counts.failed += 1,
                }
                counts
            })
    }
}
