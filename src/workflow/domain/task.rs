//! Workflow tasks, their results, and the categories that group them.

use super::{CategoryId, CleaningBucket, Dataset, ParseTaskStateError, TaskId, WorkflowDomainError};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Number of description characters kept in a custom task's name.
const CUSTOM_NAME_PREFIX_CHARS: usize = 30;

/// Execution state of a task.
///
/// This is the only state a task carries. The serialized task exposes it
/// under both the `status` and the older `process` name, so the two can
/// never disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Not started, or returned to the queue after a cancelled run.
    #[default]
    Pending,
    /// Progress is being simulated.
    Running,
    /// The run reached 100% and its result was applied.
    Completed,
    /// The run failed. No built-in path produces this state.
    Error,
}

impl TaskState {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    /// Returns the legacy `process` label, which spells pending as `todo`.
    #[must_use]
    pub const fn process_label(self) -> &'static str {
        match self {
            Self::Pending => "todo",
            Self::Running | Self::Completed | Self::Error => self.as_str(),
        }
    }
}

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskStateError;

    fn try_from(value: &str) -> Result<Self, ParseTaskStateError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" | "todo" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "error" => Ok(Self::Error),
            _ => Err(ParseTaskStateError(value.to_owned())),
        }
    }
}

/// Before and after values of one statistic reported by a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticDelta {
    /// Value before the task ran.
    pub before: u64,
    /// Value after the task ran.
    pub after: u64,
    /// Human-readable summary of the change.
    pub change: String,
}

/// Outcome of a completed task run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    rows_affected: u64,
    changes: Vec<String>,
    #[serde(serialize_with = "serialize_snapshot")]
    before: Arc<Dataset>,
    #[serde(serialize_with = "serialize_snapshot")]
    after: Arc<Dataset>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    statistics: BTreeMap<String, StatisticDelta>,
}

impl TaskResult {
    /// Creates a result with its change log and dataset snapshots.
    #[must_use]
    pub fn new(
        rows_affected: u64,
        changes: impl IntoIterator<Item = String>,
        before: Arc<Dataset>,
        after: Arc<Dataset>,
    ) -> Self {
        Self {
            rows_affected,
            changes: changes.into_iter().collect(),
            before,
            after,
            statistics: BTreeMap::new(),
        }
    }

    /// Creates the neutral result: nothing changed and both snapshots are
    /// the same `Arc`.
    #[must_use]
    pub fn unchanged(dataset: &Arc<Dataset>) -> Self {
        Self::new(
            0,
            ["Task completed successfully".to_owned()],
            Arc::clone(dataset),
            Arc::clone(dataset),
        )
    }

    /// Adds a keyed statistic.
    #[must_use]
    pub fn with_statistic(mut self, key: impl Into<String>, delta: StatisticDelta) -> Self {
        self.statistics.insert(key.into(), delta);
        self
    }

    /// Returns the number of rows the task changed.
    #[must_use]
    pub const fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    /// Returns the human-readable change log.
    #[must_use]
    pub fn changes(&self) -> &[String] {
        &self.changes
    }

    /// Returns the dataset the task started from.
    #[must_use]
    pub const fn before(&self) -> &Arc<Dataset> {
        &self.before
    }

    /// Returns the dataset the task produced.
    #[must_use]
    pub const fn after(&self) -> &Arc<Dataset> {
        &self.after
    }

    /// Returns the keyed statistics.
    #[must_use]
    pub const fn statistics(&self) -> &BTreeMap<String, StatisticDelta> {
        &self.statistics
    }
}

fn serialize_snapshot<S: Serializer>(dataset: &Arc<Dataset>, serializer: S) -> Result<S::Ok, S::Error> {
    dataset.as_ref().serialize(serializer)
}

/// Manual changes to a task's descriptive fields.
///
/// Blank values are ignored so an edit can never clear a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    description: Option<String>,
    column: Option<String>,
    details: Option<String>,
}

impl TaskEdit {
    /// Creates an empty edit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the target column.
    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Replaces the detail text.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// A unit of simulated work against one column of the working dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowTask {
    id: TaskId,
    category: String,
    column: String,
    name: String,
    description: String,
    state: TaskState,
    progress: u8,
    duration: Option<Duration>,
    result: Option<TaskResult>,
    details: String,
}

impl WorkflowTask {
    pub(super) fn catalog(entry: &super::catalog::TaskEntry, category: &str) -> Self {
        Self {
            id: TaskId::from_static(entry.id),
            category: category.to_owned(),
            column: entry.column.to_owned(),
            name: entry.id.to_owned(),
            description: entry.description.to_owned(),
            state: TaskState::Pending,
            progress: 0,
            duration: None,
            result: None,
            details: entry.details.to_owned(),
        }
    }

    /// Creates a user-defined task filed under `bucket`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyTaskDescription`] or
    /// [`WorkflowDomainError::EmptyTaskColumn`] when either input is blank.
    pub fn custom(
        id: TaskId,
        bucket: CleaningBucket,
        column: &str,
        description: &str,
    ) -> Result<Self, WorkflowDomainError> {
        let trimmed_column = column.trim();
        if trimmed_column.is_empty() {
            return Err(WorkflowDomainError::EmptyTaskColumn);
        }
        let trimmed_description = description.trim();
        if trimmed_description.is_empty() {
            return Err(WorkflowDomainError::EmptyTaskDescription);
        }
        let prefix: String = trimmed_description
            .chars()
            .take(CUSTOM_NAME_PREFIX_CHARS)
            .collect();
        Ok(Self {
            id,
            category: bucket.label().to_owned(),
            column: trimmed_column.to_owned(),
            name: format!("Custom: {prefix}..."),
            description: trimmed_description.to_owned(),
            state: TaskState::Pending,
            progress: 0,
            duration: None,
            result: None,
            details: "User-defined task".to_owned(),
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the category label, such as `missing values`.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the target column.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the execution state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns progress as a percentage in `0..=100`.
    #[must_use]
    pub const fn progress(&self) -> u8 {
        self.progress
    }

    /// Returns the synthesized run duration of the last completed run.
    #[must_use]
    pub const fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Returns the result of the last completed run.
    #[must_use]
    pub const fn result(&self) -> Option<&TaskResult> {
        self.result.as_ref()
    }

    /// Returns the detail text.
    #[must_use]
    pub fn details(&self) -> &str {
        &self.details
    }

    /// Starts a fresh run, discarding the previous run's outcome.
    pub fn start(&mut self) {
        self.state = TaskState::Running;
        self.progress = 0;
        self.duration = None;
        self.result = None;
    }

    /// Adds `increment` percentage points, clamping at 100, and returns the
    /// new progress.
    pub fn advance(&mut self, increment: u8) -> u8 {
        self.progress = self.progress.saturating_add(increment).min(100);
        self.progress
    }

    /// Marks the run completed with its result.
    pub fn complete(&mut self, result: TaskResult, duration: Option<Duration>) {
        self.state = TaskState::Completed;
        self.progress = 100;
        self.duration = duration;
        self.result = Some(result);
    }

    /// Returns an interrupted task to the queue.
    pub const fn reset(&mut self) {
        self.state = TaskState::Pending;
        self.progress = 0;
    }

    /// Applies the non-blank fields of `edit`.
    pub fn apply_edit(&mut self, edit: &TaskEdit) {
        replace_if_present(&mut self.description, edit.description.as_deref());
        replace_if_present(&mut self.column, edit.column.as_deref());
        replace_if_present(&mut self.details, edit.details.as_deref());
    }
}

fn replace_if_present(field: &mut String, value: Option<&str>) {
    if let Some(text) = value.map(str::trim).filter(|text| !text.is_empty()) {
        text.clone_into(field);
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskView<'a> {
    id: &'a TaskId,
    category: &'a str,
    column: &'a str,
    name: &'a str,
    description: &'a str,
    process: &'static str,
    status: TaskState,
    progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a TaskResult>,
    details: &'a str,
}

impl Serialize for WorkflowTask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TaskView {
            id: &self.id,
            category: &self.category,
            column: &self.column,
            name: &self.name,
            description: &self.description,
            process: self.state.process_label(),
            status: self.state,
            progress: self.progress,
            duration: self.duration.map(|elapsed| elapsed.as_secs()),
            result: self.result.as_ref(),
            details: &self.details,
        }
        .serialize(serializer)
    }
}

/// Aggregate status of a category, derived from its tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStatus {
    /// Some task has not completed and none is running.
    Pending,
    /// At least one task is running.
    Running,
    /// Every task completed.
    Completed,
}

/// An ordered group of related tasks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskCategory {
    id: CategoryId,
    name: String,
    description: String,
    tasks: Vec<WorkflowTask>,
}

impl TaskCategory {
    pub(super) fn catalog(entry: &super::catalog::CategoryEntry) -> Self {
        Self {
            id: CategoryId::from_static(entry.id),
            name: entry.name.to_owned(),
            description: entry.description.to_owned(),
            tasks: entry
                .tasks
                .iter()
                .map(|task| WorkflowTask::catalog(task, entry.label))
                .collect(),
        }
    }

    /// Creates an empty category for custom tasks of `bucket`.
    #[must_use]
    pub fn for_bucket(bucket: CleaningBucket) -> Self {
        Self {
            id: CategoryId::from_static(bucket.category_id()),
            name: bucket.display_name().to_owned(),
            description: format!("Custom {} tasks", bucket.display_name()),
            tasks: Vec::new(),
        }
    }

    /// Returns the category identifier.
    #[must_use]
    pub const fn id(&self) -> &CategoryId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the tasks in order.
    #[must_use]
    pub fn tasks(&self) -> &[WorkflowTask] {
        &self.tasks
    }

    /// Iterates mutably over the tasks in order.
    pub fn tasks_mut(&mut self) -> std::slice::IterMut<'_, WorkflowTask> {
        self.tasks.iter_mut()
    }

    /// Returns a mutable reference to the task with `id`.
    pub fn task_mut(&mut self, id: &TaskId) -> Option<&mut WorkflowTask> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }

    /// Appends a task.
    pub fn push_task(&mut self, task: WorkflowTask) {
        self.tasks.push(task);
    }

    /// Derives the aggregate status.
    ///
    /// An empty category is pending.
    #[must_use]
    pub fn status(&self) -> CategoryStatus {
        let mut states = self.tasks.iter().map(WorkflowTask::state);
        if !self.tasks.is_empty() && states.all(|state| state == TaskState::Completed) {
            CategoryStatus::Completed
        } else if self.tasks.iter().any(|task| task.state() == TaskState::Running) {
            CategoryStatus::Running
        } else {
            CategoryStatus::Pending
        }
    }
}
