//! Task workflow engine.
//!
//! Owns the category tree for the selected goal and the working dataset.
//! Runs are cooperative futures: each awaits the injected
//! [`ProgressTicker`] between increments and observes a
//! [`CancellationToken`] derived from the engine's lifetime token, which is
//! replaced whenever the catalog is rebuilt.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use mockable::Clock;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::{ProgressSimulator, ResultStrategyRegistry, WorkflowConfig};
use crate::analysis::domain::GoalId;
use crate::workflow::{
    domain::{
        CellEditOutcome, CleaningBucket, ColumnKind, Dataset, TaskCategory, TaskEdit, TaskId,
        TaskResult, TaskState, WorkflowDomainError, WorkflowTask, catalog_for_goal,
    },
    ports::ProgressTicker,
};

/// Service-level errors for workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A custom task failed validation.
    #[error(transparent)]
    InvalidCustomTask(#[from] WorkflowDomainError),
    /// No task in the current catalog has the identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    /// The run was cancelled by a goal change, a re-trigger, or shutdown.
    #[error("run of task {0} was cancelled")]
    Cancelled(TaskId),
    /// The in-memory state lock was poisoned by a panicking writer.
    #[error("workflow state lock poisoned: {0}")]
    StatePoisoned(String),
}

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Request payload for adding a user-defined task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomTaskRequest {
    column: String,
    description: String,
    bucket: Option<CleaningBucket>,
}

impl CustomTaskRequest {
    /// Creates a request that is classified from its description.
    #[must_use]
    pub fn new(column: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            description: description.into(),
            bucket: None,
        }
    }

    /// Files the task under `bucket` instead of classifying it.
    #[must_use]
    pub const fn with_bucket(mut self, bucket: CleaningBucket) -> Self {
        self.bucket = Some(bucket);
        self
    }
}

#[derive(Debug)]
struct EngineState {
    goal: Option<GoalId>,
    categories: Vec<TaskCategory>,
    original: Arc<Dataset>,
    dataset: Arc<Dataset>,
    all_completed: bool,
    lifetime: CancellationToken,
    runs: HashMap<TaskId, CancellationToken>,
}

impl EngineState {
    fn task(&self, id: &TaskId) -> Option<&WorkflowTask> {
        self.categories
            .iter()
            .flat_map(TaskCategory::tasks)
            .find(|task| task.id() == id)
    }

    fn task_mut(&mut self, id: &TaskId) -> Option<&mut WorkflowTask> {
        self.categories
            .iter_mut()
            .find_map(|category| category.task_mut(id))
    }

    fn cancel_runs(&mut self) {
        self.lifetime.cancel();
        self.runs.clear();
    }
}

enum RunStep {
    Progressed(u8),
    Completed(WorkflowTask),
}

/// Goal-driven task workflow over a working dataset.
///
/// Clones share the same state, so a run spawned on one handle can be
/// cancelled through another.
pub struct TaskWorkflowEngine<T, C>
where
    T: ProgressTicker,
    C: Clock + Send + Sync,
{
    ticker: Arc<T>,
    clock: Arc<C>,
    config: Arc<WorkflowConfig>,
    progress: Arc<ProgressSimulator>,
    strategies: Arc<ResultStrategyRegistry>,
    state: Arc<RwLock<EngineState>>,
}

impl<T, C> Clone for TaskWorkflowEngine<T, C>
where
    T: ProgressTicker,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            ticker: Arc::clone(&self.ticker),
            clock: Arc::clone(&self.clock),
            config: Arc::clone(&self.config),
            progress: Arc::clone(&self.progress),
            strategies: Arc::clone(&self.strategies),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T, C> TaskWorkflowEngine<T, C>
where
    T: ProgressTicker,
    C: Clock + Send + Sync,
{
    /// Creates an engine over `dataset` with no goal selected.
    ///
    /// The engine starts with the default configuration, an OS-seeded
    /// progress simulator, and the built-in result strategies.
    #[must_use]
    pub fn new(ticker: Arc<T>, clock: Arc<C>, dataset: Dataset) -> Self {
        let snapshot = Arc::new(dataset);
        Self {
            ticker,
            clock,
            config: Arc::new(WorkflowConfig::default()),
            progress: Arc::new(ProgressSimulator::default()),
            strategies: Arc::new(ResultStrategyRegistry::with_defaults()),
            state: Arc::new(RwLock::new(EngineState {
                goal: None,
                categories: Vec::new(),
                original: Arc::clone(&snapshot),
                dataset: snapshot,
                all_completed: false,
                lifetime: CancellationToken::new(),
                runs: HashMap::new(),
            })),
        }
    }

    /// Replaces the timing configuration.
    #[must_use]
    pub fn with_config(mut self, config: WorkflowConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Replaces the progress random source.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressSimulator) -> Self {
        self.progress = Arc::new(progress);
        self
    }

    /// Replaces the result strategy registry.
    #[must_use]
    pub fn with_strategies(mut self, strategies: ResultStrategyRegistry) -> Self {
        self.strategies = Arc::new(strategies);
        self
    }

    /// Rebuilds the catalog for `goal`.
    ///
    /// Every in-flight run is cancelled and all previous task state,
    /// including results, is discarded. The working dataset is kept.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn select_goal(&self, goal: Option<GoalId>) -> WorkflowResult<()> {
        let categories = goal
            .as_ref()
            .map(|selected| catalog_for_goal(selected.as_str()))
            .unwrap_or_default();
        let category_count = categories.len();
        self.write(|state| {
            state.cancel_runs();
            state.lifetime = CancellationToken::new();
            state.categories = categories;
            state.all_completed = false;
            state.goal.clone_from(&goal);
        })?;
        tracing::info!(
            goal = goal.as_ref().map_or("none", GoalId::as_str),
            categories = category_count,
            "rebuilt task catalog"
        );
        Ok(())
    }

    /// Returns the selected goal.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn goal(&self) -> WorkflowResult<Option<GoalId>> {
        self.read(|state| state.goal.clone())
    }

    /// Returns the category tree in catalog order.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn categories(&self) -> WorkflowResult<Vec<TaskCategory>> {
        self.read(|state| state.categories.clone())
    }

    /// Looks up a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn task(&self, id: &TaskId) -> WorkflowResult<Option<WorkflowTask>> {
        self.read(|state| state.task(id).cloned())
    }

    /// Returns the current working dataset snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn dataset(&self) -> WorkflowResult<Arc<Dataset>> {
        self.read(|state| Arc::clone(&state.dataset))
    }

    /// Returns the dataset the engine was created with.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn original_dataset(&self) -> WorkflowResult<Arc<Dataset>> {
        self.read(|state| Arc::clone(&state.original))
    }

    /// Returns `true` once a run-all pass has finished for this catalog.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn all_tasks_completed(&self) -> WorkflowResult<bool> {
        self.read(|state| state.all_completed)
    }

    /// Adds a user-defined task.
    ///
    /// The task is appended to the category of its bucket, creating and
    /// appending that category when the catalog lacks it.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidCustomTask`] when the column or
    /// description is blank.
    pub fn add_custom_task(&self, request: CustomTaskRequest) -> WorkflowResult<WorkflowTask> {
        let bucket = request
            .bucket
            .unwrap_or_else(|| CleaningBucket::classify(&request.description));
        let stamp = self.clock.utc().timestamp_millis();
        let task = self.write(|state| {
            let id = (0..)
                .map(|offset| TaskId::custom(&request.column, stamp.saturating_add(offset)))
                .find(|candidate| state.task(candidate).is_none())
                .unwrap_or_else(|| TaskId::custom(&request.column, stamp));
            let task = WorkflowTask::custom(id, bucket, &request.column, &request.description)?;
            let in_bucket = |category: &TaskCategory| category.id().as_str() == bucket.category_id();
            if !state.categories.iter().any(in_bucket) {
                state.categories.push(TaskCategory::for_bucket(bucket));
            }
            if let Some(target) = state.categories.iter_mut().find(|category| in_bucket(category)) {
                target.push_task(task.clone());
            }
            state.all_completed = false;
            Ok::<_, WorkflowError>(task)
        })??;
        tracing::info!(task = %task.id(), bucket = bucket.as_str(), "added custom task");
        Ok(task)
    }

    /// Updates a task's descriptive fields.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::TaskNotFound`] when no task has the
    /// identifier.
    pub fn edit_task(&self, id: &TaskId, edit: &TaskEdit) -> WorkflowResult<WorkflowTask> {
        self.write(|state| {
            let task = state
                .task_mut(id)
                .ok_or_else(|| WorkflowError::TaskNotFound(id.clone()))?;
            task.apply_edit(edit);
            Ok(task.clone())
        })?
    }

    /// Runs one task until its progress reaches 100.
    ///
    /// Starting a run resets the task to `running` at 0% and cancels any
    /// earlier run of the same task. On completion the task's result is
    /// computed from the current dataset, which is then replaced by the
    /// result's `after` snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::TaskNotFound`] when no task has the
    /// identifier, or [`WorkflowError::Cancelled`] when the run is
    /// cancelled before completing. A cancelled run leaves state alone.
    pub async fn execute_task(&self, id: &TaskId) -> WorkflowResult<WorkflowTask> {
        let token = self.write(|state| {
            if state.lifetime.is_cancelled() {
                return Err(WorkflowError::Cancelled(id.clone()));
            }
            let token = state.lifetime.child_token();
            state
                .task_mut(id)
                .ok_or_else(|| WorkflowError::TaskNotFound(id.clone()))?
                .start();
            if let Some(previous) = state.runs.insert(id.clone(), token.clone()) {
                previous.cancel();
            }
            Ok(token)
        })??;
        let duration = self.progress.next_duration(&self.config);
        tracing::debug!(task = %id, "started task run");

        loop {
            tokio::select! {
                () = token.cancelled() => {
                    tracing::debug!(task = %id, "task run cancelled");
                    return Err(WorkflowError::Cancelled(id.clone()));
                }
                () = self.ticker.tick() => {}
            }
            let increment = self.progress.next_increment(&self.config);
            match self.write(|state| self.advance_run(state, id, &token, increment, duration))?? {
                RunStep::Progressed(progress) => {
                    tracing::debug!(task = %id, progress, "task progressed");
                }
                RunStep::Completed(task) => {
                    tracing::info!(
                        task = %id,
                        rows_affected = task.result().map_or(0, TaskResult::rows_affected),
                        "task completed"
                    );
                    return Ok(task);
                }
            }
        }
    }

    /// Runs every task of the catalog in order, one at a time.
    ///
    /// A run superseded by a re-trigger or by [`Self::complete_task`] does
    /// not stop the pass; the next task starts instead. Sets the
    /// all-tasks-completed flag once the last task finishes.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Cancelled`] when the catalog is rebuilt or
    /// the engine shut down during the pass.
    pub async fn execute_all(&self) -> WorkflowResult<()> {
        let (ids, lifetime) = self.read(|state| {
            let ids: Vec<TaskId> = state
                .categories
                .iter()
                .flat_map(TaskCategory::tasks)
                .map(|task| task.id().clone())
                .collect();
            (ids, state.lifetime.clone())
        })?;
        for id in &ids {
            if lifetime.is_cancelled() {
                return Err(WorkflowError::Cancelled(id.clone()));
            }
            match self.execute_task(id).await {
                Ok(_) => {}
                Err(WorkflowError::Cancelled(_)) if !lifetime.is_cancelled() => {
                    tracing::debug!(task = %id, "task run superseded, continuing pass");
                }
                Err(err) => return Err(err),
            }
        }
        self.write(|state| {
            if !lifetime.is_cancelled() {
                state.all_completed = true;
            }
        })?;
        tracing::info!(tasks = ids.len(), "all tasks completed");
        Ok(())
    }

    /// Records a result produced outside the simulated runner and marks the
    /// task completed. Any in-flight run of the task is cancelled.
    ///
    /// The working dataset is not replaced.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::TaskNotFound`] when no task has the
    /// identifier.
    pub fn complete_task(&self, id: &TaskId, result: TaskResult) -> WorkflowResult<WorkflowTask> {
        self.write(|state| {
            if let Some(run) = state.runs.remove(id) {
                run.cancel();
            }
            let task = state
                .task_mut(id)
                .ok_or_else(|| WorkflowError::TaskNotFound(id.clone()))?;
            task.complete(result, None);
            Ok(task.clone())
        })?
    }

    /// Edits one cell of the working dataset.
    ///
    /// Input is coerced by the column's kind. Rejected input and
    /// out-of-range cells leave the dataset untouched; an applied edit
    /// publishes a new snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn edit_cell(
        &self,
        row: usize,
        column: &str,
        input: &str,
    ) -> WorkflowResult<CellEditOutcome> {
        let Some(value) = ColumnKind::for_column(column).coerce(input) else {
            tracing::debug!(row, column, "rejected cell input");
            return Ok(CellEditOutcome::Ignored);
        };
        self.write(|state| {
            let updated = state.dataset.with_cell(row, column, value);
            updated.map_or(CellEditOutcome::Ignored, |snapshot| {
                state.dataset = Arc::new(snapshot);
                tracing::debug!(row, column, "applied cell edit");
                CellEditOutcome::Applied
            })
        })
    }

    /// Returns the script preview of a task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::TaskNotFound`] when no task has the
    /// identifier.
    pub fn script_for(&self, id: &TaskId) -> WorkflowResult<String> {
        self.read(|state| {
            state
                .task(id)
                .map(|task| self.strategies.script_for(task.id()))
                .ok_or_else(|| WorkflowError::TaskNotFound(id.clone()))
        })?
    }

    /// Cancels every in-flight run and returns running tasks to pending.
    ///
    /// Later runs are refused with [`WorkflowError::Cancelled`] until a goal
    /// is selected again.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn shutdown(&self) -> WorkflowResult<()> {
        let interrupted = self.write(|state| {
            state.cancel_runs();
            let mut interrupted = 0_usize;
            for task in state
                .categories
                .iter_mut()
                .flat_map(|category| category.tasks_mut())
                .filter(|task| task.state() == TaskState::Running)
            {
                task.reset();
                interrupted = interrupted.saturating_add(1);
            }
            interrupted
        })?;
        tracing::info!(interrupted, "workflow engine shut down");
        Ok(())
    }

    fn advance_run(
        &self,
        state: &mut EngineState,
        id: &TaskId,
        token: &CancellationToken,
        increment: u8,
        duration: Duration,
    ) -> WorkflowResult<RunStep> {
        if token.is_cancelled() {
            return Err(WorkflowError::Cancelled(id.clone()));
        }
        let dataset = Arc::clone(&state.dataset);
        let task = state
            .task_mut(id)
            .ok_or_else(|| WorkflowError::TaskNotFound(id.clone()))?;
        let progress = task.advance(increment);
        if progress < 100 {
            return Ok(RunStep::Progressed(progress));
        }
        let result = self.strategies.compute(id, &dataset);
        let after = Arc::clone(result.after());
        task.complete(result, Some(duration));
        let completed = task.clone();
        state.dataset = after;
        state.runs.remove(id);
        Ok(RunStep::Completed(completed))
    }

    fn read<R>(&self, f: impl FnOnce(&EngineState) -> R) -> WorkflowResult<R> {
        let state = self
            .state
            .read()
            .map_err(|err| WorkflowError::StatePoisoned(err.to_string()))?;
        Ok(f(&state))
    }

    fn write<R>(&self, f: impl FnOnce(&mut EngineState) -> R) -> WorkflowResult<R> {
        let mut state = self
            .state
            .write()
            .map_err(|err| WorkflowError::StatePoisoned(err.to_string()))?;
        Ok(f(&mut state))
    }
}
