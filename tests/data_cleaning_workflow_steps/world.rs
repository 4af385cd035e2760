//! Shared world state for data cleaning workflow BDD scenarios.

use std::sync::Arc;

use datrix::workflow::{
    adapters::timer::ImmediateTicker,
    domain::{Dataset, WorkflowTask},
    services::{ProgressSimulator, TaskWorkflowEngine, WorkflowConfig, WorkflowError},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Engine type used by the BDD world.
pub type TestEngine = TaskWorkflowEngine<ImmediateTicker, DefaultClock>;

/// Scenario world for workflow behaviour tests.
pub struct WorkflowWorld {
    pub engine: Option<TestEngine>,
    pub last_task: Option<WorkflowTask>,
    pub last_error: Option<WorkflowError>,
}

impl WorkflowWorld {
    /// Creates a world with no engine yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            engine: None,
            last_task: None,
            last_error: None,
        }
    }

    /// Returns the scenario engine.
    ///
    /// # Errors
    ///
    /// Returns an error when no engine has been created yet.
    pub fn engine(&self) -> Result<&TestEngine, eyre::Report> {
        self.engine
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing workflow engine in scenario world"))
    }
}

impl Default for WorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds an engine over the sample dataset with deterministic progress.
#[must_use]
pub fn sample_engine() -> TestEngine {
    TaskWorkflowEngine::new(
        Arc::new(ImmediateTicker),
        Arc::new(DefaultClock),
        Dataset::sample(),
    )
    .with_config(WorkflowConfig::fast())
    .with_progress(ProgressSimulator::seeded(3))
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> WorkflowWorld {
    WorkflowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
