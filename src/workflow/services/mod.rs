//! Service layer for the task workflow.

mod config;
mod engine;
mod progress;
mod strategy;

pub use config::WorkflowConfig;
pub use engine::{CustomTaskRequest, TaskWorkflowEngine, WorkflowError, WorkflowResult};
pub use progress::ProgressSimulator;
pub use strategy::{
    BUDGET_FALLBACK, CoerceNumeric, FillMissingNumber, FillMissingText, IMPRESSIONS_MEDIAN,
    ResultStrategy, ResultStrategyRegistry,
};
