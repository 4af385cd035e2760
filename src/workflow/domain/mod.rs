//! Domain model for goal-driven task workflows.
//!
//! Tasks, categories, and the working dataset are plain values. Nothing in
//! this module schedules work or touches infrastructure.

mod catalog;
mod cell;
mod classify;
mod dataset;
mod error;
mod ids;
mod task;

pub use catalog::catalog_for_goal;
pub use cell::{CellEditOutcome, ColumnKind, is_iso_date, parse_number};
pub use classify::{CleaningBucket, classify_goal_setup_task};
pub use dataset::{CAMPAIGN_COLUMNS, CellValue, DataRow, Dataset};
pub use error::{ParseCleaningBucketError, ParseTaskStateError, WorkflowDomainError};
pub use ids::{CategoryId, TaskId};
pub use task::{
    CategoryStatus, StatisticDelta, TaskCategory, TaskEdit, TaskResult, TaskState, WorkflowTask,
};
