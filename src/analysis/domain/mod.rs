//! Domain model for analysis history and saved analysis models.
//!
//! The analysis domain describes history records, reusable model
//! configurations, and the fixed demo records seeded on every load, while
//! keeping persistence concerns outside of the domain boundary.

mod error;
mod history;
mod ids;
mod model;
mod seed;

pub use error::{AnalysisDomainError, ParseAnalysisStatusError};
pub use history::{AnalysisHistoryEntry, AnalysisStatus, HistoryFilter, HistoryStatusCounts};
pub use ids::{GoalId, HistoryEntryId, ModelId};
pub use model::{AnalysisModel, CustomTaskDefinition, SetupTaskCategory};
pub use seed::{DEMO_ID_PREFIX, demo_history, template_models};
