//! Saved analysis model configurations.

use super::{AnalysisDomainError, GoalId, ModelId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bucket a user-defined setup task is filed under while configuring goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupTaskCategory {
    /// Filling or imputing absent values.
    MissingValues,
    /// Converting or parsing column types.
    DataTypes,
    /// Removing duplicate records.
    Duplicates,
    /// Detecting extreme values.
    Outliers,
    /// Standardising, normalising, or cleaning formats.
    Formatting,
}

/// A user-defined task attached to a saved model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTaskDefinition {
    /// Task identifier.
    pub id: String,
    /// Target column name.
    pub column: String,
    /// Free-text description.
    pub description: String,
    /// Whether the task should run.
    pub enabled: bool,
    /// Classified bucket.
    pub category: SetupTaskCategory,
}

/// A reusable analysis configuration, either a built-in template or a
/// user-saved model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisModel {
    id: ModelId,
    name: String,
    description: String,
    goals: Vec<GoalId>,
    custom_goal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_tasks: Option<Vec<CustomTaskDefinition>>,
    processing_steps: Vec<String>,
    created_at: DateTime<Utc>,
    data_types: Vec<String>,
    is_template: bool,
}

impl AnalysisModel {
    /// Creates a user model with no goals, steps, or data types.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisDomainError::EmptyName`] when the name is blank.
    pub fn new(
        id: ModelId,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, AnalysisDomainError> {
        let raw_name = name.into();
        if raw_name.trim().is_empty() {
            return Err(AnalysisDomainError::EmptyName);
        }
        Ok(Self {
            id,
            name: raw_name.trim().to_owned(),
            description: String::new(),
            goals: Vec::new(),
            custom_goal: String::new(),
            custom_tasks: None,
            processing_steps: Vec::new(),
            created_at,
            data_types: Vec::new(),
            is_template: false,
        })
    }

    /// Builds a seeded model from constants known to be valid.
    pub(super) fn seeded(id: ModelId, name: &'static str, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.to_owned(),
            description: String::new(),
            goals: Vec::new(),
            custom_goal: String::new(),
            custom_tasks: None,
            processing_steps: Vec::new(),
            created_at,
            data_types: Vec::new(),
            is_template: false,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the goal identifiers.
    #[must_use]
    pub fn with_goals(mut self, goals: impl IntoIterator<Item = GoalId>) -> Self {
        self.goals = goals.into_iter().collect();
        self
    }

    /// Sets the free-text custom goal.
    #[must_use]
    pub fn with_custom_goal(mut self, custom_goal: impl Into<String>) -> Self {
        self.custom_goal = custom_goal.into();
        self
    }

    /// Sets the custom task definitions.
    #[must_use]
    pub fn with_custom_tasks(mut self, tasks: impl IntoIterator<Item = CustomTaskDefinition>) -> Self {
        self.custom_tasks = Some(tasks.into_iter().collect());
        self
    }

    /// Sets the ordered processing-step identifiers.
    #[must_use]
    pub fn with_processing_steps(mut self, steps: impl IntoIterator<Item = String>) -> Self {
        self.processing_steps = steps.into_iter().collect();
        self
    }

    /// Sets the data-type tags.
    #[must_use]
    pub fn with_data_types(mut self, data_types: impl IntoIterator<Item = String>) -> Self {
        self.data_types = data_types.into_iter().collect();
        self
    }

    /// Marks the model as a built-in template.
    #[must_use]
    pub const fn as_template(mut self) -> Self {
        self.is_template = true;
        self
    }

    /// Returns a user-owned copy under a new identifier.
    ///
    /// The copy's name gains a `" (Copy)"` suffix and it is never a template.
    #[must_use]
    pub fn duplicate(&self, id: ModelId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: format!("{} (Copy)", self.name),
            created_at,
            is_template: false,
            ..self.clone()
        }
    }

    /// Returns the model identifier.
    #[must_use]
    pub const fn id(&self) -> &ModelId {
        &self.id
    }

    /// Returns the model name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the goal identifiers.
    #[must_use]
    pub fn goals(&self) -> &[GoalId] {
        &self.goals
    }

    /// Returns the free-text custom goal.
    #[must_use]
    pub fn custom_goal(&self) -> &str {
        &self.custom_goal
    }

    /// Returns the custom task definitions, if any were saved.
    #[must_use]
    pub fn custom_tasks(&self) -> Option<&[CustomTaskDefinition]> {
        self.custom_tasks.as_deref()
    }

    /// Returns the ordered processing-step identifiers.
    #[must_use]
    pub fn processing_steps(&self) -> &[String] {
        &self.processing_steps
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the data-type tags.
    #[must_use]
    pub fn data_types(&self) -> &[String] {
        &self.data_types
    }

    /// Returns `true` for built-in templates.
    #[must_use]
    pub const fn is_template(&self) -> bool {
        self.is_template
    }

    /// Returns `true` when the name or description contains `term`, ignoring
    /// case. An empty term matches every model.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}
