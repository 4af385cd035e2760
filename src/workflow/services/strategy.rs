//! Registry of result strategies keyed by task identifier.
//!
//! A strategy turns the working dataset into a [`TaskResult`] when a run
//! reaches 100%. Task identifiers without a registered strategy produce
//! [`TaskResult::unchanged`], so the dataset snapshot is left untouched.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::workflow::domain::{
    CellValue, Dataset, StatisticDelta, TaskId, TaskResult, parse_number,
};

/// Median used when imputing missing impressions.
pub const IMPRESSIONS_MEDIAN: u32 = 67_890;

/// Replacement for budgets that cannot be parsed as numbers.
pub const BUDGET_FALLBACK: u32 = 5_000;

/// Transformation applied when a task completes.
pub trait ResultStrategy: Send + Sync {
    /// Computes the result of running the task against `dataset`.
    fn apply(&self, dataset: &Arc<Dataset>) -> TaskResult;

    /// Returns an equivalent pandas snippet for display.
    fn script(&self) -> String;
}

/// Fills null or empty cells of a text column with a fixed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillMissingText {
    column: String,
    fill: String,
}

impl FillMissingText {
    /// Creates the strategy for `column`.
    #[must_use]
    pub fn new(column: impl Into<String>, fill: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            fill: fill.into(),
        }
    }
}

fn is_missing_text(value: &CellValue) -> bool {
    value.is_null() || value.as_text().is_some_and(str::is_empty)
}

impl ResultStrategy for FillMissingText {
    fn apply(&self, dataset: &Arc<Dataset>) -> TaskResult {
        let fill = CellValue::from(self.fill.as_str());
        let (after, filled) = dataset.map_column(&self.column, |value| {
            is_missing_text(value).then(|| fill.clone())
        });
        let remaining = after.count_where(&self.column, is_missing_text);
        let rows = u64::try_from(dataset.len()).unwrap_or(u64::MAX);
        let completeness = rows
            .saturating_sub(filled)
            .saturating_mul(100)
            .checked_div(rows)
            .unwrap_or(100);
        let change = if filled == 0 {
            "no change".to_owned()
        } else {
            format!("-{filled} (100% reduction)")
        };
        TaskResult::new(
            filled,
            [
                format!(
                    "Filled {filled} missing values in '{}' with '{}'",
                    self.column, self.fill
                ),
                format!("Data completeness improved from {completeness}% to 100%"),
            ],
            Arc::clone(dataset),
            Arc::new(after),
        )
        .with_statistic(
            "missing_values",
            StatisticDelta {
                before: filled.saturating_add(remaining),
                after: remaining,
                change,
            },
        )
    }

    fn script(&self) -> String {
        let column = &self.column;
        format!(
            "# Fill missing values in {column} column\n\
             df['{column}'] = df['{column}'].fillna('{}')",
            self.fill
        )
    }
}

/// Fills null or zero cells of a numeric column with a fixed median.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillMissingNumber {
    column: String,
    median: u32,
}

impl FillMissingNumber {
    /// Creates the strategy for `column`.
    #[must_use]
    pub fn new(column: impl Into<String>, median: u32) -> Self {
        Self {
            column: column.into(),
            median,
        }
    }
}

fn is_missing_number(value: &CellValue) -> bool {
    match value {
        CellValue::Null => true,
        CellValue::Number(number) => number.abs() < f64::EPSILON,
        CellValue::Text(_) => false,
    }
}

impl ResultStrategy for FillMissingNumber {
    fn apply(&self, dataset: &Arc<Dataset>) -> TaskResult {
        let (after, filled) = dataset.map_column(&self.column, |value| {
            is_missing_number(value).then(|| CellValue::from(self.median))
        });
        let noun = if filled == 1 { "value" } else { "values" };
        TaskResult::new(
            filled,
            [
                format!(
                    "Filled {filled} missing {noun} in '{}' with median value {}",
                    self.column, self.median
                ),
                format!("{} column now 100% complete", capitalized(&self.column)),
            ],
            Arc::clone(dataset),
            Arc::new(after),
        )
    }

    fn script(&self) -> String {
        let column = &self.column;
        format!(
            "# Fill missing values in {column} column with median\n\
             median_{column} = df['{column}'].median()\n\
             df['{column}'] = df['{column}'].fillna(median_{column})"
        )
    }
}

/// Converts text cells of a numeric column to numbers.
///
/// Text that does not parse is replaced by a fixed fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoerceNumeric {
    column: String,
    fallback: u32,
}

impl CoerceNumeric {
    /// Creates the strategy for `column`.
    #[must_use]
    pub fn new(column: impl Into<String>, fallback: u32) -> Self {
        Self {
            column: column.into(),
            fallback,
        }
    }
}

impl ResultStrategy for CoerceNumeric {
    fn apply(&self, dataset: &Arc<Dataset>) -> TaskResult {
        let invalid = dataset.count_where(&self.column, |value| {
            value.as_text().is_some_and(|text| parse_number(text).is_null())
        });
        let (after, converted) = dataset.map_column(&self.column, |value| {
            value.as_text().map(|text| match parse_number(text) {
                CellValue::Null => CellValue::from(self.fallback),
                number => number,
            })
        });
        let noun = if invalid == 1 { "value" } else { "values" };
        TaskResult::new(
            converted,
            [
                format!("Converted '{}' column from mixed types to numeric", self.column),
                format!(
                    "Replaced {invalid} invalid {noun} with median value {}",
                    self.fallback
                ),
            ],
            Arc::clone(dataset),
            Arc::new(after),
        )
    }

    fn script(&self) -> String {
        let column = &self.column;
        format!(
            "# Convert {column} column to numeric type\n\
             df['{column}'] = pd.to_numeric(df['{column}'], errors='coerce')\n\
             df['{column}'] = df['{column}'].fillna(df['{column}'].median())"
        )
    }
}

fn capitalized(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Maps task identifiers to result strategies.
#[derive(Clone, Default)]
pub struct ResultStrategyRegistry {
    strategies: HashMap<String, Arc<dyn ResultStrategy>>,
}

impl fmt::Debug for ResultStrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("ResultStrategyRegistry")
            .field("strategies", &ids)
            .finish()
    }
}

impl ResultStrategyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in cleaning strategies.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            "handle_missing_values_target_audience",
            FillMissingText::new("target_audience", "General"),
        );
        registry.register(
            "handle_missing_values_impressions",
            FillMissingNumber::new("impressions", IMPRESSIONS_MEDIAN),
        );
        registry.register(
            "convert_data_type_budget",
            CoerceNumeric::new("budget", BUDGET_FALLBACK),
        );
        registry
    }

    /// Registers `strategy` for `task_id`, replacing any previous one.
    pub fn register(
        &mut self,
        task_id: impl Into<String>,
        strategy: impl ResultStrategy + 'static,
    ) -> &mut Self {
        self.strategies.insert(task_id.into(), Arc::new(strategy));
        self
    }

    /// Returns `true` when `task_id` has a strategy.
    #[must_use]
    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.strategies.contains_key(task_id.as_str())
    }

    /// Computes the result of `task_id` against `dataset`.
    #[must_use]
    pub fn compute(&self, task_id: &TaskId, dataset: &Arc<Dataset>) -> TaskResult {
        self.strategies
            .get(task_id.as_str())
            .map_or_else(|| TaskResult::unchanged(dataset), |strategy| strategy.apply(dataset))
    }

    /// Returns the script preview for `task_id`.
    #[must_use]
    pub fn script_for(&self, task_id: &TaskId) -> String {
        self.strategies.get(task_id.as_str()).map_or_else(
            || {
                format!(
                    "# Task code will be generated here\n\
                     # This is a placeholder for task: {task_id}"
                )
            },
            |strategy| strategy.script(),
        )
    }
}
