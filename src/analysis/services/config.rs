//! Configuration for the analysis store.

use serde::Deserialize;

/// Durable storage key names used by the analysis store.
///
/// # Examples
///
/// ```
/// use datrix::analysis::services::StoreConfig;
///
/// let config = StoreConfig::default();
/// assert_eq!(config.history_key, "datrix-history");
///
/// let scoped = StoreConfig::with_prefix("tenant-a");
/// assert_eq!(scoped.models_key, "tenant-a-models");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Key holding the serialized non-demo history array.
    pub history_key: String,
    /// Key holding the serialized model array.
    pub models_key: String,
    /// Key holding the plain-string current goal.
    pub current_goal_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::with_prefix("datrix")
    }
}

impl StoreConfig {
    /// Derives all three key names from a common prefix.
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            history_key: format!("{prefix}-history"),
            models_key: format!("{prefix}-models"),
            current_goal_key: format!("{prefix}-current-goal"),
        }
    }
}
