//! Analysis state service.
//!
//! Provides [`AnalysisStore`], the single source of truth for analysis
//! history, saved models, and the current goal. Every change is applied to
//! the in-memory state first and then written to [`DurableStorage`];
//! persistence of successive changes happens in the order they were made.

use super::StoreConfig;
use crate::analysis::{
    domain::{
        AnalysisDomainError, AnalysisHistoryEntry, AnalysisModel, GoalId, HistoryEntryId,
        HistoryFilter, HistoryStatusCounts, ModelId, demo_history, template_models,
    },
    ports::{DurableStorage, DurableStorageError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::sync::Mutex;

/// Service-level errors for analysis store operations.
#[derive(Debug, Error)]
pub enum AnalysisStoreError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AnalysisDomainError),
    /// Durable storage failed.
    #[error(transparent)]
    Storage(#[from] DurableStorageError),
    /// State could not be serialized for persistence.
    #[error("failed to serialize analysis state: {0}")]
    Serialization(#[from] serde_json::Error),
    /// A history entry with the same identifier already exists.
    #[error("duplicate history entry identifier: {0}")]
    DuplicateHistoryEntry(HistoryEntryId),
    /// No history entry has the given identifier.
    #[error("history entry {0} not found")]
    HistoryEntryNotFound(HistoryEntryId),
    /// No model has the given identifier.
    #[error("model {0} not found")]
    ModelNotFound(ModelId),
    /// The in-memory state lock was poisoned by a panicking writer.
    #[error("analysis state lock poisoned: {0}")]
    StatePoisoned(String),
}

/// Result type for analysis store operations.
pub type AnalysisStoreResult<T> = Result<T, AnalysisStoreError>;

#[derive(Debug, Default)]
struct StoreState {
    history: Vec<AnalysisHistoryEntry>,
    models: Vec<AnalysisModel>,
    current_goal: Option<GoalId>,
    current_analysis: Option<HistoryEntryId>,
}

/// Analysis history, model, and goal state service.
#[derive(Clone)]
pub struct AnalysisStore<S, C>
where
    S: DurableStorage,
    C: Clock + Send + Sync,
{
    storage: Arc<S>,
    clock: Arc<C>,
    config: Arc<StoreConfig>,
    state: Arc<RwLock<StoreState>>,
    write_order: Arc<Mutex<()>>,
}

impl<S, C> AnalysisStore<S, C>
where
    S: DurableStorage,
    C: Clock + Send + Sync,
{
    /// Loads the store from durable storage.
    ///
    /// Stored history is merged behind the demo entries, dropping any stored
    /// record that shares a demo identifier. Template models are seeded and
    /// persisted when no models are stored. Values that fail to parse are
    /// logged and treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisStoreError::Storage`] when reading or seeding the
    /// storage fails.
    pub async fn load(
        storage: Arc<S>,
        clock: Arc<C>,
        config: StoreConfig,
    ) -> AnalysisStoreResult<Self> {
        let stored_history: Option<Vec<AnalysisHistoryEntry>> =
            decode(&config.history_key, storage.get(&config.history_key).await?);
        let stored_models: Option<Vec<AnalysisModel>> =
            decode(&config.models_key, storage.get(&config.models_key).await?);
        let stored_goal = storage
            .get(&config.current_goal_key)
            .await?
            .and_then(|raw| GoalId::new(raw).ok());

        let history = merge_with_demo(stored_history.unwrap_or_default());
        let models_were_stored = stored_models.is_some();
        let models = stored_models.unwrap_or_else(|| template_models(clock.utc()));

        let store = Self {
            storage,
            clock,
            config: Arc::new(config),
            state: Arc::new(RwLock::new(StoreState {
                history,
                models,
                current_goal: stored_goal,
                current_analysis: None,
            })),
            write_order: Arc::new(Mutex::new(())),
        };

        if !models_were_stored {
            let models = store.read(|state| state.models.clone())?;
            store.persist_models(&models).await?;
        }
        Ok(store)
    }

    /// Returns the history, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisStoreError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn history(&self) -> AnalysisStoreResult<Vec<AnalysisHistoryEntry>> {
        self.read(|state| state.history.clone())
    }

    /// Returns history entries matching `filter`, preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisStoreError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn search_history(
        &self,
        filter: &HistoryFilter,
    ) -> AnalysisStoreResult<Vec<AnalysisHistoryEntry>> {
        self.read(|state| {
            state
                .history
                .iter()
                .filter(|entry| filter.matches(entry))
                .cloned()
                .collect()
        })
    }

    /// Counts history entries per status.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisStoreError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn history_status_counts(&self) -> AnalysisStoreResult<HistoryStatusCounts> {
        self.read(|state| HistoryStatusCounts::tally(&state.history))
    }

    /// Prepends an entry to the history.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisStoreError::DuplicateHistoryEntry`] when an entry
    /// with the same identifier exists, or a storage error when persisting
    /// fails.
    pub async fn add_to_history(&self, entry: AnalysisHistoryEntry) -> AnalysisStoreResult<()> {
        let _ordered = self.write_order.lock().await;
        let snapshot = self.write(|state| {
            if state.history.iter().any(|existing| existing.id() == entry.id()) {
                return Err(AnalysisStoreError::DuplicateHistoryEntry(entry.id().clone()));
            }
            state.history.insert(0, entry);
            Ok(state.history.clone())
        })??;
        self.persist_history(&snapshot).await
    }

    /// Marks a history entry completed with its final insight count.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisStoreError::HistoryEntryNotFound`] when no entry has
    /// the identifier, or a storage error when persisting fails.
    pub async fn complete_history_entry(
        &self,
        id: &HistoryEntryId,
        insights: u32,
        completed_at: DateTime<Utc>,
    ) -> AnalysisStoreResult<AnalysisHistoryEntry> {
        self.update_history_entry(id, |entry| entry.complete(insights, completed_at))
            .await
    }

    /// Marks a history entry failed.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisStoreError::HistoryEntryNotFound`] when no entry has
    /// the identifier, or a storage error when persisting fails.
    pub async fn fail_history_entry(
        &self,
        id: &HistoryEntryId,
        failed_at: DateTime<Utc>,
    ) -> AnalysisStoreResult<AnalysisHistoryEntry> {
        self.update_history_entry(id, |entry| entry.fail(failed_at))
            .await
    }

    async fn update_history_entry(
        &self,
        id: &HistoryEntryId,
        update: impl FnOnce(&mut AnalysisHistoryEntry),
    ) -> AnalysisStoreResult<AnalysisHistoryEntry> {
        let _ordered = self.write_order.lock().await;
        let (updated, snapshot) = self.write(|state| {
            let entry = state
                .history
                .iter_mut()
                .find(|entry| entry.id() == id)
                .ok_or_else(|| AnalysisStoreError::HistoryEntryNotFound(id.clone()))?;
            update(entry);
            let updated = entry.clone();
            Ok::<_, AnalysisStoreError>((updated, state.history.clone()))
        })??;
        self.persist_history(&snapshot).await?;
        Ok(updated)
    }

    /// Removes a history entry.
    ///
    /// Returns `false` without touching storage when the entry is absent.
    ///
    /// # Errors
    ///
    /// Returns a storage error when persisting fails.
    pub async fn delete_from_history(&self, id: &HistoryEntryId) -> AnalysisStoreResult<bool> {
        let _ordered = self.write_order.lock().await;
        let snapshot = self.write(|state| {
            let before = state.history.len();
            state.history.retain(|entry| entry.id() != id);
            if state.current_analysis.as_ref() == Some(id) {
                state.current_analysis = None;
            }
            (state.history.len() != before).then(|| state.history.clone())
        })?;
        match snapshot {
            Some(history) => {
                self.persist_history(&history).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Selects the history entry currently being viewed.
    ///
    /// The selection is session state and is never persisted.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisStoreError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn set_current_analysis(&self, id: Option<HistoryEntryId>) -> AnalysisStoreResult<()> {
        self.write(|state| state.current_analysis = id)
    }

    /// Returns the selected history entry, if it still exists.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisStoreError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn current_analysis(&self) -> AnalysisStoreResult<Option<AnalysisHistoryEntry>> {
        self.read(|state| {
            state.current_analysis.as_ref().and_then(|selected| {
                state
                    .history
                    .iter()
                    .find(|entry| entry.id() == selected)
                    .cloned()
            })
        })
    }

    /// Returns all models in display order.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisStoreError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn models(&self) -> AnalysisStoreResult<Vec<AnalysisModel>> {
        self.read(|state| state.models.clone())
    }

    /// Returns the built-in templates in display order.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisStoreError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn templates(&self) -> AnalysisStoreResult<Vec<AnalysisModel>> {
        self.models_where(AnalysisModel::is_template)
    }

    /// Returns the user-saved models in display order.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisStoreError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn user_models(&self) -> AnalysisStoreResult<Vec<AnalysisModel>> {
        self.models_where(|model| !model.is_template())
    }

    /// Returns models whose name or description contains `term`, templates
    /// first and user models after.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisStoreError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn search_models(&self, term: &str) -> AnalysisStoreResult<Vec<AnalysisModel>> {
        self.read(|state| {
            let (templates, user_models): (Vec<_>, Vec<_>) = state
                .models
                .iter()
                .filter(|model| model.matches_search(term))
                .cloned()
                .partition(AnalysisModel::is_template);
            templates.into_iter().chain(user_models).collect()
        })
    }

    /// Looks up a model by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisStoreError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn get_model_by_id(&self, id: &ModelId) -> AnalysisStoreResult<Option<AnalysisModel>> {
        self.read(|state| state.models.iter().find(|model| model.id() == id).cloned())
    }

    /// Saves a model, replacing an existing model with the same identifier
    /// in place or prepending it otherwise.
    ///
    /// # Errors
    ///
    /// Returns a storage error when persisting fails.
    pub async fn save_model(&self, model: AnalysisModel) -> AnalysisStoreResult<()> {
        let _ordered = self.write_order.lock().await;
        let snapshot = self.write(|state| {
            upsert_model(&mut state.models, model);
            state.models.clone()
        })?;
        self.persist_models(&snapshot).await
    }

    /// Saves a user-owned copy of a model under a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisStoreError::ModelNotFound`] when the source model is
    /// absent, or a storage error when persisting fails.
    pub async fn duplicate_model(&self, id: &ModelId) -> AnalysisStoreResult<AnalysisModel> {
        let source = self
            .get_model_by_id(id)?
            .ok_or_else(|| AnalysisStoreError::ModelNotFound(id.clone()))?;
        let copy = source.duplicate(ModelId::generate(), self.clock.utc());
        self.save_model(copy.clone()).await?;
        Ok(copy)
    }

    /// Removes a model.
    ///
    /// Returns `false` without touching storage when the model is absent.
    ///
    /// # Errors
    ///
    /// Returns a storage error when persisting fails.
    pub async fn delete_model(&self, id: &ModelId) -> AnalysisStoreResult<bool> {
        let _ordered = self.write_order.lock().await;
        let snapshot = self.write(|state| {
            let before = state.models.len();
            state.models.retain(|model| model.id() != id);
            (state.models.len() != before).then(|| state.models.clone())
        })?;
        match snapshot {
            Some(models) => {
                self.persist_models(&models).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Returns the current goal.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisStoreError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn current_goal(&self) -> AnalysisStoreResult<Option<GoalId>> {
        self.read(|state| state.current_goal.clone())
    }

    /// Updates the current goal. Clearing it removes the durable key.
    ///
    /// # Errors
    ///
    /// Returns a storage error when persisting fails.
    pub async fn set_current_goal(&self, goal: Option<GoalId>) -> AnalysisStoreResult<()> {
        let _ordered = self.write_order.lock().await;
        self.write(|state| state.current_goal.clone_from(&goal))?;
        let key = &self.config.current_goal_key;
        match goal {
            Some(value) => self.storage.set(key, value.as_str()).await?,
            None => self.storage.remove(key).await?,
        }
        tracing::debug!(key = %key, "persisted current goal");
        Ok(())
    }

    fn models_where(
        &self,
        predicate: impl Fn(&AnalysisModel) -> bool,
    ) -> AnalysisStoreResult<Vec<AnalysisModel>> {
        self.read(|state| {
            state
                .models
                .iter()
                .filter(|&model| predicate(model))
                .cloned()
                .collect()
        })
    }

    async fn persist_history(&self, history: &[AnalysisHistoryEntry]) -> AnalysisStoreResult<()> {
        let persisted: Vec<&AnalysisHistoryEntry> =
            history.iter().filter(|entry| !entry.is_demo()).collect();
        let payload = serde_json::to_string(&persisted)?;
        self.storage
            .set(&self.config.history_key, &payload)
            .await?;
        tracing::debug!(
            key = %self.config.history_key,
            entries = persisted.len(),
            "persisted analysis history"
        );
        Ok(())
    }

    async fn persist_models(&self, models: &[AnalysisModel]) -> AnalysisStoreResult<()> {
        let payload = serde_json::to_string(models)?;
        self.storage.set(&self.config.models_key, &payload).await?;
        tracing::debug!(
            key = %self.config.models_key,
            models = models.len(),
            "persisted analysis models"
        );
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> AnalysisStoreResult<T> {
        let state = self
            .state
            .read()
            .map_err(|err| AnalysisStoreError::StatePoisoned(err.to_string()))?;
        Ok(f(&state))
    }

    fn write<T>(&self, f: impl FnOnce(&mut StoreState) -> T) -> AnalysisStoreResult<T> {
        let mut state = self
            .state
            .write()
            .map_err(|err| AnalysisStoreError::StatePoisoned(err.to_string()))?;
        Ok(f(&mut state))
    }
}

/// Parses a stored JSON value, treating malformed content as absent.
fn decode<T: DeserializeOwned>(key: &str, raw: Option<String>) -> Option<T> {
    let text = raw?;
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "ignoring malformed stored analysis state");
            None
        }
    }
}

/// Places demo entries first, followed by stored entries not shadowed by a
/// demo identifier.
fn merge_with_demo(stored: Vec<AnalysisHistoryEntry>) -> Vec<AnalysisHistoryEntry> {
    let demo = demo_history();
    let demo_ids: HashSet<HistoryEntryId> = demo.iter().map(|entry| entry.id().clone()).collect();
    demo.into_iter()
        .chain(
            stored
                .into_iter()
                .filter(|entry| !demo_ids.contains(entry.id())),
        )
        .collect()
}

fn upsert_model(models: &mut Vec<AnalysisModel>, model: AnalysisModel) {
    match models.iter_mut().find(|existing| existing.id() == model.id()) {
        Some(existing) => *existing = model,
        None => models.insert(0, model),
    }
}
