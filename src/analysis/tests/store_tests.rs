//! Service tests for loading, mutating, and persisting analysis state.

use std::sync::Arc;

use crate::analysis::{
    adapters::memory::InMemoryDurableStorage,
    domain::{
        AnalysisHistoryEntry, AnalysisModel, AnalysisStatus, GoalId, HistoryEntryId,
        HistoryFilter, ModelId,
    },
    ports::DurableStorage,
    services::{AnalysisStore, AnalysisStoreError, StoreConfig},
};
use chrono::Utc;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestStore = AnalysisStore<InMemoryDurableStorage, DefaultClock>;

#[fixture]
fn storage() -> InMemoryDurableStorage {
    InMemoryDurableStorage::new()
}

async fn load(storage: &InMemoryDurableStorage) -> TestStore {
    AnalysisStore::load(
        Arc::new(storage.clone()),
        Arc::new(DefaultClock),
        StoreConfig::default(),
    )
    .await
    .expect("store should load")
}

fn user_entry(id: &str) -> AnalysisHistoryEntry {
    AnalysisHistoryEntry::new(
        HistoryEntryId::new(id).expect("valid id"),
        format!("Analysis {id}"),
        format!("{id}.csv"),
        AnalysisStatus::Completed,
        Utc::now(),
    )
    .expect("valid entry")
}

fn user_model(id: &str, name: &str) -> AnalysisModel {
    AnalysisModel::new(ModelId::new(id).expect("valid id"), name, Utc::now()).expect("valid model")
}

fn ids(history: &[AnalysisHistoryEntry]) -> Vec<String> {
    history.iter().map(|entry| entry.id().to_string()).collect()
}

fn model_ids(models: &[AnalysisModel]) -> Vec<String> {
    models.iter().map(|model| model.id().to_string()).collect()
}

async fn stored_history_ids(storage: &InMemoryDurableStorage) -> Vec<String> {
    let raw = storage
        .get("datrix-history")
        .await
        .expect("storage read")
        .expect("history persisted");
    let stored: Vec<AnalysisHistoryEntry> = serde_json::from_str(&raw).expect("valid json");
    ids(&stored)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn first_load_seeds_demo_history_and_templates(storage: InMemoryDurableStorage) {
    let store = load(&storage).await;

    let history = store.history().expect("history");
    assert_eq!(
        ids(&history),
        ["demo-marketing-1", "demo-marketing-2", "demo-marketing-3"]
    );
    let models = store.models().expect("models");
    assert_eq!(model_ids(&models), ["marketing-template", "sales-template"]);
    assert!(
        storage
            .get("datrix-models")
            .await
            .expect("storage read")
            .is_some(),
        "seeded templates are persisted immediately"
    );
    assert_eq!(store.current_goal().expect("goal"), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stored_history_is_merged_behind_demo_entries(storage: InMemoryDurableStorage) {
    let mut shadowing = user_entry("demo-marketing-2");
    shadowing.complete(999, Utc::now());
    let stored = vec![user_entry("run-7"), shadowing];
    storage
        .set(
            "datrix-history",
            &serde_json::to_string(&stored).expect("serializable"),
        )
        .await
        .expect("seed storage");

    let store = load(&storage).await;
    let history = store.history().expect("history");

    assert_eq!(
        ids(&history),
        [
            "demo-marketing-1",
            "demo-marketing-2",
            "demo-marketing-3",
            "run-7"
        ]
    );
    let demo_two = history
        .iter()
        .find(|entry| entry.id().as_str() == "demo-marketing-2")
        .expect("demo entry");
    assert_eq!(demo_two.insights(), 24, "demo record wins over stored copy");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn demo_entries_survive_reload_without_duplication(storage: InMemoryDurableStorage) {
    let store = load(&storage).await;
    store
        .add_to_history(user_entry("run-1"))
        .await
        .expect("add entry");

    let reloaded = load(&storage).await;
    let reloaded_again = load(&storage).await;

    assert_eq!(
        ids(&reloaded_again.history().expect("history")),
        [
            "demo-marketing-1",
            "demo-marketing-2",
            "demo-marketing-3",
            "run-1"
        ]
    );
    assert_eq!(
        reloaded.history().expect("history"),
        reloaded_again.history().expect("history")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_to_history_prepends_and_persists_without_demo_entries(
    storage: InMemoryDurableStorage,
) {
    let store = load(&storage).await;

    store
        .add_to_history(user_entry("run-1"))
        .await
        .expect("first add");
    store
        .add_to_history(user_entry("run-2"))
        .await
        .expect("second add");

    let history = store.history().expect("history");
    assert_eq!(
        ids(&history).first().map(String::as_str),
        Some("run-2"),
        "most recent entry comes first"
    );
    assert_eq!(stored_history_ids(&storage).await, ["run-2", "run-1"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_to_history_rejects_duplicate_identifier(storage: InMemoryDurableStorage) {
    let store = load(&storage).await;
    store
        .add_to_history(user_entry("run-1"))
        .await
        .expect("first add");

    let result = store.add_to_history(user_entry("run-1")).await;

    assert!(matches!(
        result,
        Err(AnalysisStoreError::DuplicateHistoryEntry(ref id)) if id.as_str() == "run-1"
    ));
    assert_eq!(store.history().expect("history").len(), 4);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_from_history_is_a_noop_for_missing_entries(storage: InMemoryDurableStorage) {
    let store = load(&storage).await;
    let missing = HistoryEntryId::new("missing").expect("valid id");

    let removed = store
        .delete_from_history(&missing)
        .await
        .expect("delete succeeds");

    assert!(!removed);
    assert_eq!(store.history().expect("history").len(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_from_history_removes_entry_and_clears_selection(
    storage: InMemoryDurableStorage,
) {
    let store = load(&storage).await;
    let entry = user_entry("run-1");
    let id = entry.id().clone();
    store.add_to_history(entry).await.expect("add entry");
    store
        .set_current_analysis(Some(id.clone()))
        .expect("select entry");
    assert!(store.current_analysis().expect("selection").is_some());

    let removed = store.delete_from_history(&id).await.expect("delete");

    assert!(removed);
    assert_eq!(store.current_analysis().expect("selection"), None);
    assert!(stored_history_ids(&storage).await.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn complete_history_entry_updates_status_and_persists(storage: InMemoryDurableStorage) {
    let store = load(&storage).await;
    let running = AnalysisHistoryEntry::new(
        HistoryEntryId::new("run-9").expect("valid id"),
        "Live run",
        "live.csv",
        AnalysisStatus::Processing,
        Utc::now(),
    )
    .expect("valid entry");
    store.add_to_history(running).await.expect("add entry");

    let completed = store
        .complete_history_entry(
            &HistoryEntryId::new("run-9").expect("valid id"),
            12,
            Utc::now(),
        )
        .await
        .expect("complete entry");

    assert_eq!(completed.status(), AnalysisStatus::Completed);
    let reloaded = load(&storage).await;
    let counts = reloaded.history_status_counts().expect("counts");
    assert_eq!(counts.completed, 4);
    assert_eq!(counts.processing, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fail_history_entry_marks_failed_and_persists(storage: InMemoryDurableStorage) {
    let store = load(&storage).await;
    let id = HistoryEntryId::new("run-10").expect("valid id");
    let running = AnalysisHistoryEntry::new(
        id.clone(),
        "Interrupted run",
        "live.csv",
        AnalysisStatus::Processing,
        Utc::now(),
    )
    .expect("valid entry");
    store.add_to_history(running).await.expect("add entry");

    let failed = store
        .fail_history_entry(&id, Utc::now())
        .await
        .expect("fail entry");

    assert_eq!(failed.status(), AnalysisStatus::Failed);
    assert!(failed.completed_at().is_some());
    let reloaded = load(&storage).await;
    let counts = reloaded.history_status_counts().expect("counts");
    assert_eq!(counts.failed, 1);
    assert_eq!(counts.processing, 0);
    assert!(matches!(
        store
            .fail_history_entry(&HistoryEntryId::new("missing").expect("valid id"), Utc::now())
            .await,
        Err(AnalysisStoreError::HistoryEntryNotFound(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_model_upserts_in_place_or_prepends(storage: InMemoryDurableStorage) {
    let store = load(&storage).await;

    store
        .save_model(user_model("model-a", "First"))
        .await
        .expect("save new");
    store
        .save_model(user_model("model-b", "Second"))
        .await
        .expect("save new");
    store
        .save_model(user_model("model-a", "First, revised"))
        .await
        .expect("save existing");

    let models = store.models().expect("models");
    assert_eq!(
        model_ids(&models),
        ["model-b", "model-a", "marketing-template", "sales-template"]
    );
    let revised = store
        .get_model_by_id(&ModelId::new("model-a").expect("valid id"))
        .expect("lookup")
        .expect("model present");
    assert_eq!(revised.name(), "First, revised");

    let reloaded = load(&storage).await;
    assert_eq!(model_ids(&reloaded.models().expect("models")), model_ids(&models));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_model_removes_model_and_ignores_missing(storage: InMemoryDurableStorage) {
    let store = load(&storage).await;
    let template_id = ModelId::new("sales-template").expect("valid id");

    assert!(store.delete_model(&template_id).await.expect("delete"));
    assert!(!store.delete_model(&template_id).await.expect("delete again"));
    assert_eq!(store.get_model_by_id(&template_id).expect("lookup"), None);

    let reloaded = load(&storage).await;
    assert_eq!(
        model_ids(&reloaded.models().expect("models")),
        ["marketing-template"],
        "a stored model list is never reseeded"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_model_prepends_user_copy(storage: InMemoryDurableStorage) {
    let store = load(&storage).await;
    let template_id = ModelId::new("marketing-template").expect("valid id");

    let copy = store
        .duplicate_model(&template_id)
        .await
        .expect("duplicate");

    let models = store.models().expect("models");
    assert_eq!(models.first(), Some(&copy));
    assert_eq!(store.templates().expect("templates").len(), 2);
    assert_eq!(store.user_models().expect("user models"), vec![copy]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_model_reports_missing_source(storage: InMemoryDurableStorage) {
    let store = load(&storage).await;

    let result = store
        .duplicate_model(&ModelId::new("nope").expect("valid id"))
        .await;

    assert!(matches!(result, Err(AnalysisStoreError::ModelNotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_models_lists_templates_before_user_models(storage: InMemoryDurableStorage) {
    let store = load(&storage).await;
    store
        .save_model(
            user_model("model-x", "Campaign deep dive").with_description("marketing follow-up"),
        )
        .await
        .expect("save");

    let found = store.search_models("MARKETING").expect("search");

    assert_eq!(model_ids(&found), ["marketing-template", "model-x"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_history_filters_by_term_and_status(storage: InMemoryDurableStorage) {
    let store = load(&storage).await;

    let social = store
        .search_history(
            &HistoryFilter::new()
                .with_search_term("social")
                .with_status(AnalysisStatus::Completed),
        )
        .expect("search");
    let failed = store
        .search_history(&HistoryFilter::new().with_status(AnalysisStatus::Failed))
        .expect("search");

    assert_eq!(ids(&social), ["demo-marketing-3"]);
    assert!(failed.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clearing_current_goal_removes_durable_key(storage: InMemoryDurableStorage) {
    let store = load(&storage).await;
    let goal = GoalId::new("data-cleaning").expect("valid goal");

    store
        .set_current_goal(Some(goal.clone()))
        .await
        .expect("set goal");
    assert_eq!(
        storage
            .get("datrix-current-goal")
            .await
            .expect("storage read")
            .as_deref(),
        Some("data-cleaning")
    );
    assert_eq!(load(&storage).await.current_goal().expect("goal"), Some(goal));

    store.set_current_goal(None).await.expect("clear goal");

    assert_eq!(
        storage.get("datrix-current-goal").await.expect("storage read"),
        None
    );
    assert_eq!(load(&storage).await.current_goal().expect("goal"), None);
}

#[rstest]
#[case("datrix-history", "{not json")]
#[case("datrix-history", r#"{"id": "object-not-array"}"#)]
#[case("datrix-models", "[1, 2, 3]")]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_stored_values_fall_back_to_seed_data(
    #[case] key: &str,
    #[case] payload: &str,
) {
    let storage = InMemoryDurableStorage::with_entries([(key, payload)]);

    let store = load(&storage).await;

    assert_eq!(store.history().expect("history").len(), 3);
    assert_eq!(store.templates().expect("templates").len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blank_stored_goal_is_treated_as_absent() {
    let storage = InMemoryDurableStorage::with_entries([("datrix-current-goal", "  ")]);

    let store = load(&storage).await;

    assert_eq!(store.current_goal().expect("goal"), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn custom_key_prefix_isolates_state(storage: InMemoryDurableStorage) {
    let store = AnalysisStore::load(
        Arc::new(storage.clone()),
        Arc::new(DefaultClock),
        StoreConfig::with_prefix("tenant-a"),
    )
    .await
    .expect("store should load");
    store
        .set_current_goal(Some(GoalId::new("analyzing").expect("valid goal")))
        .await
        .expect("set goal");

    assert!(
        storage
            .get("tenant-a-current-goal")
            .await
            .expect("storage read")
            .is_some()
    );
    assert_eq!(load(&storage).await.current_goal().expect("goal"), None);
}
