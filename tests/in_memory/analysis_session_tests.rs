//! In-memory integration tests for a full analysis session.

use std::sync::Arc;

use datrix::analysis::{
    adapters::memory::InMemoryDurableStorage,
    domain::{
        AnalysisHistoryEntry, AnalysisModel, AnalysisStatus, CustomTaskDefinition, GoalId,
        HistoryEntryId, ModelId, SetupTaskCategory,
    },
    services::{AnalysisStore, StoreConfig},
};
use datrix::workflow::{
    adapters::timer::ImmediateTicker,
    domain::{CellValue, CleaningBucket, Dataset, TaskState},
    services::{CustomTaskRequest, ProgressSimulator, TaskWorkflowEngine, WorkflowConfig},
};
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};

type TestStore = AnalysisStore<InMemoryDurableStorage, DefaultClock>;
type TestEngine = TaskWorkflowEngine<ImmediateTicker, DefaultClock>;

#[fixture]
fn storage() -> Arc<InMemoryDurableStorage> {
    Arc::new(InMemoryDurableStorage::new())
}

fn engine() -> TestEngine {
    TaskWorkflowEngine::new(
        Arc::new(ImmediateTicker),
        Arc::new(DefaultClock),
        Dataset::sample(),
    )
    .with_config(WorkflowConfig::fast())
    .with_progress(ProgressSimulator::seeded(11))
}

async fn load(storage: &Arc<InMemoryDurableStorage>) -> TestStore {
    AnalysisStore::load(
        Arc::clone(storage),
        Arc::new(DefaultClock),
        StoreConfig::default(),
    )
    .await
    .expect("store loads")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_run_is_recorded_and_survives_reload(storage: Arc<InMemoryDurableStorage>) {
    let store = load(&storage).await;
    let goal = GoalId::new("data-cleaning").expect("valid goal");
    store
        .set_current_goal(Some(goal.clone()))
        .await
        .expect("goal persisted");

    let engine = engine();
    engine
        .select_goal(store.current_goal().expect("goal read"))
        .expect("catalog built");
    engine.execute_all().await.expect("all tasks run");
    let dataset = engine.dataset().expect("dataset");
    assert_eq!(dataset.count_where("target_audience", CellValue::is_null), 0);

    let entry_id = HistoryEntryId::generate();
    let clock = DefaultClock;
    let entry = AnalysisHistoryEntry::new(
        entry_id.clone(),
        "Campaign cleanup",
        "campaigns.csv",
        AnalysisStatus::Completed,
        clock.utc(),
    )
    .expect("valid entry")
    .with_completed_at(clock.utc())
    .with_insights(13)
    .with_dimensions(10, 12);
    store.add_to_history(entry).await.expect("entry recorded");

    let reloaded = load(&storage).await;
    let history = reloaded.history().expect("history");
    assert_eq!(history.len(), 4);
    let demo_ids: Vec<&str> = history
        .iter()
        .take(3)
        .map(|entry| entry.id().as_str())
        .collect();
    assert_eq!(
        demo_ids,
        ["demo-marketing-1", "demo-marketing-2", "demo-marketing-3"]
    );
    let recorded = history.get(3).expect("recorded entry follows the demos");
    assert_eq!(recorded.id(), &entry_id);
    assert_eq!(recorded.insights(), 13);
    assert_eq!(recorded.data_rows(), 10);
    assert_eq!(reloaded.current_goal().expect("goal read"), Some(goal));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn saved_model_custom_tasks_rebuild_in_a_new_engine(storage: Arc<InMemoryDurableStorage>) {
    let store = load(&storage).await;
    let model_id = ModelId::new("model-cleanup").expect("valid id");
    let model = AnalysisModel::new(model_id.clone(), "Cleanup", DefaultClock.utc())
        .expect("valid model")
        .with_goals([GoalId::new("data-cleaning").expect("valid goal")])
        .with_custom_tasks([CustomTaskDefinition {
            id: "custom-1".to_owned(),
            column: "channel".to_owned(),
            description: "verify channel names".to_owned(),
            enabled: true,
            category: SetupTaskCategory::MissingValues,
        }]);
    store.save_model(model).await.expect("model saved");

    let saved = load(&storage)
        .await
        .get_model_by_id(&model_id)
        .expect("lookup")
        .expect("model persisted");
    let engine = engine();
    engine
        .select_goal(saved.goals().first().cloned())
        .expect("catalog built");
    for definition in saved.custom_tasks().unwrap_or_default() {
        engine
            .add_custom_task(CustomTaskRequest::new(
                &definition.column,
                &definition.description,
            ))
            .expect("custom task added");
    }

    let categories = engine.categories().expect("categories");
    let validation = categories
        .iter()
        .find(|category| category.id().as_str() == CleaningBucket::DataValidation.category_id())
        .expect("validation category");
    let custom = validation.tasks().last().expect("custom task");
    assert!(custom.id().is_custom());
    assert_eq!(custom.state(), TaskState::Pending);

    let run = engine.execute_task(custom.id()).await.expect("custom run");
    assert_eq!(run.result().map(|result| result.rows_affected()), Some(0));
}
