//! Runs a goal's task workflow over the sample campaign dataset and records
//! the run in the analysis history.
//!
//! Usage:
//!
//! ```text
//! datrix <storage-dir> [goal]
//! ```
//!
//! `storage-dir` holds the durable analysis state and is created when
//! missing. `goal` defaults to the stored current goal, or `data-cleaning`
//! when none is stored. Log verbosity follows `RUST_LOG` and defaults to
//! `info`.

use std::env;
use std::sync::Arc;

use camino::Utf8PathBuf;
use datrix::analysis::{
    adapters::fs::FileDurableStorage,
    domain::{
        AnalysisDomainError, AnalysisHistoryEntry, AnalysisStatus, GoalId, HistoryEntryId,
    },
    ports::DurableStorageError,
    services::{AnalysisStore, AnalysisStoreError, StoreConfig},
};
use datrix::workflow::{
    adapters::timer::IntervalTicker,
    domain::Dataset,
    services::{TaskWorkflowEngine, WorkflowConfig, WorkflowError},
};
use mockable::{Clock, DefaultClock};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

const DEFAULT_GOAL: &str = "data-cleaning";

#[derive(Debug, Error)]
enum CliError {
    #[error("usage: datrix <storage-dir> [goal]")]
    Usage,
    #[error(transparent)]
    Storage(#[from] DurableStorageError),
    #[error(transparent)]
    Analysis(#[from] AnalysisStoreError),
    #[error(transparent)]
    Domain(#[from] AnalysisDomainError),
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

struct CliArgs {
    storage_dir: Utf8PathBuf,
    goal: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, CliError> {
    let storage_dir = args.next().map(Utf8PathBuf::from).ok_or(CliError::Usage)?;
    let goal = args.next();
    if args.next().is_some() {
        return Err(CliError::Usage);
    }
    Ok(CliArgs { storage_dir, goal })
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = parse_args(env::args().skip(1))?;
    let clock = Arc::new(DefaultClock);
    let storage = Arc::new(FileDurableStorage::open(&args.storage_dir)?);
    let store = AnalysisStore::load(storage, Arc::clone(&clock), StoreConfig::default()).await?;

    let goal = match args.goal {
        Some(raw) => GoalId::new(raw)?,
        None => match store.current_goal()? {
            Some(stored) => stored,
            None => GoalId::new(DEFAULT_GOAL)?,
        },
    };
    store.set_current_goal(Some(goal.clone())).await?;

    let config = WorkflowConfig::default();
    let dataset = Dataset::sample();
    let rows = u64::try_from(dataset.len()).unwrap_or(u64::MAX);
    let columns = u32::try_from(dataset.columns().len()).unwrap_or(u32::MAX);
    let engine = TaskWorkflowEngine::new(
        Arc::new(IntervalTicker::new(config.tick_interval())),
        Arc::clone(&clock),
        dataset,
    )
    .with_config(config);
    engine.select_goal(Some(goal.clone()))?;

    let entry_id = HistoryEntryId::generate();
    let entry = AnalysisHistoryEntry::new(
        entry_id.clone(),
        format!("Workflow run: {goal}"),
        "sample-campaigns.csv",
        AnalysisStatus::Processing,
        clock.utc(),
    )?
    .with_dimensions(rows, columns);
    store.add_to_history(entry).await?;
    store.set_current_analysis(Some(entry_id.clone()))?;

    let outcome = engine.execute_all().await;
    engine.shutdown()?;
    if let Err(err) = outcome {
        store.fail_history_entry(&entry_id, clock.utc()).await?;
        tracing::warn!(entry = %entry_id, error = %err, "workflow run failed");
        return Err(err.into());
    }

    let insights = engine
        .categories()?
        .iter()
        .map(|category| category.tasks().len())
        .sum::<usize>();
    let completed = store
        .complete_history_entry(
            &entry_id,
            u32::try_from(insights).unwrap_or(u32::MAX),
            clock.utc(),
        )
        .await?;
    tracing::info!(
        entry = %completed.id(),
        goal = %goal,
        tasks = insights,
        insights = completed.insights(),
        "recorded workflow run"
    );
    Ok(())
}
