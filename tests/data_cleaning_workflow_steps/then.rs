//! Then steps for data cleaning workflow BDD scenarios.

use super::world::WorkflowWorld;
use datrix::workflow::{
    domain::{CellValue, TaskState},
    services::WorkflowError,
};
use rstest_bdd_macros::then;

#[then(r#"the categories are "{expected}""#)]
fn categories_are(world: &WorkflowWorld, expected: String) -> Result<(), eyre::Report> {
    let ids: Vec<String> = world
        .engine()?
        .categories()?
        .iter()
        .map(|category| category.id().to_string())
        .collect();
    let wanted: Vec<&str> = expected.split(", ").collect();
    eyre::ensure!(ids == wanted, "expected categories {wanted:?}, found {ids:?}");
    Ok(())
}

#[then("every task is pending")]
fn every_task_is_pending(world: &WorkflowWorld) -> Result<(), eyre::Report> {
    let categories = world.engine()?.categories()?;
    let pending = categories
        .iter()
        .flat_map(|category| category.tasks())
        .all(|task| task.state() == TaskState::Pending && task.progress() == 0);
    eyre::ensure!(pending, "expected every task to be pending");
    Ok(())
}

#[then("the task is completed with {rows:u64} affected rows")]
fn task_completed_with_rows(world: &WorkflowWorld, rows: u64) -> Result<(), eyre::Report> {
    let task = world
        .last_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing executed task"))?;
    eyre::ensure!(
        task.state() == TaskState::Completed,
        "expected completed task, found {}",
        task.state().as_str()
    );
    let affected = task
        .result()
        .map(|result| result.rows_affected())
        .ok_or_else(|| eyre::eyre!("completed task has no result"))?;
    eyre::ensure!(affected == rows, "expected {rows} affected rows, found {affected}");
    Ok(())
}

#[then("the task result lists {count:usize} changes")]
fn task_result_lists_changes(world: &WorkflowWorld, count: usize) -> Result<(), eyre::Report> {
    let changes = world
        .last_task
        .as_ref()
        .and_then(|task| task.result())
        .map(|result| result.changes().len())
        .ok_or_else(|| eyre::eyre!("missing task result"))?;
    eyre::ensure!(changes == count, "expected {count} changes, found {changes}");
    Ok(())
}

#[then(r#"no "{column}" value is missing"#)]
fn no_value_is_missing(world: &WorkflowWorld, column: String) -> Result<(), eyre::Report> {
    let missing = world
        .engine()?
        .dataset()?
        .count_where(&column, CellValue::is_null);
    eyre::ensure!(missing == 0, "{missing} '{column}' values are still missing");
    Ok(())
}

#[then("all tasks are reported complete")]
fn all_tasks_reported_complete(world: &WorkflowWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.engine()?.all_tasks_completed()?,
        "expected the all-tasks-completed flag"
    );
    Ok(())
}

#[then(r#"the category "{category}" holds {count:usize} tasks"#)]
fn category_holds_tasks(
    world: &WorkflowWorld,
    category: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let categories = world.engine()?.categories()?;
    let found = categories
        .iter()
        .find(|candidate| candidate.id().as_str() == category)
        .ok_or_else(|| eyre::eyre!("category {category} not found"))?;
    let held = found.tasks().len();
    eyre::ensure!(held == count, "expected {count} tasks in {category}, found {held}");
    Ok(())
}

#[then(r#"the last category is "{category}""#)]
fn last_category_is(world: &WorkflowWorld, category: String) -> Result<(), eyre::Report> {
    let categories = world.engine()?.categories()?;
    let last = categories
        .last()
        .ok_or_else(|| eyre::eyre!("catalog is empty"))?;
    eyre::ensure!(
        last.id().as_str() == category,
        "expected last category {category}, found {}",
        last.id()
    );
    Ok(())
}

#[then("the custom task is rejected")]
fn custom_task_is_rejected(world: &WorkflowWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        matches!(world.last_error, Some(WorkflowError::InvalidCustomTask(_))),
        "expected an invalid custom task error, got {:?}",
        world.last_error
    );
    Ok(())
}
