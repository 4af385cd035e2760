//! When steps for data cleaning workflow BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use datrix::analysis::domain::GoalId;
use datrix::workflow::{domain::TaskId, services::CustomTaskRequest};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"the goal "{goal}" is selected"#)]
fn goal_is_selected(world: &mut WorkflowWorld, goal: String) -> Result<(), eyre::Report> {
    let goal_id = GoalId::new(goal).wrap_err("parse goal")?;
    world
        .engine()?
        .select_goal(Some(goal_id))
        .wrap_err("select goal")?;
    Ok(())
}

#[when(r#"the task "{task_id}" is executed"#)]
fn task_is_executed(world: &mut WorkflowWorld, task_id: String) -> Result<(), eyre::Report> {
    let id = TaskId::new(task_id).wrap_err("parse task id")?;
    let task = run_async(world.engine()?.execute_task(&id)).wrap_err("execute task")?;
    world.last_task = Some(task);
    Ok(())
}

#[when("every task is executed")]
fn every_task_is_executed(world: &mut WorkflowWorld) -> Result<(), eyre::Report> {
    run_async(world.engine()?.execute_all()).wrap_err("execute all tasks")?;
    Ok(())
}

#[when(r#"a custom task "{description}" is added for column "{column}""#)]
fn custom_task_is_added(
    world: &mut WorkflowWorld,
    description: String,
    column: String,
) -> Result<(), eyre::Report> {
    let result = world
        .engine()?
        .add_custom_task(CustomTaskRequest::new(column, description));
    match result {
        Ok(task) => world.last_task = Some(task),
        Err(err) => world.last_error = Some(err),
    }
    Ok(())
}
