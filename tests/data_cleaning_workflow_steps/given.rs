//! Given steps for data cleaning workflow BDD scenarios.

use super::world::{WorkflowWorld, sample_engine};
use datrix::analysis::domain::GoalId;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given("a workflow engine over the sample campaign dataset")]
fn engine_over_sample(world: &mut WorkflowWorld) {
    world.engine = Some(sample_engine());
}

#[given(r#"the goal "{goal}" has been selected"#)]
fn goal_has_been_selected(world: &mut WorkflowWorld, goal: String) -> Result<(), eyre::Report> {
    let goal_id = GoalId::new(goal).wrap_err("parse goal for scenario setup")?;
    world
        .engine()?
        .select_goal(Some(goal_id))
        .wrap_err("select goal in scenario setup")?;
    Ok(())
}
