//! Domain tests for tasks, categories, cells, catalogs, and classification.

use crate::analysis::domain::SetupTaskCategory;
use crate::workflow::domain::{
    CategoryStatus, CellValue, CleaningBucket, ColumnKind, Dataset, TaskEdit, TaskId,
    TaskResult, TaskState, WorkflowDomainError, WorkflowTask, catalog_for_goal,
    classify_goal_setup_task, is_iso_date,
};
use rand::{SeedableRng, rngs::StdRng};
use rstest::rstest;
use std::sync::Arc;

fn custom_task(description: &str) -> WorkflowTask {
    WorkflowTask::custom(
        TaskId::custom("budget", 1_700_000_000_000),
        CleaningBucket::classify(description),
        "budget",
        description,
    )
    .expect("valid custom task")
}

#[rstest]
#[case("pending", TaskState::Pending)]
#[case("todo", TaskState::Pending)]
#[case(" Running ", TaskState::Running)]
#[case("COMPLETED", TaskState::Completed)]
#[case("error", TaskState::Error)]
fn task_state_parses_both_legacy_spellings(#[case] input: &str, #[case] expected: TaskState) {
    assert_eq!(TaskState::try_from(input), Ok(expected));
}

#[rstest]
fn task_state_rejects_unknown_values() {
    let err = TaskState::try_from("paused").expect_err("unknown state should fail");
    assert_eq!(err.0, "paused");
}

#[rstest]
fn serialized_task_exposes_status_and_process_from_one_state() {
    let mut task = custom_task("check budget range");
    let pending = serde_json::to_value(&task).expect("serializable");
    task.start();
    let running = serde_json::to_value(&task).expect("serializable");

    assert_eq!(pending["status"], "pending");
    assert_eq!(pending["process"], "todo");
    assert_eq!(running["status"], "running");
    assert_eq!(running["process"], "running");
}

#[rstest]
fn custom_task_name_keeps_first_thirty_characters() {
    let task = custom_task("Detect extreme spending anomalies across every campaign");

    assert_eq!(task.name(), "Custom: Detect extreme spending anomal...");
    assert_eq!(task.category(), "outlier detection");
    assert_eq!(task.details(), "User-defined task");
    assert!(task.id().is_custom());
}

#[rstest]
#[case("", "fill gaps", WorkflowDomainError::EmptyTaskColumn)]
#[case("budget", "   ", WorkflowDomainError::EmptyTaskDescription)]
fn custom_task_rejects_blank_inputs(
    #[case] column: &str,
    #[case] description: &str,
    #[case] expected: WorkflowDomainError,
) {
    let result = WorkflowTask::custom(
        TaskId::custom(column, 1),
        CleaningBucket::MissingValues,
        column,
        description,
    );

    assert_eq!(result, Err(expected));
}

#[rstest]
fn advance_clamps_progress_at_one_hundred() {
    let mut task = custom_task("fill nulls");
    task.start();

    assert_eq!(task.advance(30), 30);
    assert_eq!(task.advance(30), 60);
    assert_eq!(task.advance(30), 90);
    assert_eq!(task.advance(30), 100);
    assert_eq!(task.advance(u8::MAX), 100);
}

#[rstest]
fn restarting_a_completed_task_discards_the_previous_outcome() {
    let dataset = Arc::new(Dataset::sample());
    let mut task = custom_task("fill nulls");
    task.start();
    task.complete(TaskResult::unchanged(&dataset), None);
    assert_eq!(task.state(), TaskState::Completed);

    task.start();

    assert_eq!(task.state(), TaskState::Running);
    assert_eq!(task.progress(), 0);
    assert!(task.result().is_none());
}

#[rstest]
fn task_edit_ignores_blank_fields() {
    let mut task = custom_task("fill nulls");

    task.apply_edit(
        &TaskEdit::new()
            .with_description("Impute budgets with the median")
            .with_column("  ")
            .with_details("edited"),
    );

    assert_eq!(task.description(), "Impute budgets with the median");
    assert_eq!(task.column(), "budget");
    assert_eq!(task.details(), "edited");
}

#[rstest]
fn data_cleaning_catalog_has_fixed_categories_and_tasks() {
    let catalog = catalog_for_goal("data-cleaning");

    let shape: Vec<(String, usize)> = catalog
        .iter()
        .map(|category| (category.id().to_string(), category.tasks().len()))
        .collect();
    assert_eq!(
        shape,
        [
            ("missing-values".to_owned(), 3),
            ("data-types".to_owned(), 3),
            ("duplicates".to_owned(), 1),
            ("outliers".to_owned(), 3),
            ("validation".to_owned(), 3),
        ]
    );
    let first = catalog
        .first()
        .and_then(|category| category.tasks().first())
        .expect("first task");
    assert_eq!(first.id().as_str(), "handle_missing_values_target_audience");
    assert_eq!(first.column(), "target_audience");
    assert_eq!(first.category(), "missing values");
    assert_eq!(first.details(), "156 missing values detected");
    assert!(
        catalog
            .iter()
            .flat_map(|category| category.tasks())
            .all(|task| task.state() == TaskState::Pending && task.progress() == 0)
    );
}

#[rstest]
#[case("modeling", 6)]
#[case("predictive-modeling", 6)]
#[case("analyzing", 1)]
#[case("visualizing", 1)]
#[case("unknown-goal", 0)]
#[case("", 0)]
fn catalog_size_depends_on_goal(#[case] goal: &str, #[case] categories: usize) {
    assert_eq!(catalog_for_goal(goal).len(), categories);
}

#[rstest]
fn category_status_aggregates_task_states() {
    let dataset = Arc::new(Dataset::sample());
    let mut category = catalog_for_goal("analyzing")
        .into_iter()
        .next()
        .expect("analyzing has one category");
    let id = TaskId::new("analyze_budget_distribution").expect("valid id");
    assert_eq!(category.status(), CategoryStatus::Pending);

    category.task_mut(&id).expect("task present").start();
    assert_eq!(category.status(), CategoryStatus::Running);

    category
        .task_mut(&id)
        .expect("task present")
        .complete(TaskResult::unchanged(&dataset), None);
    assert_eq!(category.status(), CategoryStatus::Completed);
}

#[rstest]
fn empty_category_is_pending() {
    let category = crate::workflow::domain::TaskCategory::for_bucket(CleaningBucket::DataValidation);

    assert!(category.tasks().is_empty());
    assert_eq!(category.status(), CategoryStatus::Pending);
    assert_eq!(category.description(), "Custom Data Validation tasks");
}

#[rstest]
#[case("Fill the NULL audience", CleaningBucket::MissingValues)]
#[case("convert to integer", CleaningBucket::DataTypeConversion)]
#[case("standardize channel casing", CleaningBucket::DataTypeConversion)]
#[case("remove duplicate rows", CleaningBucket::DuplicateRemoval)]
#[case("flag anomalous spend", CleaningBucket::OutlierDetection)]
#[case("verify click totals", CleaningBucket::DataValidation)]
#[case("check for missing dates", CleaningBucket::MissingValues)]
#[case("something else entirely", CleaningBucket::MissingValues)]
fn processing_classification_uses_first_matching_group(
    #[case] description: &str,
    #[case] expected: CleaningBucket,
) {
    assert_eq!(CleaningBucket::classify(description), expected);
}

#[rstest]
#[case("standardize channel casing", SetupTaskCategory::Formatting)]
#[case("normalize spend", SetupTaskCategory::Formatting)]
#[case("clean up names", SetupTaskCategory::Formatting)]
#[case("parse dates", SetupTaskCategory::DataTypes)]
#[case("drop unique ids", SetupTaskCategory::Duplicates)]
#[case("verify click totals", SetupTaskCategory::MissingValues)]
fn goal_setup_classification_has_formatting_bucket(
    #[case] description: &str,
    #[case] expected: SetupTaskCategory,
) {
    assert_eq!(classify_goal_setup_task(description), expected);
}

#[rstest]
#[case("duplicates", CleaningBucket::DuplicateRemoval)]
#[case("duplicate_removal", CleaningBucket::DuplicateRemoval)]
#[case("Data-Types", CleaningBucket::DataTypeConversion)]
fn cleaning_bucket_parses_picker_and_category_ids(
    #[case] input: &str,
    #[case] expected: CleaningBucket,
) {
    assert_eq!(CleaningBucket::try_from(input), Ok(expected));
}

#[rstest]
#[case("budget", "", Some(CellValue::Null))]
#[case("budget", "1200", Some(CellValue::Number(1200.0)))]
#[case("cost_per_click", " 2.5 ", Some(CellValue::Number(2.5)))]
#[case("clicks", "lots", Some(CellValue::Null))]
#[case("impressions", "NaN", Some(CellValue::Null))]
#[case("start_date", "2024-03-01", Some(CellValue::Text("2024-03-01".to_owned())))]
#[case("end_date", "13/40/9999", None)]
#[case("end_date", "", None)]
#[case("channel", "", Some(CellValue::Text(String::new())))]
#[case("target_audience", "Parents", Some(CellValue::Text("Parents".to_owned())))]
fn cell_input_is_coerced_by_column_kind(
    #[case] column: &str,
    #[case] input: &str,
    #[case] expected: Option<CellValue>,
) {
    assert_eq!(ColumnKind::for_column(column).coerce(input), expected);
}

#[rstest]
#[case("2024-01-15", true)]
#[case("2024-1-15", false)]
#[case("2024/01/15", false)]
#[case("2024-01-15T00:00", false)]
#[case("२०२४-01-15", false)]
fn iso_date_shape_is_strict(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(is_iso_date(input), expected);
}

#[rstest]
fn sample_dataset_has_known_defects() {
    let dataset = Dataset::sample();

    assert_eq!(dataset.len(), 10);
    assert_eq!(dataset.columns().len(), 12);
    assert_eq!(dataset.count_where("target_audience", CellValue::is_null), 2);
    assert_eq!(dataset.count_where("impressions", CellValue::is_null), 1);
    assert_eq!(
        dataset.count_where("budget", |value| value.as_text().is_some()),
        2
    );
}

#[rstest]
fn with_cell_rejects_out_of_bounds_edits() {
    let dataset = Dataset::sample();

    assert!(dataset.with_cell(10, "budget", CellValue::Null).is_none());
    assert!(dataset.with_cell(0, "not_a_column", CellValue::Null).is_none());
    let edited = dataset
        .with_cell(0, "budget", CellValue::Number(1.0))
        .expect("in bounds");
    assert_eq!(edited.cell(0, "budget"), Some(&CellValue::Number(1.0)));
    assert_eq!(dataset.cell(0, "budget"), Some(&CellValue::Number(5000.0)));
}

#[rstest]
fn generated_dataset_is_reproducible_and_well_formed() {
    let first = Dataset::generate(&mut StdRng::seed_from_u64(42), 50);
    let second = Dataset::generate(&mut StdRng::seed_from_u64(42), 50);

    assert_eq!(first, second);
    assert_eq!(first.len(), 50);
    assert!(first.rows().iter().all(|row| {
        row.get("start_date")
            .and_then(CellValue::as_text)
            .is_some_and(is_iso_date)
            && row.get("budget").and_then(CellValue::as_number).is_some()
    }));
}
