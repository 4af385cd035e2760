//! Fixed task catalogs keyed by analysis goal.

use super::TaskCategory;

pub(super) struct TaskEntry {
    pub(super) id: &'static str,
    pub(super) column: &'static str,
    pub(super) description: &'static str,
    pub(super) details: &'static str,
}

pub(super) struct CategoryEntry {
    pub(super) id: &'static str,
    pub(super) name: &'static str,
    pub(super) description: &'static str,
    pub(super) label: &'static str,
    pub(super) tasks: &'static [TaskEntry],
}

const fn task(id: &'static str, column: &'static str, description: &'static str) -> TaskEntry {
    TaskEntry {
        id,
        column,
        description,
        details: "",
    }
}

const fn task_with_details(
    id: &'static str,
    column: &'static str,
    description: &'static str,
    details: &'static str,
) -> TaskEntry {
    TaskEntry {
        id,
        column,
        description,
        details,
    }
}

const DATA_CLEANING: &[CategoryEntry] = &[
    CategoryEntry {
        id: "missing-values",
        name: "Missing Values",
        description: "Handle missing or null values in dataset",
        label: "missing values",
        tasks: &[
            task_with_details(
                "handle_missing_values_target_audience",
                "target_audience",
                "Handle missing values in 'target_audience' column, possibly by imputing with default category 'General'.",
                "156 missing values detected",
            ),
            task_with_details(
                "handle_missing_values_impressions",
                "impressions",
                "Handle missing values in 'impressions' column, possibly by imputing with median or similar campaigns data.",
                "45 missing values found",
            ),
            task_with_details(
                "handle_missing_values_conversions",
                "conversions",
                "Handle missing values in 'conversions' column, possibly by setting to 0 for incomplete campaigns.",
                "67 missing values detected",
            ),
        ],
    },
    CategoryEntry {
        id: "data-types",
        name: "Data Type Conversion",
        description: "Convert columns to appropriate data types",
        label: "data type conversion",
        tasks: &[
            task_with_details(
                "convert_data_type_budget",
                "budget",
                "Convert 'budget' column from mixed string/number types to consistent numeric format, handling invalid entries.",
                "Mixed data types found",
            ),
            task_with_details(
                "standardize_date_format_start_date",
                "start_date",
                "Standardize 'start_date' column to consistent date format (YYYY-MM-DD), parsing various input formats.",
                "12 invalid date formats detected",
            ),
            task(
                "standardize_date_format_end_date",
                "end_date",
                "Standardize 'end_date' column to consistent date format (YYYY-MM-DD), parsing various input formats.",
            ),
        ],
    },
    CategoryEntry {
        id: "duplicates",
        name: "Duplicate Removal",
        description: "Identify and remove duplicate records",
        label: "duplicate removal",
        tasks: &[task(
            "remove_duplicates_campaign_name",
            "campaign_name",
            "Remove duplicate records based on 'campaign_name' and 'channel' combination, keeping the first occurrence.",
        )],
    },
    CategoryEntry {
        id: "outliers",
        name: "Outlier Detection",
        description: "Detect and handle outliers in numerical columns",
        label: "outlier detection",
        tasks: &[
            task(
                "detect_outliers_budget",
                "budget",
                "Detect outliers in 'budget' column using IQR method and handle extreme values appropriately.",
            ),
            task(
                "detect_outliers_impressions",
                "impressions",
                "Detect outliers in 'impressions' column using statistical methods and validate data integrity.",
            ),
            task(
                "detect_outliers_clicks",
                "clicks",
                "Detect outliers in 'clicks' column and ensure logical relationship with impressions.",
            ),
        ],
    },
    CategoryEntry {
        id: "validation",
        name: "Data Validation",
        description: "Validate data integrity and consistency",
        label: "data validation",
        tasks: &[
            task(
                "validate_budget_values",
                "budget",
                "Validate that all 'budget' values are positive numbers and within reasonable business ranges.",
            ),
            task(
                "validate_metric_relationships",
                "impressions",
                "Validate logical relationships: impressions >= clicks >= conversions for data consistency.",
            ),
            task(
                "validate_channel_values",
                "channel",
                "Validate that all 'channel' values are from predefined list of marketing channels.",
            ),
        ],
    },
];

const PREDICTIVE_MODELING: &[CategoryEntry] = &[
    CategoryEntry {
        id: "target-definition",
        name: "Target Definition",
        description: "Define what to predict or estimate",
        label: "target definition",
        tasks: &[task(
            "define_prediction_target",
            "user_selected",
            "Define the target variable for prediction or estimation from available dataset columns.",
        )],
    },
    CategoryEntry {
        id: "model-recommendation",
        name: "Model Recommendation",
        description: "Get model recommendations based on preferences",
        label: "model recommendation",
        tasks: &[
            task(
                "preference_accuracy_vs_robustness",
                "model_selection",
                "Choose preference between accuracy (high performance) vs robustness (stable across conditions).",
            ),
            task(
                "preference_complexity_vs_simplicity",
                "model_selection",
                "Choose preference between complexity (advanced algorithms) vs simplicity (interpretable models).",
            ),
            task(
                "preference_technique_vs_explanation",
                "model_selection",
                "Choose preference between technique (cutting-edge methods) vs explanation (interpretable results).",
            ),
            task(
                "generate_model_recommendation",
                "model_selection",
                "Generate personalized model recommendation based on user preferences and data characteristics.",
            ),
        ],
    },
    CategoryEntry {
        id: "feature-selection",
        name: "Feature Selection",
        description: "Select features for model training",
        label: "feature selection",
        tasks: &[task(
            "drag_drop_feature_selection",
            "all_features",
            "Drag and drop all possible features you want to use in the rectangular selection area.",
        )],
    },
    CategoryEntry {
        id: "feature-engineering",
        name: "Feature Engineering",
        description: "Engineer features for better model performance",
        label: "feature engineering",
        tasks: &[
            task(
                "engineer_numerical_features",
                "numerical_columns",
                "Apply feature engineering techniques to numerical features (scaling, transformation, binning).",
            ),
            task(
                "engineer_categorical_features",
                "categorical_columns",
                "Apply feature engineering techniques to categorical features (encoding, grouping, embedding).",
            ),
        ],
    },
    CategoryEntry {
        id: "variable-selection",
        name: "Variable Selection",
        description: "Automatically select optimal variables",
        label: "variable selection",
        tasks: &[
            task(
                "run_variable_selection",
                "selected_features",
                "Run automated variable selection algorithms to identify most important features for the model.",
            ),
            task(
                "show_selected_variables",
                "selected_features",
                "Display the final list of selected variables with importance scores and selection rationale.",
            ),
        ],
    },
    CategoryEntry {
        id: "model-evaluation",
        name: "Model Evaluation",
        description: "Evaluate model performance comprehensively",
        label: "model evaluation",
        tasks: &[
            task(
                "calculate_training_test_errors",
                "model_metrics",
                "Calculate training error (80%) and test error (78%) to assess model performance and overfitting.",
            ),
            task(
                "generate_error_plots",
                "model_metrics",
                "Generate error plots showing model performance across different data segments and conditions.",
            ),
            task(
                "create_confusion_matrix",
                "model_metrics",
                "Create confusion matrix to visualize classification performance and error patterns.",
            ),
            task(
                "perform_stress_test",
                "model_metrics",
                "Perform stress testing to evaluate model robustness under various edge cases and data conditions.",
            ),
        ],
    },
];

const ANALYZING: &[CategoryEntry] = &[CategoryEntry {
    id: "descriptive-stats",
    name: "Descriptive Statistics",
    description: "Calculate basic statistical measures",
    label: "descriptive statistics",
    tasks: &[task(
        "analyze_budget_distribution",
        "budget",
        "Calculate mean, median, standard deviation, and distribution analysis for budget column.",
    )],
}];

const VISUALIZING: &[CategoryEntry] = &[CategoryEntry {
    id: "chart-creation",
    name: "Chart Creation",
    description: "Create visualizations for data insights",
    label: "chart creation",
    tasks: &[task(
        "create_budget_histogram",
        "budget",
        "Create histogram visualization showing budget distribution across all campaigns.",
    )],
}];

/// Builds the ordered task categories for `goal`.
///
/// Unrecognized goals yield an empty catalog. Every call returns fresh,
/// pending tasks.
///
/// # Examples
///
/// ```
/// use datrix::workflow::domain::catalog_for_goal;
///
/// let ids: Vec<_> = catalog_for_goal("data-cleaning")
///     .iter()
///     .map(|category| category.id().to_string())
///     .collect();
/// assert_eq!(ids, ["missing-values", "data-types", "duplicates", "outliers", "validation"]);
/// assert!(catalog_for_goal("astrology").is_empty());
/// ```
#[must_use]
pub fn catalog_for_goal(goal: &str) -> Vec<TaskCategory> {
    let entries: &[CategoryEntry] = match goal {
        "data-cleaning" => DATA_CLEANING,
        "modeling" | "predictive-modeling" => PREDICTIVE_MODELING,
        "analyzing" => ANALYZING,
        "visualizing" => VISUALIZING,
        _ => &[],
    };
    entries.iter().map(TaskCategory::catalog).collect()
}
