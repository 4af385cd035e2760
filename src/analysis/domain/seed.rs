//! Fixed demo history and built-in template models.

use super::{AnalysisHistoryEntry, AnalysisModel, AnalysisStatus, GoalId, HistoryEntryId, ModelId};
use chrono::{DateTime, Utc};

/// Identifier prefix reserved for seeded demo history entries.
///
/// Entries carrying this prefix are merged in on every load and never
/// written back to durable storage.
pub const DEMO_ID_PREFIX: &str = "demo-";

const PROCESSING_STEPS_MARKETING: [&str; 4] = [
    "data-validation",
    "data-cleaning",
    "statistical-analysis",
    "goal-analysis",
];

const PROCESSING_STEPS_SALES: [&str; 4] = [
    "data-validation",
    "data-cleaning",
    "trend-analysis",
    "forecasting",
];

struct DemoRecord {
    id: &'static str,
    name: &'static str,
    file_name: &'static str,
    created_at: i64,
    completed_at: i64,
    insights: u32,
    data_rows: u64,
    data_columns: u32,
}

const DEMO_RECORDS: [DemoRecord; 3] = [
    DemoRecord {
        id: "demo-marketing-1",
        name: "Q4 2024 Digital Marketing Campaign Analysis",
        file_name: "q4_digital_marketing_campaigns.csv",
        created_at: 1_705_311_000,
        completed_at: 1_705_319_100,
        insights: 18,
        data_rows: 12_500,
        data_columns: 9,
    },
    DemoRecord {
        id: "demo-marketing-2",
        name: "E-commerce Customer Acquisition Analysis",
        file_name: "ecommerce_customer_acquisition_2023.csv",
        created_at: 1_702_045_200,
        completed_at: 1_702_052_100,
        insights: 24,
        data_rows: 8_750,
        data_columns: 12,
    },
    DemoRecord {
        id: "demo-marketing-3",
        name: "Social Media ROI Performance Study",
        file_name: "social_media_roi_analysis_2023.csv",
        created_at: 1_700_649_900,
        completed_at: 1_700_659_800,
        insights: 15,
        data_rows: 15_200,
        data_columns: 8,
    },
];

fn timestamp(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or_default()
}

/// Returns the demo history entries in their fixed display order.
#[must_use]
pub fn demo_history() -> Vec<AnalysisHistoryEntry> {
    DEMO_RECORDS
        .iter()
        .map(|record| {
            AnalysisHistoryEntry::seeded(
                HistoryEntryId::from_static(record.id),
                record.name,
                record.file_name,
                AnalysisStatus::Completed,
                timestamp(record.created_at),
            )
            .with_completed_at(timestamp(record.completed_at))
            .with_insights(record.insights)
            .with_dimensions(record.data_rows, record.data_columns)
        })
        .collect()
}

/// Returns the built-in template models stamped with `created_at`.
#[must_use]
pub fn template_models(created_at: DateTime<Utc>) -> Vec<AnalysisModel> {
    vec![
        AnalysisModel::seeded(
            ModelId::from_static("marketing-template"),
            "Marketing Campaign Analysis",
            created_at,
        )
        .with_description("Comprehensive analysis for marketing campaign performance")
        .with_goals(goals(&["roi-analysis", "performance-comparison", "audience-segmentation"]))
        .with_processing_steps(owned(&PROCESSING_STEPS_MARKETING))
        .with_data_types(owned(&["campaign_data", "marketing_metrics"]))
        .as_template(),
        AnalysisModel::seeded(
            ModelId::from_static("sales-template"),
            "Sales Performance Analysis",
            created_at,
        )
        .with_description("Track sales metrics and identify growth opportunities")
        .with_goals(goals(&["trend-analysis", "performance-comparison", "cost-efficiency"]))
        .with_processing_steps(owned(&PROCESSING_STEPS_SALES))
        .with_data_types(owned(&["sales_data", "revenue_metrics"]))
        .as_template(),
    ]
}

fn goals(values: &[&'static str]) -> Vec<GoalId> {
    values.iter().copied().map(GoalId::from_static).collect()
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}
