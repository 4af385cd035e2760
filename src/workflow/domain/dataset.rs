//! Tabular working dataset shared between tasks and cell edits.
//!
//! Datasets are immutable values: every transformation returns a new
//! [`Dataset`], and the workflow engine swaps its `Arc<Dataset>` snapshot in
//! one step so observers never see a half-applied change.

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Columns of the campaign dataset in display order.
pub const CAMPAIGN_COLUMNS: [&str; 12] = [
    "id",
    "campaign_name",
    "start_date",
    "end_date",
    "budget",
    "impressions",
    "clicks",
    "conversions",
    "cost_per_click",
    "conversion_rate",
    "channel",
    "target_audience",
];

const CHANNELS: [&str; 5] = ["Social Media", "Email", "Search", "Display", "Video"];

const AUDIENCES: [&str; 5] = [
    "General",
    "Students",
    "Young Adults",
    "Professionals",
    "Parents",
];

/// A single cell of the working dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Missing value.
    #[default]
    Null,
    /// Numeric value.
    Number(f64),
    /// Free text, including un-coerced raw input in numeric columns.
    Text(String),
}

impl CellValue {
    /// Returns `true` for [`CellValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the numeric value, if any.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Null | Self::Text(_) => None,
        }
    }

    /// Returns the text value, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Null | Self::Number(_) => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// One record of the working dataset, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataRow(BTreeMap<String, CellValue>);

impl DataRow {
    /// Creates a row from column-value pairs.
    #[must_use]
    pub fn from_cells<K, V>(cells: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<CellValue>,
    {
        Self(
            cells
                .into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        )
    }

    /// Returns the value of `column`, if the row has that column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.0.get(column)
    }

    /// Returns a copy of this row with `column` set to `value`.
    #[must_use]
    pub fn with_value(&self, column: &str, value: CellValue) -> Self {
        let mut cells = self.0.clone();
        cells.insert(column.to_owned(), value);
        Self(cells)
    }

    /// Iterates over the cells in column-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.0.iter().map(|(column, value)| (column.as_str(), value))
    }
}

/// An ordered column list plus rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<DataRow>,
}

impl Dataset {
    /// Creates a dataset from its column list and rows.
    #[must_use]
    pub fn new(columns: impl IntoIterator<Item = String>, rows: Vec<DataRow>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            rows,
        }
    }

    /// Returns the column names in display order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the rows in order.
    #[must_use]
    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the dataset has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns `true` when `column` is part of the column list.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|known| known == column)
    }

    /// Returns the cell at `row` and `column`.
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        self.rows.get(row).and_then(|record| record.get(column))
    }

    /// Counts the rows whose `column` value satisfies `predicate`.
    ///
    /// Rows without the column are presented to the predicate as null.
    #[must_use]
    pub fn count_where(&self, column: &str, predicate: impl Fn(&CellValue) -> bool) -> u64 {
        let count = self
            .rows
            .iter()
            .filter(|row| predicate(row.get(column).unwrap_or(&CellValue::Null)))
            .count();
        u64::try_from(count).unwrap_or(u64::MAX)
    }

    /// Returns a copy with the single cell at `row` and `column` replaced.
    ///
    /// Returns `None` when the row index is out of bounds or the column is
    /// not part of the dataset.
    #[must_use]
    pub fn with_cell(&self, row: usize, column: &str, value: CellValue) -> Option<Self> {
        if !self.has_column(column) {
            return None;
        }
        let replacement = self.rows.get(row)?.with_value(column, value);
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, record)| {
                if index == row {
                    replacement.clone()
                } else {
                    record.clone()
                }
            })
            .collect();
        Some(Self {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Returns a copy with `rewrite` applied to every value of `column`,
    /// plus the number of rows it changed.
    ///
    /// `rewrite` returns `Some` with the new value for cells it changes and
    /// `None` to keep a cell as it is.
    #[must_use]
    pub fn map_column(
        &self,
        column: &str,
        rewrite: impl Fn(&CellValue) -> Option<CellValue>,
    ) -> (Self, u64) {
        let mut changed: u64 = 0;
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let current = row.get(column).unwrap_or(&CellValue::Null);
                match rewrite(current) {
                    Some(value) => {
                        changed = changed.saturating_add(1);
                        row.with_value(column, value)
                    }
                    None => row.clone(),
                }
            })
            .collect();
        let dataset = Self {
            columns: self.columns.clone(),
            rows,
        };
        (dataset, changed)
    }

    /// Returns the fixed campaign dataset used by demos and tests.
    ///
    /// It carries two null `target_audience` values, one null
    /// `impressions` value, and two budgets stored as text (`"invalid"` and
    /// `"7500"`), so every built-in cleaning strategy has work to do.
    #[must_use]
    pub fn sample() -> Self {
        let rows = SAMPLE_ROWS.iter().map(SampleRow::to_row).collect();
        Self::new(campaign_columns(), rows)
    }

    /// Generates a random campaign dataset with `count` rows.
    ///
    /// Roughly one in five rows has a null `target_audience`.
    #[must_use]
    pub fn generate(rng: &mut impl Rng, count: u32) -> Self {
        let rows = (1..=count).map(|id| random_row(rng, id)).collect();
        Self::new(campaign_columns(), rows)
    }
}

fn campaign_columns() -> Vec<String> {
    CAMPAIGN_COLUMNS.iter().map(|column| (*column).to_owned()).collect()
}

enum Budget {
    Amount(u32),
    Raw(&'static str),
}

struct SampleRow {
    id: u32,
    start_date: &'static str,
    end_date: &'static str,
    budget: Budget,
    impressions: Option<u32>,
    clicks: u32,
    conversions: u32,
    cost_per_click: f64,
    conversion_rate: f64,
    channel: &'static str,
    target_audience: Option<&'static str>,
}

impl SampleRow {
    fn to_row(&self) -> DataRow {
        let budget = match self.budget {
            Budget::Amount(amount) => CellValue::from(amount),
            Budget::Raw(text) => CellValue::from(text),
        };
        DataRow::from_cells([
            ("id", CellValue::from(self.id)),
            (
                "campaign_name",
                CellValue::from(format!("Campaign {}", self.id)),
            ),
            ("start_date", CellValue::from(self.start_date)),
            ("end_date", CellValue::from(self.end_date)),
            ("budget", budget),
            ("impressions", CellValue::from(self.impressions)),
            ("clicks", CellValue::from(self.clicks)),
            ("conversions", CellValue::from(self.conversions)),
            ("cost_per_click", CellValue::from(self.cost_per_click)),
            ("conversion_rate", CellValue::from(self.conversion_rate)),
            ("channel", CellValue::from(self.channel)),
            ("target_audience", CellValue::from(self.target_audience)),
        ])
    }
}

const SAMPLE_ROWS: [SampleRow; 10] = [
    SampleRow {
        id: 1,
        start_date: "2024-01-15",
        end_date: "2024-02-15",
        budget: Budget::Amount(5000),
        impressions: Some(125_000),
        clicks: 3750,
        conversions: 188,
        cost_per_click: 1.33,
        conversion_rate: 5.01,
        channel: "Social Media",
        target_audience: Some("Young Adults"),
    },
    SampleRow {
        id: 2,
        start_date: "2024-02-01",
        end_date: "2024-03-01",
        budget: Budget::Amount(8000),
        impressions: Some(98_000),
        clicks: 2940,
        conversions: 147,
        cost_per_click: 2.72,
        conversion_rate: 5.0,
        channel: "Search",
        target_audience: None,
    },
    SampleRow {
        id: 3,
        start_date: "2024-02-20",
        end_date: "2024-04-20",
        budget: Budget::Raw("invalid"),
        impressions: Some(67_000),
        clicks: 1675,
        conversions: 84,
        cost_per_click: 2.1,
        conversion_rate: 5.01,
        channel: "Email",
        target_audience: Some("Professionals"),
    },
    SampleRow {
        id: 4,
        start_date: "2024-03-05",
        end_date: "2024-04-05",
        budget: Budget::Amount(12_000),
        impressions: Some(210_000),
        clicks: 6300,
        conversions: 315,
        cost_per_click: 1.9,
        conversion_rate: 5.0,
        channel: "Video",
        target_audience: Some("Students"),
    },
    SampleRow {
        id: 5,
        start_date: "2024-03-18",
        end_date: "2024-05-18",
        budget: Budget::Amount(3500),
        impressions: None,
        clicks: 980,
        conversions: 41,
        cost_per_click: 3.57,
        conversion_rate: 4.18,
        channel: "Display",
        target_audience: Some("Parents"),
    },
    SampleRow {
        id: 6,
        start_date: "2024-04-02",
        end_date: "2024-05-02",
        budget: Budget::Raw("7500"),
        impressions: Some(143_000),
        clicks: 4290,
        conversions: 236,
        cost_per_click: 1.75,
        conversion_rate: 5.5,
        channel: "Social Media",
        target_audience: Some("General"),
    },
    SampleRow {
        id: 7,
        start_date: "2024-04-22",
        end_date: "2024-06-22",
        budget: Budget::Amount(6200),
        impressions: Some(88_500),
        clicks: 2213,
        conversions: 102,
        cost_per_click: 2.8,
        conversion_rate: 4.61,
        channel: "Search",
        target_audience: Some("Professionals"),
    },
    SampleRow {
        id: 8,
        start_date: "2024-05-10",
        end_date: "2024-06-10",
        budget: Budget::Amount(4100),
        impressions: Some(56_300),
        clicks: 1520,
        conversions: 61,
        cost_per_click: 2.7,
        conversion_rate: 4.01,
        channel: "Email",
        target_audience: None,
    },
    SampleRow {
        id: 9,
        start_date: "2024-06-01",
        end_date: "2024-07-01",
        budget: Budget::Amount(9800),
        impressions: Some(176_400),
        clicks: 5292,
        conversions: 291,
        cost_per_click: 1.85,
        conversion_rate: 5.5,
        channel: "Video",
        target_audience: Some("Young Adults"),
    },
    SampleRow {
        id: 10,
        start_date: "2024-06-15",
        end_date: "2024-08-15",
        budget: Budget::Amount(2700),
        impressions: Some(41_200),
        clicks: 1030,
        conversions: 38,
        cost_per_click: 2.62,
        conversion_rate: 3.69,
        channel: "Display",
        target_audience: Some("Students"),
    },
];

fn random_row(rng: &mut impl Rng, id: u32) -> DataRow {
    let channel = CHANNELS.choose(rng).copied().unwrap_or("Search");
    let audience = if rng.random_bool(0.8) {
        AUDIENCES.choose(rng).copied()
    } else {
        None
    };
    DataRow::from_cells([
        ("id", CellValue::from(id)),
        ("campaign_name", CellValue::from(format!("Campaign {id}"))),
        ("start_date", CellValue::from(random_date(rng))),
        ("end_date", CellValue::from(random_date(rng))),
        ("budget", CellValue::from(rng.random_range(1000..11_000_u32))),
        (
            "impressions",
            CellValue::from(rng.random_range(10_000..210_000_u32)),
        ),
        ("clicks", CellValue::from(rng.random_range(100..10_100_u32))),
        (
            "conversions",
            CellValue::from(rng.random_range(10..1010_u32)),
        ),
        ("cost_per_click", random_decimal(rng, 0..=5)),
        ("conversion_rate", random_decimal(rng, 1..=10)),
        ("channel", CellValue::from(channel)),
        ("target_audience", CellValue::from(audience)),
    ])
}

fn random_date(rng: &mut impl Rng) -> String {
    let month = rng.random_range(1..=12_u8);
    let day = rng.random_range(1..=28_u8);
    format!("2024-{month:02}-{day:02}")
}

/// Draws a two-decimal number with a whole part from `whole`.
fn random_decimal(rng: &mut impl Rng, whole: std::ops::RangeInclusive<u8>) -> CellValue {
    let units = rng.random_range(whole);
    let cents = rng.random_range(0..100_u8);
    format!("{units}.{cents:02}")
        .parse::<f64>()
        .map_or(CellValue::Null, CellValue::Number)
}
