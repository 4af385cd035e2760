//! Per-column coercion of raw cell input.

use super::CellValue;

/// How raw input for a column is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Numbers; blank or unparseable input becomes null.
    Numeric,
    /// `YYYY-MM-DD` dates; anything else is rejected.
    Date,
    /// Free text, stored as typed.
    Text,
}

impl ColumnKind {
    /// Returns the kind of the named column.
    #[must_use]
    pub fn for_column(column: &str) -> Self {
        match column {
            "budget" | "impressions" | "clicks" | "conversions" | "cost_per_click"
            | "conversion_rate" => Self::Numeric,
            "start_date" | "end_date" => Self::Date,
            _ => Self::Text,
        }
    }

    /// Coerces raw input into a cell value for this kind of column.
    ///
    /// Returns `None` when the input must be rejected and the previous
    /// value kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use datrix::workflow::domain::{CellValue, ColumnKind};
    ///
    /// assert_eq!(ColumnKind::Numeric.coerce(""), Some(CellValue::Null));
    /// assert_eq!(ColumnKind::Numeric.coerce("1200"), Some(CellValue::Number(1200.0)));
    /// assert_eq!(ColumnKind::Date.coerce("13/40/9999"), None);
    /// ```
    #[must_use]
    pub fn coerce(self, input: &str) -> Option<CellValue> {
        match self {
            Self::Numeric => Some(parse_number(input)),
            Self::Date => is_iso_date(input).then(|| CellValue::from(input)),
            Self::Text => Some(CellValue::from(input)),
        }
    }
}

/// Parses numeric input, degrading blank, unparseable, and non-finite
/// input to null.
#[must_use]
pub fn parse_number(input: &str) -> CellValue {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map_or(CellValue::Null, CellValue::Number)
}

/// Returns `true` when `input` has the exact shape `DDDD-DD-DD`.
#[must_use]
pub fn is_iso_date(input: &str) -> bool {
    input.len() == 10
        && input.bytes().enumerate().all(|(index, byte)| match index {
            4 | 7 => byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

/// Whether a cell edit changed the working dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellEditOutcome {
    /// The coerced value was written and a new snapshot published.
    Applied,
    /// The input was rejected or the cell does not exist; nothing changed.
    Ignored,
}
