//! Keyword classification of free-text custom task descriptions.
//!
//! Both tables are ordered: the first group with a keyword contained in the
//! lowercased description wins, and a description matching nothing falls
//! back to missing values.

use super::ParseCleaningBucketError;
use crate::analysis::domain::SetupTaskCategory;

/// Cleaning category a custom processing task is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CleaningBucket {
    /// Missing or null values.
    MissingValues,
    /// Data type conversion.
    DataTypeConversion,
    /// Duplicate removal.
    DuplicateRemoval,
    /// Outlier detection.
    OutlierDetection,
    /// Data validation.
    DataValidation,
}

const PROCESSING_KEYWORDS: [(CleaningBucket, &[&str]); 5] = [
    (
        CleaningBucket::MissingValues,
        &["missing", "null", "impute", "fill"],
    ),
    (
        CleaningBucket::DataTypeConversion,
        &["type", "convert", "format", "parse", "standardize"],
    ),
    (CleaningBucket::DuplicateRemoval, &["duplicate", "unique"]),
    (
        CleaningBucket::OutlierDetection,
        &["outlier", "anomal", "extreme"],
    ),
    (
        CleaningBucket::DataValidation,
        &["validate", "check", "verify"],
    ),
];

const GOAL_SETUP_KEYWORDS: [(SetupTaskCategory, &[&str]); 5] = [
    (
        SetupTaskCategory::MissingValues,
        &["missing", "null", "impute", "fill"],
    ),
    (
        SetupTaskCategory::DataTypes,
        &["type", "convert", "format", "parse"],
    ),
    (SetupTaskCategory::Duplicates, &["duplicate", "unique"]),
    (
        SetupTaskCategory::Outliers,
        &["outlier", "anomal", "extreme"],
    ),
    (
        SetupTaskCategory::Formatting,
        &["standardize", "normalize", "clean"],
    ),
];

fn first_match<T: Copy>(table: &[(T, &[&str])], description: &str, fallback: T) -> T {
    let needle = description.to_lowercase();
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| needle.contains(keyword)))
        .map_or(fallback, |(bucket, _)| *bucket)
}

impl CleaningBucket {
    /// Files a processing-flow task description under a bucket.
    ///
    /// # Examples
    ///
    /// ```
    /// use datrix::workflow::domain::CleaningBucket;
    ///
    /// assert_eq!(
    ///     CleaningBucket::classify("remove duplicate rows"),
    ///     CleaningBucket::DuplicateRemoval
    /// );
    /// assert_eq!(CleaningBucket::classify("???"), CleaningBucket::MissingValues);
    /// ```
    #[must_use]
    pub fn classify(description: &str) -> Self {
        first_match(&PROCESSING_KEYWORDS, description, Self::MissingValues)
    }

    /// Returns the short identifier used in task-type pickers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingValues => "missing_values",
            Self::DataTypeConversion => "data_type_conversion",
            Self::DuplicateRemoval => "duplicate_removal",
            Self::OutlierDetection => "outlier_detection",
            Self::DataValidation => "data_validation",
        }
    }

    /// Returns the identifier of the data-cleaning category for this bucket.
    #[must_use]
    pub const fn category_id(self) -> &'static str {
        match self {
            Self::MissingValues => "missing-values",
            Self::DataTypeConversion => "data-types",
            Self::DuplicateRemoval => "duplicates",
            Self::OutlierDetection => "outliers",
            Self::DataValidation => "validation",
        }
    }

    /// Returns the lowercase label stored on tasks.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MissingValues => "missing values",
            Self::DataTypeConversion => "data type conversion",
            Self::DuplicateRemoval => "duplicate removal",
            Self::OutlierDetection => "outlier detection",
            Self::DataValidation => "data validation",
        }
    }

    /// Returns the title-case category name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::MissingValues => "Missing Values",
            Self::DataTypeConversion => "Data Type Conversion",
            Self::DuplicateRemoval => "Duplicate Removal",
            Self::OutlierDetection => "Outlier Detection",
            Self::DataValidation => "Data Validation",
        }
    }
}

impl TryFrom<&str> for CleaningBucket {
    type Error = ParseCleaningBucketError;

    /// Accepts either the picker identifier (`duplicate_removal`) or the
    /// category identifier (`duplicates`).
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "missing_values" | "missing-values" => Ok(Self::MissingValues),
            "data_type_conversion" | "data-types" => Ok(Self::DataTypeConversion),
            "duplicate_removal" | "duplicates" => Ok(Self::DuplicateRemoval),
            "outlier_detection" | "outliers" => Ok(Self::OutlierDetection),
            "data_validation" | "validation" => Ok(Self::DataValidation),
            _ => Err(ParseCleaningBucketError(value.to_owned())),
        }
    }
}

/// Files a goal-setup custom task description under a setup category.
///
/// Unlike [`CleaningBucket::classify`], standardize/normalize/clean
/// wording lands in [`SetupTaskCategory::Formatting`] and there is no
/// validation group.
#[must_use]
pub fn classify_goal_setup_task(description: &str) -> SetupTaskCategory {
    first_match(
        &GOAL_SETUP_KEYWORDS,
        description,
        SetupTaskCategory::MissingValues,
    )
}
