//! Result types produced by a quality analysis run.
//!
//! Everything here is plain data: created once per run, never mutated
//! afterwards, and serializable to JSON for reports.

use crate::loader::LoadStrategy;
use serde::{Deserialize, Serialize};

/// How a column is treated by the analysis stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Per-column structure and cardinality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Storage dtype as reported by the table.
    pub dtype: String,
    pub kind: ColumnKind,
    pub non_null_count: usize,
    pub missing_count: usize,
    /// Distinct values, missing excluded.
    pub distinct_count: usize,
    /// `distinct_count / rows`, 0 for an empty table.
    pub distinct_ratio: f64,
}

impl ColumnProfile {
    pub fn is_numeric(&self) -> bool {
        self.kind == ColumnKind::Numeric
    }

    /// Distinct ratio as a percentage.
    pub fn distinct_percent(&self) -> f64 {
        self.distinct_ratio * 100.0
    }
}

/// Dataset shape and size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub rows: usize,
    pub columns: usize,
    /// Estimated in-memory size of the table.
    pub memory_usage_kb: f64,
    /// Size of the raw input, when the table came from the loader.
    pub file_size_kb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_strategy: Option<LoadStrategy>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub load_diagnostics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValueStat {
    pub column: String,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmptyStringStat {
    pub column: String,
    pub count: usize,
}

/// Missing values, duplicate rows and blank strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    /// One entry per column, in table order.
    pub missing_values: Vec<MissingValueStat>,
    pub total_missing: usize,
    pub duplicate_count: usize,
    pub duplicate_percent: f64,
    /// Categorical columns with at least one blank value only.
    pub empty_strings: Vec<EmptyStringStat>,
}

impl QualityAssessment {
    /// Columns with at least one missing value.
    pub fn columns_with_missing(&self) -> impl Iterator<Item = &MissingValueStat> {
        self.missing_values.iter().filter(|m| m.count > 0)
    }
}

/// Distribution summary of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation; absent with fewer than two values.
    pub std: Option<f64>,
    pub outlier_count: usize,
    /// Outliers as a percentage of all rows, missing included.
    pub outlier_percent: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Frequency summary of one categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalSummary {
    pub column: String,
    pub distinct_count: usize,
    pub mode: Option<String>,
    /// Most frequent values by count, ties in first-seen order.
    pub top_values: Vec<ValueCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticalSummary {
    pub numeric: Vec<NumericSummary>,
    pub categorical: Vec<CategoricalSummary>,
}

/// A strongly correlated pair of numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub column_a: String,
    pub column_b: String,
    pub coefficient: f64,
}

/// Sub-scores and overall score, each in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScores {
    pub completeness: f64,
    pub uniqueness: f64,
    pub consistency: f64,
    pub range_validity: f64,
    pub overall: f64,
}

/// Complete output of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub basic_info: BasicInfo,
    pub column_info: Vec<ColumnProfile>,
    pub quality_assessment: QualityAssessment,
    pub statistical_summary: StatisticalSummary,
    pub consistency_issues: Vec<String>,
    pub correlations: Vec<Correlation>,
    pub range_issues: Vec<String>,
    pub quality_scores: QualityScores,
    pub recommendations: Vec<String>,
}

impl AnalysisResult {
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.column_info.iter().find(|c| c.name == name)
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &ColumnProfile> {
        self.column_info.iter().filter(|c| c.is_numeric())
    }

    pub fn categorical_columns(&self) -> impl Iterator<Item = &ColumnProfile> {
        self.column_info.iter().filter(|c| !c.is_numeric())
    }
}
