//! Configuration types for the quality analyzer.
//!
//! All thresholds used by the checks, the scorer and the recommendation
//! rules live here. Use [`AnalyzerConfig::builder()`] for a validated config.

use crate::error::QualityError;
use serde::{Deserialize, Serialize};

/// Delimiters tried when sniffing the separator of a file.
pub const DEFAULT_SNIFF_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Cell values read as missing, in addition to empty fields.
pub const DEFAULT_NULL_VALUES: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Options for the tabular loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Number of rows scanned for schema inference. `None` scans every row,
    /// so a column is numeric only when all its non-missing values parse.
    /// Default: None
    pub infer_schema_length: Option<usize>,

    /// Candidate delimiters for the sniffing strategy, in preference order.
    /// Default: `, ; \t |`
    pub sniff_candidates: Vec<u8>,

    /// Exact cell values treated as missing in every column.
    /// Default: [`DEFAULT_NULL_VALUES`]
    #[serde(default = "default_null_values")]
    pub null_values: Vec<String>,
}

fn default_null_values() -> Vec<String> {
    DEFAULT_NULL_VALUES.iter().map(|v| v.to_string()).collect()
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            infer_schema_length: None,
            sniff_candidates: DEFAULT_SNIFF_CANDIDATES.to_vec(),
            null_values: default_null_values(),
        }
    }
}

/// Configuration for a quality analysis run.
///
/// # Example
///
/// ```rust,ignore
/// use synth_quality::config::AnalyzerConfig;
///
/// let config = AnalyzerConfig::builder()
///     .min_recommended_rows(500)
///     .correlation_threshold(0.8)
///     .parallel_stages(true)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Datasets with fewer rows get an "increase dataset size" recommendation.
    /// Default: 1000
    pub min_recommended_rows: usize,

    /// Tukey fence multiplier applied to the IQR.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Pairs with |r| strictly above this value are reported (0.0 - 1.0).
    /// Default: 0.7
    pub correlation_threshold: f64,

    /// Columns whose distinct ratio falls below this value (and that have
    /// more than one distinct value) are flagged for low variety (0.0 - 1.0).
    /// Default: 0.1
    pub low_variety_ratio: f64,

    /// Overall scores below this value trigger a regenerate recommendation
    /// (0.0 - 100.0).
    /// Default: 80.0
    pub regenerate_threshold: f64,

    /// Points subtracted from the consistency score per consistency issue.
    /// Default: 10.0
    pub consistency_penalty: f64,

    /// Points subtracted from the range-validity score per range issue.
    /// Default: 15.0
    pub range_penalty: f64,

    /// Number of most frequent values kept per categorical column.
    /// Default: 10
    pub top_values: usize,

    /// Run the four independent analysis stages on scoped threads.
    /// Their progress updates are emitted once all threads have joined.
    /// Default: false
    pub parallel_stages: bool,

    /// Loader options.
    pub loader: LoaderConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_recommended_rows: 1000,
            iqr_multiplier: 1.5,
            correlation_threshold: 0.7,
            low_variety_ratio: 0.1,
            regenerate_threshold: 80.0,
            consistency_penalty: 10.0,
            range_penalty: 15.0,
            top_values: 10,
            parallel_stages: false,
            loader: LoaderConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        check_range("correlation_threshold", self.correlation_threshold, 0.0, 1.0)?;
        check_range("low_variety_ratio", self.low_variety_ratio, 0.0, 1.0)?;
        check_range("regenerate_threshold", self.regenerate_threshold, 0.0, 100.0)?;
        check_range("consistency_penalty", self.consistency_penalty, 0.0, 100.0)?;
        check_range("range_penalty", self.range_penalty, 0.0, 100.0)?;

        if !(self.iqr_multiplier.is_finite() && self.iqr_multiplier > 0.0) {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        if self.top_values == 0 {
            return Err(ConfigValidationError::InvalidTopValues(self.top_values));
        }

        if self.loader.sniff_candidates.is_empty() {
            return Err(ConfigValidationError::NoDelimiterCandidates);
        }

        Ok(())
    }
}

fn check_range(
    field: &str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ConfigValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigValidationError::InvalidThreshold {
            field: field.to_string(),
            value,
            min,
            max,
        })
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between {min} and {max})")]
    InvalidThreshold {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid IQR multiplier: {0} (must be a positive number)")]
    InvalidIqrMultiplier(f64),

    #[error("Invalid top values limit: {0} (must be at least 1)")]
    InvalidTopValues(usize),

    #[error("At least one delimiter candidate is required for sniffing")]
    NoDelimiterCandidates,
}

impl From<ConfigValidationError> for QualityError {
    fn from(err: ConfigValidationError) -> Self {
        QualityError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`AnalyzerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalyzerConfigBuilder {
    min_recommended_rows: Option<usize>,
    iqr_multiplier: Option<f64>,
    correlation_threshold: Option<f64>,
    low_variety_ratio: Option<f64>,
    regenerate_threshold: Option<f64>,
    consistency_penalty: Option<f64>,
    range_penalty: Option<f64>,
    top_values: Option<usize>,
    parallel_stages: Option<bool>,
    infer_schema_length: Option<usize>,
    sniff_candidates: Option<Vec<u8>>,
    null_values: Option<Vec<String>>,
}

impl AnalyzerConfigBuilder {
    /// Set the row count below which a larger dataset is recommended.
    pub fn min_recommended_rows(mut self, rows: usize) -> Self {
        self.min_recommended_rows = Some(rows);
        self
    }

    /// Set the Tukey fence multiplier.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the absolute correlation above which pairs are reported.
    pub fn correlation_threshold(mut self, threshold: f64) -> Self {
        self.correlation_threshold = Some(threshold);
        self
    }

    /// Set the distinct-ratio threshold for low-variety columns.
    pub fn low_variety_ratio(mut self, ratio: f64) -> Self {
        self.low_variety_ratio = Some(ratio);
        self
    }

    /// Set the overall score below which regeneration is recommended.
    pub fn regenerate_threshold(mut self, threshold: f64) -> Self {
        self.regenerate_threshold = Some(threshold);
        self
    }

    /// Set the per-issue penalty for the consistency score.
    pub fn consistency_penalty(mut self, penalty: f64) -> Self {
        self.consistency_penalty = Some(penalty);
        self
    }

    /// Set the per-issue penalty for the range-validity score.
    pub fn range_penalty(mut self, penalty: f64) -> Self {
        self.range_penalty = Some(penalty);
        self
    }

    /// Set how many frequent values are kept per categorical column.
    pub fn top_values(mut self, limit: usize) -> Self {
        self.top_values = Some(limit);
        self
    }

    /// Enable or disable running independent stages concurrently.
    pub fn parallel_stages(mut self, parallel: bool) -> Self {
        self.parallel_stages = Some(parallel);
        self
    }

    /// Limit schema inference to the first `rows` rows.
    pub fn infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Replace the delimiter candidates used for sniffing.
    pub fn sniff_candidates(mut self, candidates: impl Into<Vec<u8>>) -> Self {
        self.sniff_candidates = Some(candidates.into());
        self
    }

    /// Replace the cell values read as missing.
    pub fn null_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalyzerConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalyzerConfig, ConfigValidationError> {
        let defaults = AnalyzerConfig::default();
        let config = AnalyzerConfig {
            min_recommended_rows: self
                .min_recommended_rows
                .unwrap_or(defaults.min_recommended_rows),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            correlation_threshold: self
                .correlation_threshold
                .unwrap_or(defaults.correlation_threshold),
            low_variety_ratio: self.low_variety_ratio.unwrap_or(defaults.low_variety_ratio),
            regenerate_threshold: self
                .regenerate_threshold
                .unwrap_or(defaults.regenerate_threshold),
            consistency_penalty: self
                .consistency_penalty
                .unwrap_or(defaults.consistency_penalty),
            range_penalty: self.range_penalty.unwrap_or(defaults.range_penalty),
            top_values: self.top_values.unwrap_or(defaults.top_values),
            parallel_stages: self.parallel_stages.unwrap_or(defaults.parallel_stages),
            loader: LoaderConfig {
                infer_schema_length: self.infer_schema_length,
                sniff_candidates: self
                    .sniff_candidates
                    .unwrap_or(defaults.loader.sniff_candidates),
                null_values: self.null_values.unwrap_or(defaults.loader.null_values),
            },
        };

        config.validate()?;
        Ok(config)
    }
}
