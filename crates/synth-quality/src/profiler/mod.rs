//! Column profiling: classification and statistical summaries.
//!
//! - [`ColumnClassifier`] splits columns into numeric and categorical and
//!   records their cardinality.
//! - [`StatisticalSummarizer`] describes the distribution of each column.

mod statistics;

pub use statistics::StatisticalSummarizer;

use crate::error::Result;
use crate::types::{ColumnKind, ColumnProfile};
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use tracing::debug;

/// Classifies columns by storage dtype.
pub struct ColumnClassifier;

impl ColumnClassifier {
    /// Profile every column of `df`, in table order.
    pub fn profile_columns(df: &DataFrame) -> Result<Vec<ColumnProfile>> {
        let rows = df.height();
        let mut profiles = Vec::with_capacity(df.width());

        for column in df.get_columns() {
            let series = column.as_materialized_series();
            let missing_count = series.null_count();
            let distinct_count = series.drop_nulls().n_unique()?;
            let distinct_ratio = if rows == 0 {
                0.0
            } else {
                distinct_count as f64 / rows as f64
            };
            let kind = if is_numeric_dtype(series.dtype()) {
                ColumnKind::Numeric
            } else {
                ColumnKind::Categorical
            };

            debug!(
                "Column '{}': {:?}, {} distinct, {} missing",
                series.name(),
                kind,
                distinct_count,
                missing_count
            );

            profiles.push(ColumnProfile {
                name: series.name().to_string(),
                dtype: series.dtype().to_string(),
                kind,
                non_null_count: rows - missing_count,
                missing_count,
                distinct_count,
                distinct_ratio,
            });
        }

        Ok(profiles)
    }

    /// Names of the numeric columns, in table order.
    pub fn numeric_names(profiles: &[ColumnProfile]) -> Vec<&str> {
        profiles
            .iter()
            .filter(|p| p.kind == ColumnKind::Numeric)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Names of the categorical columns, in table order.
    pub fn categorical_names(profiles: &[ColumnProfile]) -> Vec<&str> {
        profiles
            .iter()
            .filter(|p| p.kind == ColumnKind::Categorical)
            .map(|p| p.name.as_str())
            .collect()
    }
}
