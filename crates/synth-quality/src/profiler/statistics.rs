//! Distribution statistics for numeric and categorical columns.

use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::types::{
    CategoricalSummary, ColumnKind, ColumnProfile, NumericSummary, StatisticalSummary, ValueCount,
};
use crate::utils::{column_f64_present, column_strings, mean, quantile_sorted, sample_std, sort_f64};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

pub struct StatisticalSummarizer;

impl StatisticalSummarizer {
    /// Summarize every column described by `profiles`.
    ///
    /// Numeric columns without any present value are omitted.
    pub fn summarize(
        df: &DataFrame,
        profiles: &[ColumnProfile],
        config: &AnalyzerConfig,
    ) -> Result<StatisticalSummary> {
        let rows = df.height();
        let mut summary = StatisticalSummary::default();

        for profile in profiles {
            match profile.kind {
                ColumnKind::Numeric => {
                    let values = column_f64_present(df, &profile.name)?;
                    match Self::numeric_summary(&profile.name, values, rows, config.iqr_multiplier)
                    {
                        Some(numeric) => summary.numeric.push(numeric),
                        None => debug!("Skipping '{}': no present values", profile.name),
                    }
                }
                ColumnKind::Categorical => {
                    let values = column_strings(df, &profile.name)?;
                    summary.categorical.push(Self::categorical_summary(
                        &profile.name,
                        values.iter().flatten().map(String::as_str),
                        config.top_values,
                    ));
                }
            }
        }

        Ok(summary)
    }

    /// Five-number summary, moments and Tukey outliers of `values`.
    ///
    /// `rows` is the full row count (missing included) used for the outlier
    /// percentage. Returns `None` when `values` is empty.
    pub fn numeric_summary(
        column: &str,
        mut values: Vec<f64>,
        rows: usize,
        iqr_multiplier: f64,
    ) -> Option<NumericSummary> {
        let mean = mean(&values)?;
        let std = sample_std(&values);

        sort_f64(&mut values);
        let q1 = quantile_sorted(&values, 0.25);
        let median = quantile_sorted(&values, 0.5);
        let q3 = quantile_sorted(&values, 0.75);
        let iqr = q3 - q1;
        let lower_bound = q1 - iqr_multiplier * iqr;
        let upper_bound = q3 + iqr_multiplier * iqr;

        let outlier_count = values
            .iter()
            .filter(|v| **v < lower_bound || **v > upper_bound)
            .count();
        let outlier_percent = if rows == 0 {
            0.0
        } else {
            outlier_count as f64 / rows as f64 * 100.0
        };

        Some(NumericSummary {
            column: column.to_string(),
            count: values.len(),
            min: values[0],
            q1,
            median,
            q3,
            max: values[values.len() - 1],
            mean,
            std,
            outlier_count,
            outlier_percent,
            lower_bound,
            upper_bound,
        })
    }

    /// Frequency table of the present values of a column.
    ///
    /// Ordering is by count descending; equal counts keep first-seen order,
    /// which also decides the mode.
    pub fn categorical_summary<'a>(
        column: &str,
        values: impl IntoIterator<Item = &'a str>,
        top_values: usize,
    ) -> CategoricalSummary {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<ValueCount> = Vec::new();

        for value in values {
            match index.get(value) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(value, counts.len());
                    counts.push(ValueCount {
                        value: value.to_string(),
                        count: 1,
                    });
                }
            }
        }

        let distinct_count = counts.len();
        // Stable sort keeps first-seen order among ties.
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        let mode = counts.first().map(|v| v.value.clone());
        counts.truncate(top_values);

        CategoricalSummary {
            column: column.to_string(),
            distinct_count,
            mode,
            top_values: counts,
        }
    }
}
