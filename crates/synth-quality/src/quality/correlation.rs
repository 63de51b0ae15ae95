use crate::error::Result;
use crate::profiler::ColumnClassifier;
use crate::types::{ColumnProfile, Correlation};
use crate::utils::{column_f64, pearson_pairwise};
use polars::prelude::*;

/// Pairwise Pearson correlation between numeric columns.
pub struct CorrelationAnalyzer;

impl CorrelationAnalyzer {
    /// Pairs `(i, j)` with `i < j` in column order whose |r| exceeds
    /// `threshold`. Undefined coefficients are never reported.
    pub fn strong_correlations(
        df: &DataFrame,
        profiles: &[ColumnProfile],
        threshold: f64,
    ) -> Result<Vec<Correlation>> {
        let names = ColumnClassifier::numeric_names(profiles);
        if names.len() < 2 {
            return Ok(Vec::new());
        }

        let columns: Vec<Vec<Option<f64>>> = names
            .iter()
            .map(|name| column_f64(df, name))
            .collect::<Result<_>>()?;

        let mut correlations = Vec::new();
        for i in 0..names.len() {
            for j in (i + 1)..names.len() {
                let r = pearson_pairwise(&columns[i], &columns[j]);
                // NaN fails the comparison.
                if r.abs() > threshold {
                    correlations.push(Correlation {
                        column_a: names[i].to_string(),
                        column_b: names[j].to_string(),
                        coefficient: r,
                    });
                }
            }
        }

        Ok(correlations)
    }
}
