use crate::error::Result;
use crate::types::{ColumnKind, ColumnProfile, EmptyStringStat, MissingValueStat, QualityAssessment};
use crate::utils::column_strings;
use polars::prelude::*;

/// Missing values, duplicate rows and blank strings.
pub struct DataQualityAnalyzer;

impl DataQualityAnalyzer {
    pub fn assess(df: &DataFrame, profiles: &[ColumnProfile]) -> Result<QualityAssessment> {
        let rows = df.height();

        let missing_values: Vec<MissingValueStat> = profiles
            .iter()
            .map(|p| MissingValueStat {
                column: p.name.clone(),
                count: p.missing_count,
                percent: percent_of(p.missing_count, rows),
            })
            .collect();
        let total_missing = missing_values.iter().map(|m| m.count).sum();

        let duplicate_count = Self::count_duplicates(df)?;

        let mut empty_strings = Vec::new();
        for profile in profiles.iter().filter(|p| p.kind == ColumnKind::Categorical) {
            let count = column_strings(df, &profile.name)?
                .iter()
                .flatten()
                .filter(|v| v.trim().is_empty())
                .count();
            if count > 0 {
                empty_strings.push(EmptyStringStat {
                    column: profile.name.clone(),
                    count,
                });
            }
        }

        Ok(QualityAssessment {
            missing_values,
            total_missing,
            duplicate_count,
            duplicate_percent: percent_of(duplicate_count, rows),
            empty_strings,
        })
    }

    /// Rows identical to an earlier row. Missing compares equal to missing.
    pub fn count_duplicates(df: &DataFrame) -> Result<usize> {
        if df.height() == 0 || df.width() == 0 {
            return Ok(0);
        }
        let unique = df.unique::<&str, &str>(None, UniqueKeepStrategy::First, None)?;
        Ok(df.height() - unique.height())
    }
}

fn percent_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}
