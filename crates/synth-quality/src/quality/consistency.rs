//! Consistency and value-range checks driven by column names.
//!
//! The keyword rules are matched against the lowercased column name by
//! substring. Range rules are evaluated in a fixed priority order and only
//! the first matching rule reports for a column.

use crate::error::Result;
use crate::types::{ColumnKind, ColumnProfile};
use crate::utils::{column_f64_present, column_strings};
use polars::prelude::*;
use std::collections::HashSet;

/// Names that imply a value can never be negative.
const NON_NEGATIVE_KEYWORDS: [&str; 7] =
    ["price", "cost", "amount", "quantity", "count", "age", "rating"];

const MAX_REALISTIC_AGE: f64 = 120.0;
const MAX_RATING: f64 = 10.0;
const MAX_PERCENT: f64 = 100.0;

pub struct ConsistencyChecker;

impl ConsistencyChecker {
    /// Case and whitespace checks on categorical columns, negative-value
    /// checks on numeric columns. Issues follow column order.
    pub fn consistency_issues(df: &DataFrame, profiles: &[ColumnProfile]) -> Result<Vec<String>> {
        let mut issues = Vec::new();

        for profile in profiles {
            match profile.kind {
                ColumnKind::Categorical => {
                    let values = column_strings(df, &profile.name)?;
                    issues.extend(Self::text_issues(
                        &profile.name,
                        values.iter().flatten().map(String::as_str),
                    ));
                }
                ColumnKind::Numeric => {
                    if has_keyword(&profile.name, &NON_NEGATIVE_KEYWORDS) {
                        let negatives = column_f64_present(df, &profile.name)?
                            .into_iter()
                            .filter(|v| *v < 0.0)
                            .count();
                        if negatives > 0 {
                            issues.push(format!("{}: {} negative values", profile.name, negatives));
                        }
                    }
                }
            }
        }

        Ok(issues)
    }

    /// Keyword-driven range checks on numeric columns.
    pub fn range_issues(df: &DataFrame, profiles: &[ColumnProfile]) -> Result<Vec<String>> {
        let mut issues = Vec::new();

        for profile in profiles.iter().filter(|p| p.kind == ColumnKind::Numeric) {
            let values = column_f64_present(df, &profile.name)?;
            let Some((min, max)) = min_max(&values) else {
                continue;
            };
            let float_column = df.column(&profile.name)?.dtype().is_float();
            if let Some(issue) = Self::range_issue(&profile.name, min, max, float_column) {
                issues.push(issue);
            }
        }

        Ok(issues)
    }

    /// Mixed-case and whitespace findings for the present values of a column.
    pub fn text_issues<'a>(column: &str, values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut distinct: HashSet<&str> = HashSet::new();
        let mut distinct_lower: HashSet<String> = HashSet::new();
        let mut padded = 0usize;

        for value in values {
            if distinct.insert(value) {
                distinct_lower.insert(value.to_lowercase());
            }
            if value.len() != value.trim().len() {
                padded += 1;
            }
        }

        let mut issues = Vec::new();
        if distinct.len() != distinct_lower.len() {
            issues.push(format!("{}: Mixed case values detected", column));
        }
        if padded > 0 {
            issues.push(format!(
                "{}: {} values with leading/trailing spaces",
                column, padded
            ));
        }
        issues
    }

    /// First matching range rule for a column with the given extremes.
    ///
    /// Extremes of float columns always carry a decimal part (`3.0`).
    pub fn range_issue(column: &str, min: f64, max: f64, float_column: bool) -> Option<String> {
        let name = column.to_lowercase();
        let show = |v: f64| format_extreme(v, float_column);

        if name.contains("age") && (min < 0.0 || max > MAX_REALISTIC_AGE) {
            Some(format!(
                "{}: Age range {}-{} unrealistic",
                column,
                show(min),
                show(max)
            ))
        } else if (name.contains("price") || name.contains("cost")) && min < 0.0 {
            Some(format!("{}: Negative prices found", column))
        } else if name.contains("rating") && (min < 0.0 || max > MAX_RATING) {
            Some(format!(
                "{}: Rating range {}-{} outside 0-10 scale",
                column,
                show(min),
                show(max)
            ))
        } else if (name.contains("percent") || name.contains("rate") || name.contains('%'))
            && (min < 0.0 || max > MAX_PERCENT)
        {
            Some(format!("{}: Percentage values outside 0-100% range", column))
        } else {
            None
        }
    }
}

fn format_extreme(value: f64, float_column: bool) -> String {
    if float_column && value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn has_keyword(column: &str, keywords: &[&str]) -> bool {
    let name = column.to_lowercase();
    keywords.iter().any(|k| name.contains(k))
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
