//! Human-readable EDA report.

use crate::types::{AnalysisResult, ColumnProfile};
use std::fmt;

const WIDE_RULE: usize = 80;
const NARROW_RULE: usize = 40;
/// Categorical columns with more distinct values get no distribution chart.
const MAX_CHART_DISTINCT: usize = 20;
const MAX_BAR_WIDTH: usize = 50;

/// Uniqueness classification of a column by distinct percentage.
pub fn uniqueness_status(distinct_percent: f64) -> &'static str {
    if distinct_percent > 95.0 {
        "Potential ID"
    } else if distinct_percent > 10.0 {
        "Normal"
    } else {
        "Low variety"
    }
}

/// One `█` per two percent, capped at fifty.
pub fn distribution_bar(percent: f64) -> String {
    let width = ((percent / 2.0).max(0.0) as usize).min(MAX_BAR_WIDTH);
    "█".repeat(width)
}

/// Renders every section of the report through [`fmt::Display`].
///
/// ```rust,ignore
/// println!("{}", TextReport::new(&result));
/// ```
pub struct TextReport<'a> {
    result: &'a AnalysisResult,
}

impl<'a> TextReport<'a> {
    pub fn new(result: &'a AnalysisResult) -> Self {
        Self { result }
    }

    fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", title)?;
        writeln!(f, "{}", "-".repeat(NARROW_RULE))
    }

    fn basic_info(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = &self.result.basic_info;
        writeln!(f, "{}", "=".repeat(WIDE_RULE))?;
        writeln!(f, "COMPREHENSIVE EDA ANALYSIS FOR SYNTHETIC DATASET")?;
        writeln!(f, "{}", "=".repeat(WIDE_RULE))?;
        writeln!(f)?;
        writeln!(f, "Dataset Shape: {} rows × {} columns", info.rows, info.columns)?;
        writeln!(f, "Memory Usage: {:.2} KB", info.memory_usage_kb)?;
        if let Some(size) = info.file_size_kb {
            writeln!(f, "File Size: {:.2} KB", size)?;
        }
        if let Some(strategy) = info.load_strategy {
            writeln!(f, "Load Strategy: {}", strategy.display_name())?;
        }
        for diagnostic in &info.load_diagnostics {
            writeln!(f, "  {}", diagnostic)?;
        }
        Ok(())
    }

    fn column_analysis(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::section(f, "COLUMN ANALYSIS")?;
        for (i, col) in self.result.column_info.iter().enumerate() {
            writeln!(
                f,
                "{:2}. {:<25} | {:<15} | Non-null: {}",
                i + 1,
                col.name,
                col.dtype,
                col.non_null_count
            )?;
        }
        Ok(())
    }

    fn quality_assessment(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::section(f, "DATA QUALITY ASSESSMENT")?;
        let qa = &self.result.quality_assessment;

        if qa.total_missing > 0 {
            writeln!(f, "Missing Values:")?;
            for missing in qa.columns_with_missing() {
                writeln!(
                    f,
                    "  {}: {} ({:.2}%)",
                    missing.column, missing.count, missing.percent
                )?;
            }
        } else {
            writeln!(f, "No missing values found")?;
        }

        writeln!(
            f,
            "Duplicate Rows: {} ({:.2}%)",
            qa.duplicate_count, qa.duplicate_percent
        )?;

        if qa.empty_strings.is_empty() {
            writeln!(f, "No empty string values found")
        } else {
            writeln!(f, "Empty String Values:")?;
            for empty in &qa.empty_strings {
                writeln!(f, "  {}: {}", empty.column, empty.count)?;
            }
            Ok(())
        }
    }

    fn statistical_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::section(f, "STATISTICAL SUMMARY")?;
        let summary = &self.result.statistical_summary;

        if !summary.numeric.is_empty() {
            writeln!(f, "Numerical Columns Summary:")?;
            writeln!(
                f,
                "  {:<20} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
                "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
            )?;
            for s in &summary.numeric {
                let std = s
                    .std
                    .map(|v| format!("{:.2}", v))
                    .unwrap_or_else(|| "NaN".to_string());
                writeln!(
                    f,
                    "  {:<20} {:>8} {:>10.2} {:>10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
                    truncate(&s.column, 20),
                    s.count,
                    s.mean,
                    std,
                    s.min,
                    s.q1,
                    s.median,
                    s.q3,
                    s.max
                )?;
            }

            writeln!(f)?;
            writeln!(f, "Outlier Analysis:")?;
            for s in &summary.numeric {
                writeln!(
                    f,
                    "  {}: {} outliers ({:.1}%)",
                    s.column, s.outlier_count, s.outlier_percent
                )?;
            }
        }

        if !summary.categorical.is_empty() {
            writeln!(f)?;
            writeln!(f, "Categorical Columns Summary:")?;
            for c in &summary.categorical {
                writeln!(
                    f,
                    "  {}: {} unique | Most common: '{}'",
                    c.column,
                    c.distinct_count,
                    c.mode.as_deref().unwrap_or("N/A")
                )?;
            }
        }
        Ok(())
    }

    fn uniqueness(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::section(f, "UNIQUENESS ANALYSIS")?;
        for col in &self.result.column_info {
            let percent = col.distinct_percent();
            writeln!(
                f,
                "{:<25}: {:4} unique ({:5.1}%) {}",
                col.name,
                col.distinct_count,
                percent,
                uniqueness_status(percent)
            )?;
        }
        Ok(())
    }

    fn value_distributions(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::section(f, "VALUE DISTRIBUTION ANALYSIS")?;
        let rows = self.result.basic_info.rows;

        for c in &self.result.statistical_summary.categorical {
            if c.distinct_count > MAX_CHART_DISTINCT {
                continue;
            }
            writeln!(f)?;
            writeln!(f, "{} - Value Distribution:", c.column)?;
            for vc in &c.top_values {
                let percent = if rows == 0 {
                    0.0
                } else {
                    vc.count as f64 / rows as f64 * 100.0
                };
                writeln!(
                    f,
                    "  {:<20} | {:4} ({:5.1}%) {}",
                    vc.value,
                    vc.count,
                    percent,
                    distribution_bar(percent)
                )?;
            }
        }
        Ok(())
    }

    fn issue_list(
        f: &mut fmt::Formatter<'_>,
        title: &str,
        heading: &str,
        empty: &str,
        issues: &[String],
    ) -> fmt::Result {
        Self::section(f, title)?;
        if issues.is_empty() {
            return writeln!(f, "{}", empty);
        }
        writeln!(f, "{}", heading)?;
        for issue in issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }

    fn correlations(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::section(f, "COLUMN RELATIONSHIP ANALYSIS")?;
        let correlations = &self.result.correlations;
        if correlations.is_empty() {
            return writeln!(f, "No high correlations found between numerical columns");
        }
        writeln!(f, "High Correlations:")?;
        for c in correlations {
            writeln!(f, "  {} ↔ {}: {:.3}", c.column_a, c.column_b, c.coefficient)?;
        }
        Ok(())
    }

    fn scores(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::section(f, "DATASET QUALITY SCORE")?;
        let s = &self.result.quality_scores;
        writeln!(f, "Completeness Score:   {:.1}%", s.completeness)?;
        writeln!(f, "Uniqueness Score:     {:.1}%", s.uniqueness)?;
        writeln!(f, "Consistency Score:    {:.1}%", s.consistency)?;
        writeln!(f, "Range Validity Score: {:.1}%", s.range_validity)?;
        writeln!(f, "Overall Quality Score: {:.1}%", s.overall)
    }

    fn recommendations(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::section(f, "RECOMMENDATIONS FOR IMPROVEMENT")?;
        let recommendations = &self.result.recommendations;
        if recommendations.is_empty() {
            return writeln!(f, "Dataset quality looks good! No major improvements needed.");
        }
        for (i, rec) in recommendations.iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, rec)?;
        }
        Ok(())
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.basic_info(f)?;
        self.column_analysis(f)?;
        self.quality_assessment(f)?;
        self.statistical_summary(f)?;
        self.uniqueness(f)?;
        self.value_distributions(f)?;
        Self::issue_list(
            f,
            "DATA CONSISTENCY CHECKS",
            "Consistency Issues Found:",
            "No major consistency issues detected",
            &self.result.consistency_issues,
        )?;
        self.correlations(f)?;
        Self::issue_list(
            f,
            "REALISTIC VALUE RANGES CHECK",
            "Potential Range Issues:",
            "Value ranges appear realistic",
            &self.result.range_issues,
        )?;
        self.scores(f)?;
        self.recommendations(f)?;

        writeln!(f)?;
        writeln!(f, "{}", "=".repeat(WIDE_RULE))?;
        writeln!(f, "EDA ANALYSIS COMPLETE")?;
        writeln!(f, "{}", "=".repeat(WIDE_RULE))
    }
}

/// Render the full report as a string.
pub fn render_text_report(result: &AnalysisResult) -> String {
    TextReport::new(result).to_string()
}

/// Column listing used by the feedback summary: `name: dtype` per line.
pub(crate) fn column_dtype_lines(columns: &[ColumnProfile]) -> String {
    columns
        .iter()
        .map(|c| format!("{}: {}", c.name, c.dtype))
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        out.push_str("...");
        out
    }
}
