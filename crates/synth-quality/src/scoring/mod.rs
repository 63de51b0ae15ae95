//! Quality scores and recommendations.
//!
//! Scores are in `[0, 100]`:
//!
//! | score          | formula                                         |
//! |----------------|-------------------------------------------------|
//! | completeness   | `(1 - missing_cells / cells) * 100`             |
//! | uniqueness     | `min(100, sum(distinct per column) / cells * 100)` |
//! | consistency    | `max(0, 100 - penalty * consistency_issues)`    |
//! | range_validity | `max(0, 100 - penalty * range_issues)`          |
//! | overall        | mean of the four                                |

mod recommendations;

pub use recommendations::{RecommendationEngine, RecommendationInputs};

use crate::config::AnalyzerConfig;
use crate::types::{ColumnProfile, QualityScores};

pub struct QualityScorer;

impl QualityScorer {
    pub fn score(
        rows: usize,
        profiles: &[ColumnProfile],
        consistency_issue_count: usize,
        range_issue_count: usize,
        config: &AnalyzerConfig,
    ) -> QualityScores {
        let cells = rows * profiles.len();
        let missing: usize = profiles.iter().map(|p| p.missing_count).sum();
        let distinct: usize = profiles.iter().map(|p| p.distinct_count).sum();

        let (completeness, uniqueness) = if cells == 0 {
            (100.0, 0.0)
        } else {
            let cells = cells as f64;
            (
                (1.0 - missing as f64 / cells) * 100.0,
                (distinct as f64 / cells * 100.0).min(100.0),
            )
        };

        let consistency =
            (100.0 - config.consistency_penalty * consistency_issue_count as f64).max(0.0);
        let range_validity = (100.0 - config.range_penalty * range_issue_count as f64).max(0.0);
        let overall = (completeness + uniqueness + consistency + range_validity) / 4.0;

        QualityScores {
            completeness,
            uniqueness,
            consistency,
            range_validity,
            overall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnKind;

    fn profile(name: &str, missing: usize, distinct: usize, rows: usize) -> ColumnProfile {
        ColumnProfile {
            name: name.to_string(),
            dtype: "i64".to_string(),
            kind: ColumnKind::Numeric,
            non_null_count: rows - missing,
            missing_count: missing,
            distinct_count: distinct,
            distinct_ratio: distinct as f64 / rows as f64,
        }
    }

    #[test]
    fn test_complete_table_scores_full_completeness() {
        let profiles = vec![profile("a", 0, 4, 4), profile("b", 0, 4, 4)];
        let scores = QualityScorer::score(4, &profiles, 0, 0, &AnalyzerConfig::default());
        assert_eq!(scores.completeness, 100.0);
        assert_eq!(scores.uniqueness, 100.0);
        assert_eq!(scores.overall, 100.0);
    }

    #[test]
    fn test_missing_cells_lower_completeness() {
        let profiles = vec![profile("a", 1, 3, 4), profile("b", 0, 2, 4)];
        let scores = QualityScorer::score(4, &profiles, 0, 0, &AnalyzerConfig::default());
        assert!((scores.completeness - 87.5).abs() < 1e-12);
        assert!((scores.uniqueness - 62.5).abs() < 1e-12);
        assert!(scores.completeness < 100.0);
    }

    #[test]
    fn test_penalties_clamp_at_zero() {
        let profiles = vec![profile("a", 0, 4, 4)];
        let scores = QualityScorer::score(4, &profiles, 3, 10, &AnalyzerConfig::default());
        assert_eq!(scores.consistency, 70.0);
        assert_eq!(scores.range_validity, 0.0);
    }

    #[test]
    fn test_overall_is_mean_of_subscores() {
        let profiles = vec![profile("a", 2, 1, 4)];
        let s = QualityScorer::score(4, &profiles, 1, 1, &AnalyzerConfig::default());
        let expected = (s.completeness + s.uniqueness + s.consistency + s.range_validity) / 4.0;
        assert!((s.overall - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty_table_does_not_divide_by_zero() {
        let scores = QualityScorer::score(0, &[], 0, 0, &AnalyzerConfig::default());
        assert_eq!(scores.completeness, 100.0);
        assert_eq!(scores.uniqueness, 0.0);
        assert!(scores.overall.is_finite());
    }
}
