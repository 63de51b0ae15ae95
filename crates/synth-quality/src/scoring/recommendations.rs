use crate::config::AnalyzerConfig;
use crate::types::{ColumnProfile, QualityAssessment, QualityScores};

/// Everything the recommendation rules look at.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationInputs<'a> {
    pub rows: usize,
    pub profiles: &'a [ColumnProfile],
    pub assessment: &'a QualityAssessment,
    pub consistency_issue_count: usize,
    pub range_issue_count: usize,
    pub scores: &'a QualityScores,
}

pub struct RecommendationEngine;

impl RecommendationEngine {
    /// Ordered list of recommendations. Each rule contributes at most once
    /// and rules always appear in the same relative order.
    pub fn recommend(inputs: RecommendationInputs<'_>, config: &AnalyzerConfig) -> Vec<String> {
        let mut recommendations = Vec::new();

        if inputs.rows < config.min_recommended_rows {
            recommendations.push(format!(
                "Increase dataset size to {}+ rows (current: {})",
                config.min_recommended_rows, inputs.rows
            ));
        }

        if inputs.assessment.duplicate_count > 0 {
            recommendations.push("Remove duplicate rows".to_string());
        }

        if inputs.assessment.total_missing > 0 {
            recommendations.push("Address missing values".to_string());
        }

        if inputs.consistency_issue_count > 0 {
            recommendations.push("Fix data consistency issues".to_string());
        }

        if inputs.range_issue_count > 0 {
            recommendations.push("Correct unrealistic value ranges".to_string());
        }

        let low_variety: Vec<&str> = inputs
            .profiles
            .iter()
            .filter(|p| p.distinct_ratio < config.low_variety_ratio && p.distinct_count > 1)
            .map(|p| p.name.as_str())
            .collect();
        if !low_variety.is_empty() {
            recommendations.push(format!("Increase variety in: {}", low_variety.join(", ")));
        }

        if inputs.scores.overall < config.regenerate_threshold {
            recommendations.push(format!(
                "Consider regenerating dataset (quality < {}%)",
                config.regenerate_threshold
            ));
        }

        recommendations
    }
}
