//! Progress reporting for analysis runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use synth_quality::QualityPipeline;
//!
//! let result = QualityPipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .analyze_path("data.csv")?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    /// Reading and parsing the input
    Loading,
    /// Classifying columns
    Profiling,
    /// Missing values, duplicates and blank strings
    QualityAssessment,
    /// Numeric and categorical summaries
    Statistics,
    /// Case, whitespace, negative-value and range checks
    ConsistencyChecks,
    /// Pairwise correlations
    Correlations,
    /// Scores and recommendations
    Scoring,
    /// Run completed successfully
    Complete,
    /// Run failed with an error
    Failed,
}

impl AnalysisStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Data",
            Self::Profiling => "Profiling Columns",
            Self::QualityAssessment => "Assessing Quality",
            Self::Statistics => "Summarizing Statistics",
            Self::ConsistencyChecks => "Checking Consistency",
            Self::Correlations => "Analyzing Correlations",
            Self::Scoring => "Scoring",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the whole run taken by this stage (0.0 - 1.0).
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loading => 0.20,
            Self::Profiling => 0.10,
            Self::QualityAssessment => 0.15,
            Self::Statistics => 0.20,
            Self::ConsistencyChecks => 0.15,
            Self::Correlations => 0.15,
            Self::Scoring => 0.05,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Loading => 0.0,
            Self::Profiling => 0.20,
            Self::QualityAssessment => 0.30,
            Self::Statistics => 0.45,
            Self::ConsistencyChecks => 0.65,
            Self::Correlations => 0.80,
            Self::Scoring => 0.95,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// A single progress notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: AnalysisStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    pub message: String,
}

impl ProgressUpdate {
    pub fn new(stage: AnalysisStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    /// Update marking the start of `stage`.
    pub fn started(stage: AnalysisStage) -> Self {
        Self::new(stage, 0.0, format!("{}...", stage.display_name()))
    }

    /// Update marking the end of `stage`.
    pub fn finished(stage: AnalysisStage, message: impl Into<String>) -> Self {
        Self::new(stage, 1.0, message)
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: AnalysisStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: AnalysisStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

/// Receives progress updates during an analysis run.
///
/// With parallel stages enabled, `report` is called from several threads.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const WORK_STAGES: [AnalysisStage; 7] = [
        AnalysisStage::Loading,
        AnalysisStage::Profiling,
        AnalysisStage::QualityAssessment,
        AnalysisStage::Statistics,
        AnalysisStage::ConsistencyChecks,
        AnalysisStage::Correlations,
        AnalysisStage::Scoring,
    ];

    #[test]
    fn test_weights_sum_to_one() {
        let total: f32 = WORK_STAGES.iter().map(|s| s.weight()).sum();
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_base_progress_is_cumulative() {
        let mut expected = 0.0f32;
        for stage in WORK_STAGES {
            assert!((stage.base_progress() - expected).abs() < 1e-5, "{:?}", stage);
            expected += stage.weight();
        }
    }

    #[test]
    fn test_progress_update_clamps() {
        let update = ProgressUpdate::new(AnalysisStage::Scoring, 5.0, "x");
        assert_eq!(update.stage_progress, 1.0);
        assert!(update.progress <= 1.0);
    }

    #[test]
    fn test_started_message() {
        let update = ProgressUpdate::started(AnalysisStage::Profiling);
        assert_eq!(update.message, "Profiling Columns...");
        assert!((update.progress - 0.20).abs() < 1e-6);
    }

    #[test]
    fn test_closure_reporter() {
        let seen = Mutex::new(Vec::new());
        let reporter = ClosureProgressReporter::new(|u: ProgressUpdate| {
            seen.lock().unwrap().push(u.stage);
        });
        reporter.report(ProgressUpdate::complete("done"));
        reporter.report(ProgressUpdate::failed("boom"));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![AnalysisStage::Complete, AnalysisStage::Failed]
        );
    }

    #[test]
    fn test_stage_serializes_snake_case() {
        let json = serde_json::to_string(&AnalysisStage::QualityAssessment).unwrap();
        assert_eq!(json, "\"quality_assessment\"");
    }
}
