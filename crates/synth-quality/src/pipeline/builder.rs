//! Main analysis pipeline.
//!
//! [`QualityPipeline`] wires the loader, the profiling stages, the quality
//! checks and the scorer together and produces an [`AnalysisResult`].

use crate::config::{AnalyzerConfig, ConfigValidationError};
use crate::error::{QualityError, Result};
use crate::loader::{LoadedTable, TableLoader};
use crate::pipeline::progress::{
    AnalysisStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::profiler::{ColumnClassifier, StatisticalSummarizer};
use crate::quality::{ConsistencyChecker, CorrelationAnalyzer, DataQualityAnalyzer};
use crate::scoring::{QualityScorer, RecommendationEngine, RecommendationInputs};
use crate::types::{
    AnalysisResult, BasicInfo, ColumnProfile, Correlation, QualityAssessment, StatisticalSummary,
};
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Outputs of the four stages that only read the table and profiles.
#[derive(Debug)]
struct IndependentStages {
    quality_assessment: QualityAssessment,
    statistical_summary: StatisticalSummary,
    consistency_issues: Vec<String>,
    range_issues: Vec<String>,
    correlations: Vec<Correlation>,
}

/// The quality analysis pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use synth_quality::{AnalyzerConfig, QualityPipeline};
///
/// let result = QualityPipeline::builder()
///     .config(AnalyzerConfig::builder().parallel_stages(true).build()?)
///     .build()?
///     .analyze_path("generated.csv")?;
///
/// println!("Overall quality: {:.1}", result.quality_scores.overall);
/// ```
pub struct QualityPipeline {
    config: AnalyzerConfig,
    loader: TableLoader,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(QualityPipeline: Send, Sync);

impl QualityPipeline {
    pub fn builder() -> QualityPipelineBuilder {
        QualityPipelineBuilder::default()
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Load a file through the fallback chain and analyze it.
    pub fn analyze_path(&self, path: impl AsRef<Path>) -> Result<AnalysisResult> {
        let path = path.as_ref();
        self.finish(self.load(|| self.loader.load_path(path)).and_then(|loaded| {
            info!("Analyzing {}", path.display());
            self.run(&loaded.df, Some(&loaded))
        }))
    }

    /// Load an in-memory buffer through the fallback chain and analyze it.
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<AnalysisResult> {
        self.finish(
            self.load(|| self.loader.load_bytes(bytes))
                .and_then(|loaded| self.run(&loaded.df, Some(&loaded))),
        )
    }

    /// Analyze a table produced by [`TableLoader`].
    pub fn analyze_loaded(&self, loaded: &LoadedTable) -> Result<AnalysisResult> {
        self.finish(self.run(&loaded.df, Some(loaded)))
    }

    /// Analyze a table that did not come from the loader.
    ///
    /// `basic_info.file_size_kb` is left empty.
    pub fn analyze(&self, df: &DataFrame) -> Result<AnalysisResult> {
        self.finish(self.run(df, None))
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn finish(&self, outcome: Result<AnalysisResult>) -> Result<AnalysisResult> {
        match outcome {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "Analysis complete: overall quality {:.1}",
                    result.quality_scores.overall
                )));
                Ok(result)
            }
            Err(e) => {
                error!("Analysis failed: {}", e);
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                Err(e)
            }
        }
    }

    fn load(&self, load: impl FnOnce() -> Result<LoadedTable>) -> Result<LoadedTable> {
        self.run_stage(AnalysisStage::Loading, load)
    }

    /// Run one stage, reporting its start and end.
    fn run_stage<T>(&self, stage: AnalysisStage, f: impl FnOnce() -> Result<T>) -> Result<T> {
        self.report_progress(ProgressUpdate::started(stage));
        let start = Instant::now();

        let output = f().map_err(|e| e.with_context(format!("{} failed", stage.display_name())))?;

        debug!("{} finished in {:?}", stage.display_name(), start.elapsed());
        self.report_progress(ProgressUpdate::finished(
            stage,
            format!("{} complete", stage.display_name()),
        ));
        Ok(output)
    }

    /// Run a stage whose failure leaves its output empty instead of
    /// aborting the analysis.
    fn recover_stage<T: Default>(
        &self,
        stage: AnalysisStage,
        f: impl FnOnce() -> Result<T>,
    ) -> T {
        match self.run_stage(stage, f) {
            Ok(output) => output,
            Err(e) => {
                warn!("{}; continuing with empty results", e);
                self.report_progress(ProgressUpdate::finished(
                    stage,
                    format!("{} skipped: {}", stage.display_name(), e),
                ));
                T::default()
            }
        }
    }

    fn run(&self, df: &DataFrame, source: Option<&LoadedTable>) -> Result<AnalysisResult> {
        let start = Instant::now();
        let basic_info = Self::basic_info(df, source);
        info!(
            "Dataset shape: {} rows x {} columns",
            basic_info.rows, basic_info.columns
        );
        if basic_info.rows == 0 {
            warn!("Dataset has no rows; statistics will be empty");
        }

        let profiles = self.run_stage(AnalysisStage::Profiling, || {
            ColumnClassifier::profile_columns(df)
        })?;
        debug!(
            "Numeric columns: {:?}; categorical columns: {:?}",
            ColumnClassifier::numeric_names(&profiles),
            ColumnClassifier::categorical_names(&profiles)
        );

        let stages = if self.config.parallel_stages {
            self.run_independent_parallel(df, &profiles)
        } else {
            self.run_independent_sequential(df, &profiles)
        };

        let result = self.assemble(basic_info, profiles, stages)?;
        info!(
            "Analysis finished in {:?}: {} consistency issues, {} range issues, {} correlations",
            start.elapsed(),
            result.consistency_issues.len(),
            result.range_issues.len(),
            result.correlations.len()
        );
        Ok(result)
    }

    /// Score the stage outputs and build the final result.
    fn assemble(
        &self,
        basic_info: BasicInfo,
        profiles: Vec<ColumnProfile>,
        stages: IndependentStages,
    ) -> Result<AnalysisResult> {
        let (quality_scores, recommendations) = self.run_stage(AnalysisStage::Scoring, || {
            let scores = QualityScorer::score(
                basic_info.rows,
                &profiles,
                stages.consistency_issues.len(),
                stages.range_issues.len(),
                &self.config,
            );
            let recommendations = RecommendationEngine::recommend(
                RecommendationInputs {
                    rows: basic_info.rows,
                    profiles: &profiles,
                    assessment: &stages.quality_assessment,
                    consistency_issue_count: stages.consistency_issues.len(),
                    range_issue_count: stages.range_issues.len(),
                    scores: &scores,
                },
                &self.config,
            );
            Ok((scores, recommendations))
        })?;

        Ok(AnalysisResult {
            basic_info,
            column_info: profiles,
            quality_assessment: stages.quality_assessment,
            statistical_summary: stages.statistical_summary,
            consistency_issues: stages.consistency_issues,
            correlations: stages.correlations,
            range_issues: stages.range_issues,
            quality_scores,
            recommendations,
        })
    }

    fn consistency_checks(
        df: &DataFrame,
        profiles: &[ColumnProfile],
    ) -> Result<(Vec<String>, Vec<String>)> {
        Ok((
            ConsistencyChecker::consistency_issues(df, profiles)?,
            ConsistencyChecker::range_issues(df, profiles)?,
        ))
    }

    fn run_independent_sequential(
        &self,
        df: &DataFrame,
        profiles: &[ColumnProfile],
    ) -> IndependentStages {
        let quality_assessment = self.recover_stage(AnalysisStage::QualityAssessment, || {
            DataQualityAnalyzer::assess(df, profiles)
        });
        let statistical_summary = self.recover_stage(AnalysisStage::Statistics, || {
            StatisticalSummarizer::summarize(df, profiles, &self.config)
        });
        let (consistency_issues, range_issues) =
            self.recover_stage(AnalysisStage::ConsistencyChecks, || {
                Self::consistency_checks(df, profiles)
            });
        let correlations = self.recover_stage(AnalysisStage::Correlations, || {
            CorrelationAnalyzer::strong_correlations(
                df,
                profiles,
                self.config.correlation_threshold,
            )
        });

        IndependentStages {
            quality_assessment,
            statistical_summary,
            consistency_issues,
            range_issues,
            correlations,
        }
    }

    /// The four stages only read the table and profiles, so each one gets
    /// its own scoped thread. Progress for them is reported after all
    /// threads have joined, in stage order.
    fn run_independent_parallel(
        &self,
        df: &DataFrame,
        profiles: &[ColumnProfile],
    ) -> IndependentStages {
        debug!("Running independent stages on scoped threads");
        let config = &self.config;
        let (quality, statistics, consistency, correlations) = thread::scope(|scope| {
            let quality = scope.spawn(|| DataQualityAnalyzer::assess(df, profiles));
            let statistics =
                scope.spawn(|| StatisticalSummarizer::summarize(df, profiles, config));
            let consistency = scope.spawn(|| Self::consistency_checks(df, profiles));
            let correlations = scope.spawn(|| {
                CorrelationAnalyzer::strong_correlations(
                    df,
                    profiles,
                    config.correlation_threshold,
                )
            });

            (
                join_stage(quality, AnalysisStage::QualityAssessment),
                join_stage(statistics, AnalysisStage::Statistics),
                join_stage(consistency, AnalysisStage::ConsistencyChecks),
                join_stage(correlations, AnalysisStage::Correlations),
            )
        });

        let quality_assessment = self.recover_stage(AnalysisStage::QualityAssessment, || quality);
        let statistical_summary = self.recover_stage(AnalysisStage::Statistics, || statistics);
        let (consistency_issues, range_issues) =
            self.recover_stage(AnalysisStage::ConsistencyChecks, || consistency);
        let correlations = self.recover_stage(AnalysisStage::Correlations, || correlations);

        IndependentStages {
            quality_assessment,
            statistical_summary,
            consistency_issues,
            range_issues,
            correlations,
        }
    }

    fn basic_info(df: &DataFrame, source: Option<&LoadedTable>) -> BasicInfo {
        BasicInfo {
            rows: df.height(),
            columns: df.width(),
            memory_usage_kb: df.estimated_size() as f64 / 1024.0,
            file_size_kb: source.map(|s| s.source_bytes as f64 / 1024.0),
            load_strategy: source.map(|s| s.strategy),
            load_diagnostics: source.map(|s| s.diagnostics.clone()).unwrap_or_default(),
        }
    }
}

/// A panicking stage thread becomes an internal error for that stage.
fn join_stage<T>(
    handle: thread::ScopedJoinHandle<'_, Result<T>>,
    stage: AnalysisStage,
) -> Result<T> {
    handle.join().unwrap_or_else(|_| {
        Err(QualityError::Internal(format!(
            "{} thread panicked",
            stage.display_name()
        )))
    })
}

/// Builder for [`QualityPipeline`].
#[derive(Default)]
pub struct QualityPipelineBuilder {
    config: Option<AnalyzerConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(QualityPipelineBuilder: Send);

impl QualityPipelineBuilder {
    pub fn config(mut self, config: AnalyzerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    pub fn build(self) -> std::result::Result<QualityPipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(QualityPipeline {
            loader: TableLoader::new(config.loader.clone()),
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn sample_df() -> DataFrame {
        df![
            "id" => [1i64, 2, 3, 4],
            "age" => [Some(30i64), Some(-5), Some(200), None],
            "color" => ["Red", "red", "RED", "blue"],
            "price" => [10.0f64, 20.0, 30.0, 40.0],
        ]
        .unwrap()
    }

    // ==================== builder tests ====================

    #[test]
    fn test_build_with_defaults() {
        let pipeline = QualityPipeline::builder().build().unwrap();
        assert_eq!(pipeline.config(), &AnalyzerConfig::default());
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let mut config = AnalyzerConfig::default();
        config.top_values = 0;
        assert!(QualityPipeline::builder().config(config).build().is_err());
    }

    // ==================== analyze tests ====================

    #[test]
    fn test_analyze_dataframe() {
        let result = QualityPipeline::builder()
            .build()
            .unwrap()
            .analyze(&sample_df())
            .unwrap();

        assert_eq!(result.basic_info.rows, 4);
        assert_eq!(result.basic_info.columns, 4);
        assert_eq!(result.basic_info.file_size_kb, None);
        assert_eq!(result.column_info.len(), 4);
        let issues = &result.consistency_issues;
        assert!(issues.contains(&"color: Mixed case values detected".to_string()));
        assert!(issues.contains(&"age: 1 negative values".to_string()));
        assert_eq!(
            result.range_issues,
            vec!["age: Age range -5-200 unrealistic".to_string()]
        );
        assert!(result.quality_scores.completeness < 100.0);
        assert_eq!(
            result.recommendations.first().map(String::as_str),
            Some("Increase dataset size to 1000+ rows (current: 4)")
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let df = sample_df();
        let sequential = QualityPipeline::builder()
            .build()
            .unwrap()
            .analyze(&df)
            .unwrap();
        let parallel = QualityPipeline::builder()
            .config(AnalyzerConfig::builder().parallel_stages(true).build().unwrap())
            .build()
            .unwrap()
            .analyze(&df)
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_progress_reported_for_every_stage() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&stages);

        QualityPipeline::builder()
            .on_progress(move |update| sink.lock().unwrap().push(update.stage))
            .build()
            .unwrap()
            .analyze_bytes(b"a,b\n1,x\n2,y\n")
            .unwrap();

        let stages = stages.lock().unwrap();
        for stage in [
            AnalysisStage::Loading,
            AnalysisStage::Profiling,
            AnalysisStage::QualityAssessment,
            AnalysisStage::Statistics,
            AnalysisStage::ConsistencyChecks,
            AnalysisStage::Correlations,
            AnalysisStage::Scoring,
        ] {
            assert!(stages.contains(&stage), "missing {:?}", stage);
        }
        assert_eq!(stages.last(), Some(&AnalysisStage::Complete));
    }

    #[test]
    fn test_failure_reports_failed_stage() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&stages);

        let err = QualityPipeline::builder()
            .on_progress(move |update| sink.lock().unwrap().push(update.stage))
            .build()
            .unwrap()
            .analyze_bytes(b"")
            .unwrap_err();

        assert_eq!(err.error_code(), "INSUFFICIENT_DATA");
        assert!(err.is_input_error());
        assert_eq!(stages.lock().unwrap().last(), Some(&AnalysisStage::Failed));
    }

    // ==================== stage failure tests ====================

    #[test]
    fn test_failed_stage_still_scores_and_recommends() {
        let updates = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&updates);
        let pipeline = QualityPipeline::builder()
            .on_progress(move |update| sink.lock().unwrap().push(update))
            .build()
            .unwrap();

        let df = sample_df();
        let profiles = ColumnClassifier::profile_columns(&df).unwrap();
        let mut stages = pipeline.run_independent_sequential(&df, &profiles);
        stages.quality_assessment = pipeline.recover_stage(AnalysisStage::QualityAssessment, || {
            Err(QualityError::Internal("assessment unavailable".to_string()))
        });
        let result = pipeline
            .assemble(QualityPipeline::basic_info(&df, None), profiles, stages)
            .unwrap();

        assert_eq!(result.quality_assessment, QualityAssessment::default());
        assert!(!result.consistency_issues.is_empty());
        assert!(result.quality_scores.overall > 0.0);
        assert_eq!(
            result.recommendations.first().map(String::as_str),
            Some("Increase dataset size to 1000+ rows (current: 4)")
        );

        let updates = updates.lock().unwrap();
        let skipped = updates
            .iter()
            .find(|u| u.message.contains("skipped"))
            .unwrap();
        assert_eq!(skipped.stage, AnalysisStage::QualityAssessment);
        assert_eq!(skipped.stage_progress, 1.0);
        assert!(skipped.message.starts_with("Assessing Quality skipped:"));
        assert!(skipped.message.contains("assessment unavailable"));
    }

    #[test]
    fn test_panicking_stage_thread_is_internal_error() {
        let outcome: Result<Vec<Correlation>> = thread::scope(|scope| {
            let handle = scope.spawn(|| -> Result<Vec<Correlation>> { panic!("stage crashed") });
            join_stage(handle, AnalysisStage::Correlations)
        });

        let err = outcome.unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert!(err.to_string().contains("Analyzing Correlations thread panicked"));
    }

    #[test]
    fn test_recovered_panic_leaves_stage_output_empty() {
        let pipeline = QualityPipeline::builder().build().unwrap();
        let outcome: Result<Vec<Correlation>> = thread::scope(|scope| {
            let handle = scope.spawn(|| -> Result<Vec<Correlation>> { panic!("stage crashed") });
            join_stage(handle, AnalysisStage::Correlations)
        });
        let correlations = pipeline.recover_stage(AnalysisStage::Correlations, || outcome);
        assert!(correlations.is_empty());
    }

    #[test]
    fn test_parallel_progress_is_monotonic() {
        let updates = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&updates);

        QualityPipeline::builder()
            .config(AnalyzerConfig::builder().parallel_stages(true).build().unwrap())
            .on_progress(move |update| sink.lock().unwrap().push(update))
            .build()
            .unwrap()
            .analyze_bytes(b"id,price,qty\n1,10.5,3\n2,20.0,4\n3,15.25,8\n")
            .unwrap();

        let updates = updates.lock().unwrap();
        for pair in updates.windows(2) {
            assert!(
                pair[1].progress + 1e-6 >= pair[0].progress,
                "{:?} -> {:?}",
                pair[0],
                pair[1]
            );
        }
        let stages: Vec<_> = updates.iter().map(|u| u.stage).collect();
        let position = |stage| stages.iter().position(|s| *s == stage).unwrap();
        assert!(position(AnalysisStage::QualityAssessment) < position(AnalysisStage::Statistics));
        assert!(position(AnalysisStage::ConsistencyChecks) < position(AnalysisStage::Correlations));
        assert_eq!(stages.last(), Some(&AnalysisStage::Complete));
    }

    #[test]
    fn test_analyze_bytes_records_source_size() {
        let bytes = b"a,b\n1,2\n3,4\n";
        let result = QualityPipeline::builder()
            .build()
            .unwrap()
            .analyze_bytes(bytes)
            .unwrap();
        let expected = bytes.len() as f64 / 1024.0;
        assert_eq!(result.basic_info.file_size_kb, Some(expected));
        assert!(result.basic_info.load_strategy.is_some());
    }
}
