//! Data Quality Profiling Library
//!
//! Profiles generated tabular datasets and scores how usable they are,
//! built with Rust and Polars.
//!
//! # Overview
//!
//! - **Resilient Loading**: a five-strategy CSV fallback chain with repair
//! - **Column Profiling**: numeric/categorical classification and cardinality
//! - **Quality Assessment**: missing values, duplicate rows, blank strings
//! - **Statistics**: quartiles, moments, IQR outliers, frequency tables
//! - **Heuristic Checks**: case, whitespace, negative values, unrealistic ranges
//! - **Correlations**: strongly correlated numeric pairs
//! - **Scoring**: four sub-scores, an overall score and recommendations
//! - **Reporting**: text report, feedback summary and JSON report files
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use synth_quality::{AnalyzerConfig, QualityPipeline, render_text_report};
//!
//! let result = QualityPipeline::builder()
//!     .config(AnalyzerConfig::builder().parallel_stages(true).build()?)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .analyze_path("generated.csv")?;
//!
//! println!("{}", render_text_report(&result));
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod scoring;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    AnalyzerConfig, AnalyzerConfigBuilder, ConfigValidationError, DEFAULT_NULL_VALUES, LoaderConfig,
};
pub use error::{QualityError, Result as QualityResult, ResultExt};
pub use loader::{LoadStrategy, LoadedTable, TableLoader};
pub use pipeline::{
    AnalysisStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate, QualityPipeline,
    QualityPipelineBuilder,
};
pub use profiler::{ColumnClassifier, StatisticalSummarizer};
pub use quality::{ConsistencyChecker, CorrelationAnalyzer, DataQualityAnalyzer};
pub use reporting::{
    ComprehensiveReport, DEFAULT_FEEDBACK_FILE, FeedbackGenerator, ReportGenerator, TextReport,
    render_text_report,
};
pub use scoring::{QualityScorer, RecommendationEngine, RecommendationInputs};
pub use types::{
    AnalysisResult, BasicInfo, CategoricalSummary, ColumnKind, ColumnProfile, Correlation,
    EmptyStringStat, MissingValueStat, NumericSummary, QualityAssessment, QualityScores,
    StatisticalSummary, ValueCount,
};
