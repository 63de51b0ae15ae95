//! Pipeline module.
//!
//! This module provides the analysis pipeline and its progress reporting.

mod builder;
pub mod progress;

pub use builder::{QualityPipeline, QualityPipelineBuilder};
pub use progress::{AnalysisStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate};
