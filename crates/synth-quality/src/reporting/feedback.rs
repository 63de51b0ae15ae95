//! Condensed quality summary handed back to a dataset generator.

use crate::error::{QualityError, Result};
use crate::reporting::text::column_dtype_lines;
use crate::types::AnalysisResult;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default file name for [`FeedbackGenerator::save`].
pub const DEFAULT_FEEDBACK_FILE: &str = "eda_feedback_prompt.txt";

pub struct FeedbackGenerator<'a> {
    result: &'a AnalysisResult,
}

impl<'a> FeedbackGenerator<'a> {
    pub fn new(result: &'a AnalysisResult) -> Self {
        Self { result }
    }

    /// Build the feedback text.
    pub fn generate_prompt(&self) -> String {
        let r = self.result;
        let recommendations = if r.recommendations.is_empty() {
            "No major issues detected".to_string()
        } else {
            r.recommendations
                .iter()
                .map(|rec| format!("- {}", rec))
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            "SYNTHETIC DATASET QUALITY ANALYSIS REPORT\n\
             \n\
             Dataset Overview:\n\
             - Shape: {} rows × {} columns\n\
             - Overall Quality Score: {:.1}%\n\
             - Completeness: {:.1}%\n\
             - Missing Values: {}\n\
             - Duplicate Rows: {}\n\
             - Consistency Issues: {}\n\
             - Range Issues: {}\n\
             \n\
             Column Information:\n\
             {}\n\
             \n\
             Key Issues Found:\n\
             {}\n",
            r.basic_info.rows,
            r.basic_info.columns,
            r.quality_scores.overall,
            r.quality_scores.completeness,
            r.quality_assessment.total_missing,
            r.quality_assessment.duplicate_count,
            r.consistency_issues.len(),
            r.range_issues.len(),
            column_dtype_lines(&r.column_info),
            recommendations,
        )
    }

    /// Write the feedback text to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                QualityError::ReportWriteFailed(format!("{}: {}", parent.display(), e))
            })?;
        }
        fs::write(path, self.generate_prompt()).map_err(|e| {
            QualityError::ReportWriteFailed(format!("{}: {}", path.display(), e))
        })?;

        info!("Feedback prompt saved to '{}'", path.display());
        Ok(path.to_path_buf())
    }
}
