use crate::error::{QualityError, Result};
use crate::types::AnalysisResult;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Analysis result with run metadata, for `--json` and `--emit-report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComprehensiveReport {
    /// RFC 3339 timestamp of report creation
    pub generated_at: String,
    /// Path of the analyzed file
    pub input_file: String,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
}

/// Writes JSON reports into an output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn build_comprehensive_report(
        input_file: &str,
        analysis: AnalysisResult,
    ) -> ComprehensiveReport {
        ComprehensiveReport {
            generated_at: Local::now().to_rfc3339(),
            input_file: input_file.to_string(),
            analysis,
        }
    }

    /// Write `report` as `<output_dir>/<report_base_name>_report.json`.
    pub fn write_report_to_file(
        &self,
        report: &ComprehensiveReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            QualityError::ReportWriteFailed(format!("{}: {}", self.output_dir.display(), e))
        })?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
