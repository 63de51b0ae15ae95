//! Report generation module.
//!
//! - [`TextReport`] / [`render_text_report`]: the human-readable EDA report
//! - [`FeedbackGenerator`]: condensed summary for the dataset generator
//! - [`ReportGenerator`]: timestamped JSON report files

mod feedback;
mod generator;
mod text;

pub use feedback::{DEFAULT_FEEDBACK_FILE, FeedbackGenerator};
pub use generator::{ComprehensiveReport, ReportGenerator};
pub use text::{TextReport, distribution_bar, render_text_report, uniqueness_status};
