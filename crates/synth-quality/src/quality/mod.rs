//! Data quality checks.
//!
//! - [`DataQualityAnalyzer`]: missing values, duplicates, blank strings
//! - [`ConsistencyChecker`]: case, whitespace, negative and range heuristics
//! - [`CorrelationAnalyzer`]: strongly correlated numeric pairs

mod analyzer;
mod consistency;
mod correlation;

pub use analyzer::DataQualityAnalyzer;
pub use consistency::ConsistencyChecker;
pub use correlation::CorrelationAnalyzer;
