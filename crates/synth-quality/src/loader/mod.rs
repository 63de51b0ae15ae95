//! Tabular loader with an ordered fallback chain.
//!
//! Generated datasets are frequently malformed: ragged rows, stray quotes,
//! the wrong delimiter. The loader tries each [`LoadStrategy`] in order and
//! returns the first table that parses, together with the diagnostics
//! collected on the way.
//!
//! # Example
//!
//! ```rust,ignore
//! use synth_quality::loader::TableLoader;
//!
//! let loaded = TableLoader::default().load_path("generated.csv")?;
//! println!("{} rows via {:?}", loaded.df.height(), loaded.strategy);
//! ```

mod repair;

pub use repair::{
    Record, RepairOutcome, UnterminatedQuote, drop_overlong_records, repair_ragged_lines,
    sniff_delimiter, split_records,
};

use crate::config::LoaderConfig;
use crate::error::{QualityError, Result, ResultExt};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions, NullValues};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info, warn};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// One way of turning delimited text into a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStrategy {
    /// Comma-delimited, header row, `"` quoting.
    Standard,
    /// Like `Standard`, but rows with too many fields are skipped and bad
    /// cells become missing.
    Tolerant,
    /// Delimiter detected from the first lines, malformed rows skipped.
    SniffedDelimiter,
    /// Quote characters are treated as ordinary text.
    NoQuoting,
    /// Lines are forced to the header's field count before parsing.
    ManualRepair,
}

impl LoadStrategy {
    /// Every strategy in fallback order.
    pub const ALL: [LoadStrategy; 5] = [
        LoadStrategy::Standard,
        LoadStrategy::Tolerant,
        LoadStrategy::SniffedDelimiter,
        LoadStrategy::NoQuoting,
        LoadStrategy::ManualRepair,
    ];

    /// Returns a human-readable name for the strategy.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Tolerant => "tolerant",
            Self::SniffedDelimiter => "sniffed delimiter",
            Self::NoQuoting => "no quoting",
            Self::ManualRepair => "manual repair",
        }
    }

    fn attempt(
        &self,
        bytes: &[u8],
        config: &LoaderConfig,
        diagnostics: &mut Vec<String>,
    ) -> Result<DataFrame> {
        let text = String::from_utf8_lossy(bytes);
        let quoted = CsvParseOptions::default().with_quote_char(Some(b'"'));
        match self {
            Self::Standard => {
                self.quoted_records(&text, b',')?;
                Ok(read_csv(bytes, config, quoted, false)?)
            }
            Self::Tolerant => {
                let records = self.quoted_records(&text, b',')?;
                let cleaned = skip_overlong_records(&records, diagnostics);
                Ok(read_csv(cleaned.as_bytes(), config, quoted, true)?)
            }
            Self::SniffedDelimiter => {
                let delimiter = sniff_delimiter(&text, &config.sniff_candidates).ok_or_else(
                    || QualityError::Load {
                        strategy: self.display_name().to_string(),
                        reason: "Could not detect a delimiter".to_string(),
                    },
                )?;
                diagnostics.push(format!(
                    "Detected delimiter {:?}",
                    char::from(delimiter)
                ));
                let records = self.quoted_records(&text, delimiter)?;
                let cleaned = skip_overlong_records(&records, diagnostics);
                Ok(read_csv(
                    cleaned.as_bytes(),
                    config,
                    quoted.with_separator(delimiter),
                    true,
                )?)
            }
            Self::NoQuoting => Ok(read_csv(
                bytes,
                config,
                CsvParseOptions::default().with_quote_char(None),
                false,
            )?),
            Self::ManualRepair => {
                let outcome = repair_ragged_lines(&text)?;
                warn!(
                    "Repaired {} malformed lines before parsing",
                    outcome.repaired_lines
                );
                diagnostics.extend(outcome.diagnostics);
                // Fields were split on raw commas, so quotes stay literal.
                Ok(read_csv(
                    outcome.text.as_bytes(),
                    config,
                    CsvParseOptions::default().with_quote_char(None),
                    false,
                )?)
            }
        }
    }

    /// Split `text` into quote-aware records, failing on an unterminated quote.
    fn quoted_records<'a>(&self, text: &'a str, delimiter: u8) -> Result<Vec<Record<'a>>> {
        split_records(text, delimiter, Some(b'"')).map_err(|e| QualityError::Load {
            strategy: self.display_name().to_string(),
            reason: format!("Unterminated quoted field starting on line {}", e.line),
        })
    }
}

/// Rebuild the text without records that have more fields than the header.
fn skip_overlong_records(records: &[Record<'_>], diagnostics: &mut Vec<String>) -> String {
    let (text, dropped) = drop_overlong_records(records);
    if dropped > 0 {
        warn!("Skipped {} lines with too many fields", dropped);
        diagnostics.push(format!("Skipped {} lines with too many fields", dropped));
    }
    text
}

fn read_csv(
    bytes: &[u8],
    config: &LoaderConfig,
    parse_options: CsvParseOptions,
    ignore_errors: bool,
) -> PolarsResult<DataFrame> {
    let null_values = config
        .null_values
        .iter()
        .map(|v| PlSmallStr::from(v.as_str()))
        .collect::<Vec<_>>();
    let parse_options = if null_values.is_empty() {
        parse_options
    } else {
        parse_options.with_null_values(Some(NullValues::AllColumns(null_values)))
    };

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(config.infer_schema_length)
        .with_ignore_errors(ignore_errors)
        .with_parse_options(parse_options)
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
}

/// A successfully parsed table and how it was obtained.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub df: DataFrame,
    pub strategy: LoadStrategy,
    /// Messages emitted while loading, in order.
    pub diagnostics: Vec<String>,
    /// Length of the raw input in bytes.
    pub source_bytes: usize,
}

/// Loads delimited text through the fallback chain.
#[derive(Debug, Clone)]
pub struct TableLoader {
    config: LoaderConfig,
    strategies: Vec<LoadStrategy>,
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl TableLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            strategies: LoadStrategy::ALL.to_vec(),
        }
    }

    /// Replace the fallback chain. Strategies run in the given order.
    pub fn with_strategies(mut self, strategies: impl Into<Vec<LoadStrategy>>) -> Self {
        self.strategies = strategies.into();
        self
    }

    /// Read a file and load it through the chain.
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<LoadedTable> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).context(format!("Reading {}", path.display()))?;
        self.load_bytes(&bytes)
    }

    /// Load an in-memory buffer through the chain.
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<LoadedTable> {
        let source_bytes = bytes.len();
        let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let mut diagnostics = Vec::new();
        let mut last_failure: Option<(LoadStrategy, QualityError)> = None;

        for &strategy in &self.strategies {
            let outcome = strategy
                .attempt(content, &self.config, &mut diagnostics)
                .and_then(reject_empty_header);

            match outcome {
                Ok(df) => {
                    info!(
                        "Loaded dataset with {} strategy: {} rows x {} columns",
                        strategy.display_name(),
                        df.height(),
                        df.width()
                    );
                    if strategy != LoadStrategy::Standard {
                        diagnostics.push(format!(
                            "Loaded with {} strategy",
                            strategy.display_name()
                        ));
                    }
                    return Ok(LoadedTable {
                        df,
                        strategy,
                        diagnostics,
                        source_bytes,
                    });
                }
                Err(e) => {
                    debug!("{} loading failed: {}", strategy.display_name(), e);
                    diagnostics.push(format!(
                        "{} loading failed: {}",
                        strategy.display_name(),
                        e
                    ));
                    last_failure = Some((strategy, e));
                }
            }
        }

        Err(match last_failure {
            Some((_, err @ (QualityError::InsufficientData | QualityError::Load { .. }))) => err,
            Some((strategy, err)) => QualityError::Load {
                strategy: strategy.display_name().to_string(),
                reason: err.to_string(),
            },
            None => QualityError::Load {
                strategy: "none".to_string(),
                reason: "No loading strategies configured".to_string(),
            },
        })
    }
}

fn reject_empty_header(df: DataFrame) -> Result<DataFrame> {
    if df.width() == 0 {
        return Err(QualityError::Load {
            strategy: "header".to_string(),
            reason: "Header row has no columns".to_string(),
        });
    }
    Ok(df)
}
