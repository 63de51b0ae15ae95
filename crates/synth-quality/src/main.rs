//! CLI entry point for the dataset quality analyzer.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use synth_quality::{
    AnalysisResult, AnalyzerConfig, DEFAULT_FEEDBACK_FILE, FeedbackGenerator, QualityPipeline,
    ReportGenerator, render_text_report,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Data quality profiler for generated CSV datasets",
    long_about = "Profiles a CSV dataset and reports completeness, uniqueness, consistency,\n\
                  value ranges, correlations and an overall quality score.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  RUST_LOG    Overrides --log-level (e.g. RUST_LOG=synth_quality=debug)\n\n\
                  EXAMPLES:\n  \
                  # Print the text report\n  \
                  synth-quality -i data.csv\n\n  \
                  # Machine-readable output\n  \
                  synth-quality -i data.csv --json | jq .quality_scores\n\n  \
                  # Save a JSON report and the feedback summary\n  \
                  synth-quality -i data.csv -r --feedback"
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long)]
    input: String,

    /// Output directory for --emit-report
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the report)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of the text report
    ///
    /// Disables all logging so stdout only contains the JSON document.
    #[arg(long)]
    json: bool,

    /// Write a JSON report to the output directory as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Save the feedback summary for the dataset generator
    ///
    /// Without a value the summary is written to eda_feedback_prompt.txt.
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_FEEDBACK_FILE)]
    feedback: Option<PathBuf>,

    /// Run independent analysis stages concurrently
    #[arg(long)]
    parallel: bool,

    /// Row count below which a larger dataset is recommended
    #[arg(long, default_value = "1000")]
    min_rows: usize,

    /// Report numeric pairs whose |r| exceeds this value (0.0 - 1.0)
    #[arg(long, default_value = "0.7")]
    correlation_threshold: f64,

    /// Tukey fence multiplier for outlier detection
    #[arg(long, default_value = "1.5")]
    iqr_multiplier: f64,

    /// Rows scanned for schema inference (default: all rows)
    #[arg(long)]
    infer_schema_length: Option<usize>,

    /// Cell text read as missing; repeat to list several (default: NA, N/A, null, ...)
    #[arg(long = "null-value", value_name = "TOKEN")]
    null_values: Vec<String>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled so stdout holds only JSON.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    dotenv().ok();

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let mut config_builder = AnalyzerConfig::builder()
        .min_recommended_rows(args.min_rows)
        .correlation_threshold(args.correlation_threshold)
        .iqr_multiplier(args.iqr_multiplier)
        .parallel_stages(args.parallel);
    if let Some(rows) = args.infer_schema_length {
        config_builder = config_builder.infer_schema_length(rows);
    }
    if !args.null_values.is_empty() {
        config_builder = config_builder.null_values(args.null_values.iter().cloned());
    }
    let config = config_builder.build()?;

    let mut builder = QualityPipeline::builder().config(config);
    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }
    let pipeline = builder.build()?;

    let result = match pipeline.analyze_path(&args.input) {
        Ok(result) => result,
        Err(e) => {
            error!("Error during EDA analysis: {}", e);
            return Err(anyhow!("Analysis of {} failed: {}", args.input, e));
        }
    };

    handle_output(result, &args)
}

/// Handle analysis output based on CLI flags.
///
/// - Default: print the text report to stdout
/// - `--json`: print the JSON report to stdout only
/// - `--emit-report`: also write the JSON report to a file
/// - `--feedback`: also write the feedback summary
fn handle_output(result: AnalysisResult, args: &Args) -> Result<()> {
    if let Some(ref path) = args.feedback {
        let saved = FeedbackGenerator::new(&result)
            .save(path)
            .context("Saving feedback summary")?;
        if !args.json {
            println!("\nFeedback prompt saved to '{}'", saved.display());
        }
    }

    let text = (!args.json).then(|| render_text_report(&result));
    let report = ReportGenerator::build_comprehensive_report(&args.input, result);

    if args.emit_report {
        let generator = ReportGenerator::new(&args.output);
        let path = generator.write_report_to_file(&report, &extract_file_stem(&args.input))?;
        info!("Report written to: {}", path.display());
    }

    match text {
        Some(text) => println!("{}", text),
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}
