//! Integration tests for the quality analysis pipeline.
//!
//! These tests run the loader, every analysis stage and the report writers
//! end to end on the CSV fixtures.

use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use synth_quality::{
    AnalysisResult, AnalysisStage, AnalyzerConfig, ColumnKind, ComprehensiveReport,
    FeedbackGenerator, LoadStrategy, QualityPipeline, ReportGenerator, TableLoader,
    render_text_report,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn analyze_fixture(filename: &str) -> AnalysisResult {
    QualityPipeline::builder()
        .build()
        .expect("default config is valid")
        .analyze_path(fixtures_path().join(filename))
        .expect("fixture should analyze")
}

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

// ============================================================================
// Heuristic Scenarios
// ============================================================================

#[test]
fn test_unrealistic_ages() {
    let result = analyze_fixture("ages.csv");

    assert_eq!(result.basic_info.rows, 3);
    assert_eq!(
        result.range_issues,
        vec!["age: Age range -5-200 unrealistic".to_string()]
    );
    assert_eq!(
        result.consistency_issues,
        vec!["age: 1 negative values".to_string()]
    );
    approx(result.quality_scores.consistency, 90.0);
    approx(result.quality_scores.range_validity, 85.0);
}

#[test]
fn test_mixed_case_categories() {
    let result = analyze_fixture("colors.csv");

    assert_eq!(
        result.consistency_issues,
        vec!["color: Mixed case values detected".to_string()]
    );
    assert!(result.range_issues.is_empty());

    let color = result.column("color").unwrap();
    assert!(!color.is_numeric());
    assert_eq!(color.distinct_count, 3);
}

#[test]
fn test_duplicate_rows() {
    let result = analyze_fixture("duplicates.csv");

    assert_eq!(result.quality_assessment.duplicate_count, 2);
    approx(result.quality_assessment.duplicate_percent, 50.0);
    assert!(
        result
            .recommendations
            .contains(&"Remove duplicate rows".to_string())
    );
}

#[test]
fn test_constant_column_never_correlated() {
    let result = analyze_fixture("constant.csv");

    assert_eq!(result.correlations.len(), 1);
    let pair = &result.correlations[0];
    assert_eq!(
        (pair.column_a.as_str(), pair.column_b.as_str()),
        ("x", "y")
    );
    approx(pair.coefficient, 1.0);
    assert!(
        result
            .correlations
            .iter()
            .all(|c| c.column_a != "flag" && c.column_b != "flag")
    );
}

// ============================================================================
// Loader Fallback Tests
// ============================================================================

#[test]
fn test_ragged_file_loads_with_default_chain() {
    let result = analyze_fixture("ragged.csv");

    assert_eq!(result.basic_info.rows, 3);
    assert_eq!(result.basic_info.columns, 4);
    assert_eq!(result.quality_assessment.total_missing, 1);
    approx(result.quality_scores.completeness, 100.0 * (1.0 - 1.0 / 12.0));
}

#[test]
fn test_ragged_file_manual_repair() {
    let loaded = TableLoader::default()
        .with_strategies([LoadStrategy::ManualRepair])
        .load_path(fixtures_path().join("ragged.csv"))
        .unwrap();

    assert_eq!(loaded.strategy, LoadStrategy::ManualRepair);
    assert_eq!(loaded.df.shape(), (3, 4));
    assert!(
        loaded
            .diagnostics
            .contains(&"Line 3: has 3 fields (expected 4)".to_string())
    );
    assert!(
        loaded
            .diagnostics
            .contains(&"Loaded with manual repair strategy".to_string())
    );

    let result = QualityPipeline::builder()
        .build()
        .unwrap()
        .analyze_loaded(&loaded)
        .unwrap();
    assert_eq!(result.basic_info.load_strategy, Some(LoadStrategy::ManualRepair));
    assert_eq!(result.basic_info.load_diagnostics, loaded.diagnostics);
    assert_eq!(result.quality_assessment.total_missing, 1);
}

#[test]
fn test_default_chain_falls_back_to_manual_repair() {
    let loaded = TableLoader::default()
        .load_path(fixtures_path().join("broken_quotes.csv"))
        .unwrap();

    assert_eq!(loaded.strategy, LoadStrategy::ManualRepair);
    assert_eq!(loaded.df.shape(), (4, 3));

    let diagnostics = &loaded.diagnostics;
    assert_eq!(diagnostics.len(), 9, "{:#?}", diagnostics);
    for (line, strategy) in [(0, "standard"), (1, "tolerant"), (3, "sniffed delimiter")] {
        assert!(
            diagnostics[line].starts_with(&format!("{} loading failed:", strategy)),
            "{}",
            diagnostics[line]
        );
        assert!(diagnostics[line].ends_with("Unterminated quoted field starting on line 2"));
    }
    assert_eq!(diagnostics[2], "Detected delimiter ','");
    assert!(diagnostics[4].starts_with("no quoting loading failed:"));
    assert_eq!(
        diagnostics[5..],
        [
            "Expected 3 columns from header".to_string(),
            "Line 4: has 4 fields (expected 3)".to_string(),
            "Found 1 problematic lines".to_string(),
            "Loaded with manual repair strategy".to_string(),
        ]
    );

    let result = QualityPipeline::builder()
        .build()
        .unwrap()
        .analyze_loaded(&loaded)
        .unwrap();
    assert_eq!(result.basic_info.load_strategy, Some(LoadStrategy::ManualRepair));
    assert_eq!(result.quality_assessment.total_missing, 0);
}

#[test]
fn test_null_tokens_counted_as_missing() {
    let result = QualityPipeline::builder()
        .build()
        .unwrap()
        .analyze_bytes(b"id,age\n1,30\n2,NA\n3,41\n4,N/A\n")
        .unwrap();

    let age = result
        .column_info
        .iter()
        .find(|profile| profile.name == "age")
        .unwrap();
    assert_eq!(age.kind, ColumnKind::Numeric);
    assert_eq!(age.missing_count, 2);
    assert_eq!(age.non_null_count, 2);
    assert_eq!(result.quality_assessment.total_missing, 2);
    assert_eq!(result.basic_info.load_strategy, Some(LoadStrategy::Standard));
}

#[test]
fn test_semicolon_file_with_sniffed_delimiter() {
    let loaded = TableLoader::default()
        .with_strategies([LoadStrategy::SniffedDelimiter])
        .load_path(fixtures_path().join("semicolon.csv"))
        .unwrap();
    assert_eq!(loaded.df.shape(), (3, 3));

    let result = QualityPipeline::builder()
        .build()
        .unwrap()
        .analyze_loaded(&loaded)
        .unwrap();

    assert_eq!(
        result.consistency_issues,
        vec!["price: 1 negative values".to_string()]
    );
    assert_eq!(
        result.range_issues,
        vec![
            "price: Negative prices found".to_string(),
            "rating: Rating range 3.0-12.0 outside 0-10 scale".to_string(),
        ]
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let err = QualityPipeline::builder()
        .build()
        .unwrap()
        .analyze_path(fixtures_path().join("does_not_exist.csv"))
        .unwrap_err();

    assert_eq!(err.error_code(), "IO_ERROR");
    assert!(err.to_string().contains("does_not_exist.csv"));
}

#[test]
fn test_header_only_file_yields_empty_analysis() {
    let result = QualityPipeline::builder()
        .build()
        .unwrap()
        .analyze_bytes(b"id,label\n")
        .unwrap();

    assert_eq!(result.basic_info.rows, 0);
    assert_eq!(result.basic_info.columns, 2);
    assert_eq!(result.quality_assessment.duplicate_count, 0);
    assert!(result.correlations.is_empty());
    approx(result.quality_scores.completeness, 100.0);
    approx(result.quality_scores.uniqueness, 0.0);
    assert_eq!(
        result.recommendations.first().map(String::as_str),
        Some("Increase dataset size to 1000+ rows (current: 0)")
    );
    assert_eq!(
        result.recommendations.last().map(String::as_str),
        Some("Consider regenerating dataset (quality < 80%)")
    );
}

// ============================================================================
// Clean Dataset Tests
// ============================================================================

#[test]
fn test_clean_dataset_scores() {
    let result = analyze_fixture("customers.csv");

    assert_eq!(result.basic_info.rows, 8);
    assert_eq!(result.basic_info.columns, 6);
    assert_eq!(result.basic_info.load_strategy, Some(LoadStrategy::Standard));
    assert!(result.consistency_issues.is_empty());
    assert!(result.range_issues.is_empty());
    assert_eq!(result.quality_assessment.duplicate_count, 0);
    assert_eq!(result.quality_assessment.total_missing, 0);

    let scores = &result.quality_scores;
    approx(scores.completeness, 100.0);
    approx(scores.consistency, 100.0);
    approx(scores.range_validity, 100.0);
    approx(scores.uniqueness, 40.0 / 48.0 * 100.0);
    approx(
        scores.overall,
        (scores.completeness + scores.uniqueness + scores.consistency + scores.range_validity)
            / 4.0,
    );

    assert_eq!(
        result.recommendations,
        vec!["Increase dataset size to 1000+ rows (current: 8)".to_string()]
    );
}

#[test]
fn test_clean_dataset_column_kinds() {
    let result = analyze_fixture("customers.csv");

    let numeric: Vec<&str> = result.numeric_columns().map(|c| c.name.as_str()).collect();
    let categorical: Vec<&str> = result
        .categorical_columns()
        .map(|c| c.name.as_str())
        .collect();

    assert_eq!(
        numeric,
        vec!["customer_id", "age", "purchase_amount", "satisfaction_rating"]
    );
    assert_eq!(categorical, vec!["name", "city"]);

    let city = result
        .statistical_summary
        .categorical
        .iter()
        .find(|c| c.column == "city")
        .unwrap();
    assert_eq!(city.distinct_count, 3);
    assert_eq!(city.mode.as_deref(), Some("Lisbon"));
}

#[test]
fn test_small_dataset_threshold_is_configurable() {
    let result = QualityPipeline::builder()
        .config(AnalyzerConfig::builder().min_recommended_rows(5).build().unwrap())
        .build()
        .unwrap()
        .analyze_path(fixtures_path().join("customers.csv"))
        .unwrap();

    assert!(result.recommendations.is_empty());
}

// ============================================================================
// Pipeline Behavior Tests
// ============================================================================

#[test]
fn test_parallel_stages_match_sequential() {
    for fixture in ["ages.csv", "customers.csv", "constant.csv"] {
        let sequential = analyze_fixture(fixture);
        let parallel = QualityPipeline::builder()
            .config(AnalyzerConfig::builder().parallel_stages(true).build().unwrap())
            .build()
            .unwrap()
            .analyze_path(fixtures_path().join(fixture))
            .unwrap();

        assert_eq!(sequential, parallel, "results differ for {}", fixture);
    }
}

#[test]
fn test_progress_monotonic_and_complete() {
    let updates = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&updates);

    QualityPipeline::builder()
        .on_progress(move |update| sink.lock().unwrap().push(update))
        .build()
        .unwrap()
        .analyze_path(fixtures_path().join("customers.csv"))
        .unwrap();

    let updates = updates.lock().unwrap();
    assert_eq!(updates.first().map(|u| u.stage), Some(AnalysisStage::Loading));
    assert_eq!(updates.last().map(|u| u.stage), Some(AnalysisStage::Complete));
    assert!(
        updates
            .windows(2)
            .all(|pair| pair[0].progress <= pair[1].progress + 1e-6)
    );
}

#[test]
fn test_analysis_is_repeatable() {
    assert_eq!(analyze_fixture("duplicates.csv"), analyze_fixture("duplicates.csv"));
}

// ============================================================================
// Report Output Tests
// ============================================================================

#[test]
fn test_text_report_sections() {
    let text = render_text_report(&analyze_fixture("ages.csv"));

    for section in [
        "COMPREHENSIVE EDA ANALYSIS FOR SYNTHETIC DATASET",
        "Dataset Shape: 3 rows × 2 columns",
        "COLUMN ANALYSIS",
        "DATA QUALITY ASSESSMENT",
        "STATISTICAL SUMMARY",
        "UNIQUENESS ANALYSIS",
        "DATA CONSISTENCY CHECKS",
        "COLUMN RELATIONSHIP ANALYSIS",
        "REALISTIC VALUE RANGES CHECK",
        "DATASET QUALITY SCORE",
        "RECOMMENDATIONS FOR IMPROVEMENT",
        "EDA ANALYSIS COMPLETE",
    ] {
        assert!(text.contains(section), "missing section {}", section);
    }
    assert!(text.contains("age: Age range -5-200 unrealistic"));
}

#[test]
fn test_emit_report_and_feedback_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = fixtures_path().join("customers.csv");
    let result = analyze_fixture("customers.csv");

    let feedback_path = FeedbackGenerator::new(&result)
        .save(dir.path().join("feedback/eda_feedback_prompt.txt"))
        .unwrap();
    let feedback = fs::read_to_string(&feedback_path).unwrap();
    assert!(feedback.contains("Shape: 8 rows × 6 columns"));
    assert!(feedback.contains("- Increase dataset size to 1000+ rows (current: 8)"));

    let input_name = input.to_string_lossy().to_string();
    let report = ReportGenerator::build_comprehensive_report(&input_name, result.clone());
    let report_path = ReportGenerator::new(dir.path())
        .write_report_to_file(&report, "customers")
        .unwrap();
    assert!(report_path.ends_with("customers_report.json"));

    let written: ComprehensiveReport =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(written.input_file, input_name);
    assert_eq!(written.analysis.column_info.len(), 6);
    assert_eq!(written.analysis.recommendations, result.recommendations);
    approx(
        written.analysis.quality_scores.completeness,
        result.quality_scores.completeness,
    );

    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(json["basic_info"]["load_strategy"], "standard");
    assert_eq!(json["column_info"][0]["kind"], "numeric");
}
