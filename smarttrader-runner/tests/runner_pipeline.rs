//! Integration tests for the runner: the ACME fixture from CSV to artifacts.
//!
//! `fixtures/acme.csv` holds 60 trading days with precomputed SMA(20),
//! EMA(20), RSI(14), MACD(12,26,9) and Bollinger columns. The indicators
//! need 34 bars to warm up, leaving 27 clean scoring rows. A bullish
//! engulfing pair sits on 2024-03-12 / 2024-03-13.

use chrono::NaiveDate;
use std::path::PathBuf;

use smarttrader_core::schema::Field;
use smarttrader_core::{EngineConfig, Pattern};
use smarttrader_runner::report::{REPORT_FILE, SIGNALS_FILE};
use smarttrader_runner::{
    load_csv, run_batch, AnalysisReport, BatchConfig, BatchError, LoadError,
};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/acme.csv")
}

fn engulfing_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 13).unwrap()
}

// ─── Loading ─────────────────────────────────────────────────────────

#[test]
fn fixture_loads_with_every_column() {
    let series = load_csv(&fixture(), "ACME").unwrap();
    assert_eq!(series.len(), 60);
    for field in Field::ALL.iter() {
        assert!(series.has(*field), "missing {field}");
    }
    assert_eq!(series.dates()[0], NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    // indicator warm-up rows are undefined, not zero
    assert!(series.column(Field::Sma).unwrap()[0].is_nan());
    assert!(series.column(Field::Ema).unwrap()[0].is_finite());
}

// ─── Single report ───────────────────────────────────────────────────

#[test]
fn report_counts_and_linkage() {
    let series = load_csv(&fixture(), "ACME").unwrap();
    let report = AnalysisReport::build(&series, 0.5, &EngineConfig::default()).unwrap();

    assert_eq!(report.manifest.bar_count, 60);
    assert_eq!(report.manifest.pattern_rows, 60);
    assert_eq!(report.manifest.scoring_rows, 27);
    assert_eq!(report.analysis.signals.len(), 17);

    assert!(report
        .analysis
        .patterns
        .iter()
        .any(|o| o.date == engulfing_day() && o.pattern == Pattern::BullishEngulfing));

    let record = report
        .analysis
        .signals
        .iter()
        .find(|r| r.date == engulfing_day())
        .unwrap();
    assert!(record
        .reasons
        .contains(&"Pattern detected: Bullish Engulfing".to_string()));
    assert!(record.reasons.contains(&"Volume Spike".to_string()));

    let fused = report
        .analysis
        .fused
        .iter()
        .find(|f| f.pattern == Pattern::BullishEngulfing)
        .unwrap();
    assert_eq!(fused.strength, 1.5);
}

#[test]
fn artifacts_are_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let series = load_csv(&fixture(), "ACME").unwrap();
    let config = EngineConfig::default();

    let out = AnalysisReport::build(&series, 0.1, &config)
        .unwrap()
        .save(dir.path())
        .unwrap();
    let json = std::fs::read(out.join(REPORT_FILE)).unwrap();
    let csv = std::fs::read_to_string(out.join(SIGNALS_FILE)).unwrap();

    let reloaded = load_csv(&fixture(), "ACME").unwrap();
    AnalysisReport::build(&reloaded, 0.1, &config)
        .unwrap()
        .save(dir.path())
        .unwrap();
    assert_eq!(json, std::fs::read(out.join(REPORT_FILE)).unwrap());
    assert_eq!(csv, std::fs::read_to_string(out.join(SIGNALS_FILE)).unwrap());

    // header plus one line per scored bar
    assert_eq!(csv.lines().count(), 18);
}

// ─── Batch ───────────────────────────────────────────────────────────

#[test]
fn batch_isolates_failures_and_writes_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(fixture(), dir.path().join("acme.csv")).unwrap();
    std::fs::write(
        dir.path().join("prices_only.csv"),
        "date,open,high,low,close\n2024-01-02,10,11,9,10.5\n",
    )
    .unwrap();
    let batch_path = dir.path().join("batch.toml");
    std::fs::write(
        &batch_path,
        r#"
[[tickers]]
symbol = "ACME"
path = "acme.csv"
sentiment = 0.4

[[tickers]]
symbol = "THIN"
path = "prices_only.csv"

[[tickers]]
symbol = "GONE"
path = "nowhere.csv"
sentiment = -0.3
"#,
    )
    .unwrap();

    let batch = BatchConfig::from_file(&batch_path).unwrap();
    let out_dir = dir.path().join("out");
    let result = run_batch(&batch, Some(&out_dir));

    let symbols: Vec<&str> = result.outcomes.iter().map(|o| o.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["ACME", "THIN", "GONE"]);
    assert_eq!(result.succeeded().count(), 1);
    assert_eq!(result.failure_count(), 2);

    let (_, acme) = result.succeeded().next().unwrap();
    assert_eq!(acme.saved_to.as_deref(), Some(out_dir.join("ACME").as_path()));
    assert!(out_dir.join("ACME").join(REPORT_FILE).exists());
    assert!(!out_dir.join("GONE").exists());

    assert!(matches!(
        result.outcomes[1].result,
        Err(BatchError::Report(_))
    ));
    assert!(matches!(
        result.outcomes[2].result,
        Err(BatchError::Load(LoadError::Read { .. }))
    ));

    let summary_path = result.write_summary(&out_dir).unwrap();
    let summary = std::fs::read_to_string(summary_path).unwrap();
    assert!(summary.contains("\"symbol\": \"ACME\""));
    assert!(summary.contains("missing required column(s): volume, sma, rsi, macd, macd_signal"));
}
