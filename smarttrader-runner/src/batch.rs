//! Multi-ticker batch runs.
//!
//! Each ticker is loaded, analyzed and (optionally) saved independently on
//! the Rayon pool. A failing ticker is recorded with its error and never
//! stops the others. Outcomes come back in configuration order regardless
//! of which thread finished first.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use smarttrader_core::config::EngineConfig;
use smarttrader_core::domain::Action;

use crate::config::{validate_sentiment, BatchConfig, TickerSpec};
use crate::loader::{load_csv, LoadError};
use crate::report::{AnalysisReport, ReportError};

pub const SUMMARY_FILE: &str = "batch_summary.json";

/// Why one ticker of a batch failed.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("{0}")]
    Sentiment(String),
}

/// A ticker that ran to completion.
#[derive(Debug, Clone)]
pub struct TickerRun {
    pub report: AnalysisReport,
    /// Directory the artifacts were written to, when saving was requested.
    pub saved_to: Option<PathBuf>,
}

/// Result of one ticker.
#[derive(Debug)]
pub struct TickerOutcome {
    pub symbol: String,
    pub result: Result<TickerRun, BatchError>,
}

/// All outcomes of a batch, in configuration order.
#[derive(Debug)]
pub struct BatchResult {
    pub outcomes: Vec<TickerOutcome>,
}

impl BatchResult {
    pub fn succeeded(&self) -> impl Iterator<Item = (&str, &TickerRun)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|r| (o.symbol.as_str(), r)))
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &BatchError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.symbol.as_str(), e)))
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    /// One summary row per ticker.
    pub fn summary(&self) -> Vec<SummaryRow> {
        self.outcomes.iter().map(SummaryRow::from_outcome).collect()
    }

    /// Write the summary as pretty JSON to `<output_dir>/batch_summary.json`.
    pub fn write_summary(&self, output_dir: &Path) -> Result<PathBuf, ReportError> {
        std::fs::create_dir_all(output_dir).map_err(|source| ReportError::Io {
            path: output_dir.display().to_string(),
            source,
        })?;
        let path = output_dir.join(SUMMARY_FILE);
        let json = serde_json::to_string_pretty(&self.summary())?;
        std::fs::write(&path, json).map_err(|source| ReportError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(path)
    }
}

/// Condensed view of one ticker for tables and the summary file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub symbol: String,
    pub ok: bool,
    pub overall: Option<Action>,
    pub total_strength: Option<f64>,
    pub latest_action: Option<Action>,
    pub latest_score: Option<i64>,
    pub patterns: usize,
    pub error: Option<String>,
}

impl SummaryRow {
    fn from_outcome(outcome: &TickerOutcome) -> Self {
        match &outcome.result {
            Ok(run) => {
                let analysis = &run.report.analysis;
                let latest = analysis.latest_signal();
                Self {
                    symbol: outcome.symbol.clone(),
                    ok: true,
                    overall: Some(analysis.overall),
                    total_strength: Some(analysis.total_strength),
                    latest_action: latest.map(|s| s.action),
                    latest_score: latest.map(|s| s.score),
                    patterns: analysis.patterns.len(),
                    error: None,
                }
            }
            Err(e) => Self {
                symbol: outcome.symbol.clone(),
                ok: false,
                overall: None,
                total_strength: None,
                latest_action: None,
                latest_score: None,
                patterns: 0,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Load, analyze and optionally save a single ticker.
pub fn run_ticker(
    spec: &TickerSpec,
    config: &EngineConfig,
    output_dir: Option<&Path>,
) -> Result<TickerRun, BatchError> {
    validate_sentiment(spec.sentiment).map_err(BatchError::Sentiment)?;
    let series = load_csv(&spec.path, &spec.symbol)?;
    let report = AnalysisReport::build(&series, spec.sentiment, config)?;
    let saved_to = output_dir.map(|dir| report.save(dir)).transpose()?;
    Ok(TickerRun { report, saved_to })
}

/// Run every ticker of `batch` in parallel.
pub fn run_batch(batch: &BatchConfig, output_dir: Option<&Path>) -> BatchResult {
    let total = batch.tickers.len();
    tracing::info!(tickers = total, "batch started");

    let outcomes: Vec<TickerOutcome> = batch
        .tickers
        .par_iter()
        .map(|spec| {
            let result = run_ticker(spec, &batch.engine, output_dir);
            match &result {
                Ok(run) => tracing::info!(
                    symbol = %spec.symbol,
                    overall = %run.report.analysis.overall,
                    patterns = run.report.analysis.patterns.len(),
                    "ticker done"
                ),
                Err(e) => tracing::warn!(symbol = %spec.symbol, error = %e, "ticker failed"),
            }
            TickerOutcome {
                symbol: spec.symbol.clone(),
                result,
            }
        })
        .collect();

    let result = BatchResult { outcomes };
    tracing::info!(
        tickers = total,
        failed = result.failure_count(),
        "batch finished"
    );
    result
}
