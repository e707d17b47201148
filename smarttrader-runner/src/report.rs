//! Per-ticker report artifacts.
//!
//! A report is the full [`Analysis`] plus a manifest describing the input:
//! row counts, date span, a BLAKE3 hash of the series and of the engine
//! config. Saved under `<output>/<symbol>/` as:
//! - `report.json` — manifest and analysis, pretty JSON
//! - `signals.csv` — one row per scored bar
//!
//! Nothing time-dependent goes into either file, so identical input and
//! config produce byte-identical artifacts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use smarttrader_core::analysis::{analyze, Analysis};
use smarttrader_core::config::EngineConfig;
use smarttrader_core::domain::{BarSeries, SignalRecord};
use smarttrader_core::schema::{SchemaError, PATTERN_FIELDS, SCORING_FIELDS};

/// Current report schema version. Reports with a newer version are rejected
/// on load.
pub const SCHEMA_VERSION: u32 = 1;

pub const REPORT_FILE: &str = "report.json";
pub const SIGNALS_FILE: &str = "signals.csv";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("I/O error at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported report schema version {found} (max supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

impl ReportError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Provenance of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportManifest {
    pub schema_version: u32,
    pub symbol: String,
    /// Rows in the loaded series.
    pub bar_count: usize,
    /// Rows left after dropping undefined prices.
    pub pattern_rows: usize,
    /// Rows left after dropping undefined scoring inputs.
    pub scoring_rows: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub dataset_hash: String,
    pub config_hash: String,
    pub sentiment: f64,
}

/// Manifest plus the analysis it describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub manifest: ReportManifest,
    pub analysis: Analysis,
}

impl AnalysisReport {
    /// Analyze `series` and wrap the result with its manifest.
    pub fn build(
        series: &BarSeries,
        sentiment: f64,
        config: &EngineConfig,
    ) -> Result<Self, ReportError> {
        let analysis = analyze(series, sentiment, config)?;
        let manifest = ReportManifest {
            schema_version: SCHEMA_VERSION,
            symbol: series.symbol().to_string(),
            bar_count: series.len(),
            pattern_rows: series.clean(PATTERN_FIELDS)?.len(),
            scoring_rows: series.clean(SCORING_FIELDS)?.len(),
            first_date: series.dates().first().copied(),
            last_date: series.dates().last().copied(),
            dataset_hash: dataset_hash(series),
            config_hash: config_hash(config)?,
            sentiment,
        };
        Ok(Self { manifest, analysis })
    }

    /// Write `report.json` and `signals.csv` under `<output_dir>/<symbol>/`.
    /// Returns the symbol directory.
    pub fn save(&self, output_dir: &Path) -> Result<PathBuf, ReportError> {
        let dir = output_dir.join(sanitize_symbol(&self.manifest.symbol));
        fs::create_dir_all(&dir).map_err(|e| ReportError::io(&dir, e))?;

        let json = serde_json::to_string_pretty(self)?;
        write_atomic(&dir.join(REPORT_FILE), json.as_bytes())?;
        let csv = signals_csv(&self.analysis.signals)?;
        write_atomic(&dir.join(SIGNALS_FILE), csv.as_bytes())?;

        tracing::debug!(dir = %dir.display(), "report saved");
        Ok(dir)
    }

    /// Read a `report.json`, rejecting newer schema versions.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let content = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        let report: Self = serde_json::from_str(&content)?;
        if report.manifest.schema_version > SCHEMA_VERSION {
            return Err(ReportError::UnsupportedVersion {
                found: report.manifest.schema_version,
                supported: SCHEMA_VERSION,
            });
        }
        Ok(report)
    }
}

/// BLAKE3 over the symbol, the dates, and every attached column in field
/// order. Column bytes are the little-endian f64 bits, so NaN cells hash
/// consistently.
pub fn dataset_hash(series: &BarSeries) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(series.symbol().as_bytes());
    for date in series.dates() {
        hasher.update(date.to_string().as_bytes());
    }
    for field in series.fields() {
        if let Some(values) = series.column(field) {
            hasher.update(field.name().as_bytes());
            for v in values {
                hasher.update(&v.to_le_bytes());
            }
        }
    }
    hasher.finalize().to_hex().to_string()
}

/// BLAKE3 over the JSON form of the engine config.
pub fn config_hash(config: &EngineConfig) -> Result<String, ReportError> {
    let json = serde_json::to_vec(config)?;
    Ok(blake3::hash(&json).to_hex().to_string())
}

/// Signal records as CSV: `date,action,score,reasons`, with reasons joined
/// by `"; "` in their original order.
pub fn signals_csv(signals: &[SignalRecord]) -> Result<String, ReportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "action", "score", "reasons"])?;
    for s in signals {
        let date = s.date.to_string();
        let score = s.score.to_string();
        let reasons = s.reasons.join("; ");
        wtr.write_record([date.as_str(), s.action.label(), score.as_str(), reasons.as_str()])?;
    }
    let data = wtr
        .into_inner()
        .map_err(|e| ReportError::io(Path::new(SIGNALS_FILE), e.into_error()))?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

/// Keep symbols usable as a single directory name.
pub(crate) fn sanitize_symbol(symbol: &str) -> String {
    let name: String = symbol
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '^' | '=') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if name.chars().all(|c| c == '.') {
        format!("_{name}")
    } else {
        name
    }
}

/// Write to a temp file then rename into place.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).map_err(|e| ReportError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        ReportError::io(path, e)
    })
}
