//! One-call analysis of a single security: scan, score, fuse, aggregate.

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, total_strength};
use crate::config::EngineConfig;
use crate::domain::{Action, BarSeries, FusedSignal, PatternOccurrence, SignalRecord};
use crate::patterns::scan;
use crate::schema::SchemaError;
use crate::scoring::score;
use crate::sentiment::fuse;

/// Everything the engine derives from one series and one sentiment score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub symbol: String,
    pub sentiment: f64,
    pub patterns: Vec<PatternOccurrence>,
    pub signals: Vec<SignalRecord>,
    pub fused: Vec<FusedSignal>,
    pub total_strength: f64,
    pub overall: Action,
}

impl Analysis {
    /// The most recent scored bar, if any bar was scored.
    pub fn latest_signal(&self) -> Option<&SignalRecord> {
        self.signals.last()
    }
}

/// Run the full pipeline over `series`.
///
/// Fails only when a column needed by the scanner or the scorer is absent.
pub fn analyze(
    series: &BarSeries,
    sentiment: f64,
    config: &EngineConfig,
) -> Result<Analysis, SchemaError> {
    let patterns = scan(series, &config.patterns)?;
    let signals = score(series, &patterns, &config.scoring, &config.actions)?;
    let fused = fuse(&patterns, sentiment, &config.sentiment);
    let overall = aggregate(&fused, &config.actions);

    tracing::debug!(
        symbol = series.symbol(),
        patterns = patterns.len(),
        signals = signals.len(),
        overall = %overall,
        "analysis complete"
    );

    Ok(Analysis {
        symbol: series.symbol().to_string(),
        sentiment,
        total_strength: total_strength(&fused),
        patterns,
        signals,
        fused,
        overall,
    })
}
