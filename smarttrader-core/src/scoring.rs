//! Signal scorer: indicator votes plus pattern hits, one record per bar.
//!
//! Works on the rows where every scoring field is defined. Two rolling means
//! are derived over those rows: the long trend (mean of the SMA column) and
//! the volume baseline. Rows before both windows are full, and before
//! `min_history`, get no record.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::config::{ActionThresholds, ScoringConfig};
use crate::domain::{Action, BarSeries, PatternOccurrence, SignalRecord};
use crate::patterns::Pattern;
use crate::schema::{Field, SchemaError, SCORING_FIELDS};

/// Score every eligible bar of `series`.
///
/// `patterns` are joined on date; each occurrence dated on a scored bar adds
/// one point and a `"Pattern detected: <label>"` reason, in the order given.
/// Fewer clean rows than `min_history` is not an error: the result is empty.
pub fn score(
    series: &BarSeries,
    patterns: &[PatternOccurrence],
    config: &ScoringConfig,
    thresholds: &ActionThresholds,
) -> Result<Vec<SignalRecord>, SchemaError> {
    let clean = series.clean(SCORING_FIELDS)?;
    if clean.len() < config.min_history {
        tracing::warn!(
            symbol = series.symbol(),
            clean_rows = clean.len(),
            min_history = config.min_history,
            "not enough clean history to score"
        );
        return Ok(Vec::new());
    }

    let close = clean.column(Field::Close);
    let volume = clean.column(Field::Volume);
    let sma = clean.column(Field::Sma);
    let rsi = clean.column(Field::Rsi);
    let macd = clean.column(Field::Macd);
    let macd_signal = clean.column(Field::MacdSignal);

    let long_trend = rolling_mean(sma, config.trend_window);
    let volume_baseline = rolling_mean(volume, config.volume_window);
    let by_date = index_by_date(patterns);

    let oversold = format!("RSI < {} (Oversold)", config.rsi_oversold);
    let overbought = format!("RSI > {} (Overbought)", config.rsi_overbought);

    let mut records = Vec::with_capacity(clean.len().saturating_sub(config.first_scored_index()));
    for i in config.first_scored_index()..clean.len() {
        let date = clean.dates()[i];
        let mut score = 0i64;
        let mut reasons = Vec::new();
        let mut vote = |points: i64, reason: &str| {
            score += points;
            reasons.push(reason.to_string());
        };

        if rsi[i] < config.rsi_oversold {
            vote(2, &oversold);
        }
        if rsi[i] > config.rsi_overbought {
            vote(-2, &overbought);
        }
        if macd[i] > macd_signal[i] {
            vote(1, "MACD Bullish Crossover");
        }
        if macd[i] < macd_signal[i] {
            vote(-1, "MACD Bearish Crossover");
        }
        if close[i] > sma[i] {
            vote(1, "Price > SMA");
        }
        if close[i] < sma[i] {
            vote(-1, "Price < SMA");
        }
        if volume[i] > config.volume_spike_multiplier * volume_baseline[i] {
            vote(1, "Volume Spike");
        }
        if sma[i] > long_trend[i] {
            vote(1, "Uptrend");
        } else {
            vote(-1, "Downtrend");
        }
        for pattern in by_date.get(&date).into_iter().flatten() {
            vote(1, &format!("Pattern detected: {}", pattern.label()));
        }

        records.push(SignalRecord {
            date,
            action: Action::from_score(score as f64, thresholds),
            score,
            reasons,
        });
    }

    tracing::debug!(
        symbol = series.symbol(),
        clean_rows = clean.len(),
        records = records.len(),
        "scoring complete"
    );
    Ok(records)
}

/// Trailing mean over `window` values. Positions before the first full
/// window are NaN.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return vec![f64::NAN; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                f64::NAN
            } else {
                values[i + 1 - window..=i].iter().sum::<f64>() / window as f64
            }
        })
        .collect()
}

fn index_by_date(patterns: &[PatternOccurrence]) -> BTreeMap<NaiveDate, Vec<Pattern>> {
    let mut index: BTreeMap<NaiveDate, Vec<Pattern>> = BTreeMap::new();
    for occurrence in patterns {
        index.entry(occurrence.date).or_default().push(occurrence.pattern);
    }
    index
}
