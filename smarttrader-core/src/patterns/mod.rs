//! Candlestick pattern scanner.
//!
//! A single forward pass over the cleaned OHLC rows. At every position with a
//! full lookback, each rule in [`PATTERN_RULES`] is evaluated independently
//! and every hit is emitted, in table order. There is no precedence between
//! rules: one bar may carry several patterns.

pub mod catalog;
pub mod rules;
pub mod window;

pub use catalog::{Pattern, Polarity, UnknownPattern};
pub use rules::{PatternRule, PATTERN_RULES};
pub use window::{approx_eq, Window, LOOKBACK};

use crate::config::PatternConfig;
use crate::domain::{Bar, BarSeries, PatternOccurrence};
use crate::schema::{SchemaError, PATTERN_FIELDS};

/// Scan a series for every catalogued pattern.
///
/// Requires `timestamp, open, high, low, close`. Rows with an undefined
/// price are dropped before scanning, so the lookback spans clean rows.
/// Fewer than `LOOKBACK + 1` clean rows yield an empty list.
pub fn scan(
    series: &BarSeries,
    config: &PatternConfig,
) -> Result<Vec<PatternOccurrence>, SchemaError> {
    let clean = series.clean(PATTERN_FIELDS)?;
    let bars = clean.to_bars();
    let occurrences = scan_bars(&bars, config);
    tracing::debug!(
        symbol = series.symbol(),
        rows = series.len(),
        clean_rows = bars.len(),
        occurrences = occurrences.len(),
        "pattern scan complete"
    );
    Ok(occurrences)
}

/// Scan bars that are already clean (finite OHLC, ascending dates).
pub fn scan_bars(bars: &[Bar], config: &PatternConfig) -> Vec<PatternOccurrence> {
    let mut occurrences = Vec::new();
    for index in LOOKBACK..bars.len() {
        let Some(window) = Window::new(bars, index, config) else {
            continue;
        };
        occurrences.extend(
            PATTERN_RULES
                .iter()
                .filter(|rule| (rule.detect)(&window))
                .map(|rule| PatternOccurrence {
                    date: window.date(),
                    pattern: rule.pattern,
                }),
        );
    }
    occurrences
}
