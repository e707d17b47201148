//! Fixed lookback window over a cleaned bar slice.

use chrono::NaiveDate;

use crate::config::PatternConfig;
use crate::domain::Bar;

/// Longest lookback any rule uses. Positions `0..LOOKBACK` never match.
pub const LOOKBACK: usize = 5;

/// Relative-epsilon equality: `|a - b| <= epsilon * max(|a|, |b|)`.
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon * a.abs().max(b.abs())
}

/// The bars `[index - LOOKBACK, index]` plus the scanner tolerances.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    bars: &'a [Bar],
    index: usize,
    config: &'a PatternConfig,
}

impl<'a> Window<'a> {
    /// `None` unless the full lookback is available at `index`.
    pub fn new(bars: &'a [Bar], index: usize, config: &'a PatternConfig) -> Option<Self> {
        if index < LOOKBACK || index >= bars.len() {
            return None;
        }
        Some(Self {
            bars,
            index,
            config,
        })
    }

    /// The bar `back` positions before the current one (`0` = current).
    ///
    /// # Panics
    /// If `back > LOOKBACK`.
    pub fn bar(&self, back: usize) -> &'a Bar {
        assert!(back <= LOOKBACK, "lookback {back} exceeds window");
        &self.bars[self.index - back]
    }

    pub fn date(&self) -> NaiveDate {
        self.bar(0).date
    }

    pub fn is_bullish(&self, back: usize) -> bool {
        self.bar(back).is_bullish()
    }

    pub fn is_bearish(&self, back: usize) -> bool {
        self.bar(back).is_bearish()
    }

    pub fn body(&self, back: usize) -> f64 {
        self.bar(back).body()
    }

    pub fn is_doji(&self, back: usize) -> bool {
        self.bar(back).is_doji(self.config.doji_tolerance)
    }

    /// Tolerant equality for prices that the textbook rules compare exactly.
    pub fn same(&self, a: f64, b: f64) -> bool {
        approx_eq(a, b, self.config.equality_epsilon)
    }

    /// Mean body size over the `LOOKBACK` bars before the current one.
    pub fn mean_prior_body(&self) -> f64 {
        (1..=LOOKBACK).map(|k| self.body(k)).sum::<f64>() / LOOKBACK as f64
    }
}
