//! Bar — the fundamental market data unit, plus the candle geometry every
//! pattern rule is written in terms of.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single trading day.
///
/// Undefined values are carried as `f64::NAN`. Bars handed to the pattern
/// scanner have already been cleaned, so their OHLC fields are finite; the
/// volume may still be NaN when the series carries no volume column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Returns true if any OHLC field is undefined.
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// OHLC sanity check: `low <= min(open, close) <= max(open, close) <= high`,
    /// positive prices, non-negative volume (when present).
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
            && (self.volume.is_nan() || self.volume >= 0.0)
    }

    /// Absolute size of the real body.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Full high-to-low range.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn upper_shadow(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    pub fn lower_shadow(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    /// Close strictly above open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Close strictly below open.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Body no larger than `tolerance` times the close.
    pub fn is_doji(&self, tolerance: f64) -> bool {
        self.body() <= tolerance * self.close
    }

    /// Midpoint of the open/close range.
    pub fn body_midpoint(&self) -> f64 {
        (self.open + self.close) / 2.0
    }
}
