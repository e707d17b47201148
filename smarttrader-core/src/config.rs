//! Engine configuration — tolerances and thresholds for every stage.
//!
//! Loaded once (defaults or a TOML file) and then passed by reference into
//! each call. Nothing in the engine reads configuration from globals, so two
//! calls with the same input and the same config produce identical output.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub patterns: PatternConfig,
    pub scoring: ScoringConfig,
    pub sentiment: SentimentConfig,
    pub actions: ActionThresholds,
}

impl EngineConfig {
    /// Parse from TOML. Missing tables and keys fall back to defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.patterns.validate()?;
        self.scoring.validate()?;
        self.sentiment.validate()?;
        self.actions.validate()
    }
}

/// Pattern scanner tolerances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// A bar is a doji when its body is at most this fraction of its close.
    pub doji_tolerance: f64,
    /// Relative tolerance for the equality tests (marubozu, tweezers,
    /// matching low, belt hold, separating lines, kicking, dragonfly and
    /// gravestone doji).
    pub equality_epsilon: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            doji_tolerance: 0.001,
            equality_epsilon: 1e-9,
        }
    }
}

impl PatternConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.doji_tolerance >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "patterns.doji_tolerance must be >= 0, got {}",
                self.doji_tolerance
            )));
        }
        if !(self.equality_epsilon >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "patterns.equality_epsilon must be >= 0, got {}",
                self.equality_epsilon
            )));
        }
        Ok(())
    }
}

/// Signal scorer thresholds and windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    /// Volume above this multiple of its rolling mean is a spike.
    pub volume_spike_multiplier: f64,
    /// Window of the rolling mean over the SMA column (long trend).
    pub trend_window: usize,
    /// Window of the rolling mean over volume (volume baseline).
    pub volume_window: usize,
    /// Fewer clean rows than this produce no records.
    pub min_history: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            volume_spike_multiplier: 1.5,
            trend_window: 10,
            volume_window: 10,
            min_history: 10,
        }
    }
}

impl ScoringConfig {
    /// First cleaned position that gets a record. A zero window never
    /// warms up, so it does not push the start back.
    pub fn first_scored_index(&self) -> usize {
        self.min_history
            .max(self.trend_window.saturating_sub(1))
            .max(self.volume_window.saturating_sub(1))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.trend_window == 0 || self.volume_window == 0 {
            return Err(ConfigError::Invalid(
                "scoring.trend_window and scoring.volume_window must be >= 1".into(),
            ));
        }
        if !(self.rsi_oversold < self.rsi_overbought) {
            return Err(ConfigError::Invalid(format!(
                "scoring.rsi_oversold ({}) must be below scoring.rsi_overbought ({})",
                self.rsi_oversold, self.rsi_overbought
            )));
        }
        if !(self.volume_spike_multiplier > 0.0) {
            return Err(ConfigError::Invalid(
                "scoring.volume_spike_multiplier must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Sentiment fusion thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Sentiment strictly above this is positive.
    pub positive_threshold: f64,
    /// Sentiment strictly below this is negative.
    pub negative_threshold: f64,
    /// Strength added or removed per matching rule.
    pub adjustment: f64,
    /// Starting strength of every occurrence.
    pub base_strength: f64,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            positive_threshold: 0.2,
            negative_threshold: -0.2,
            adjustment: 0.5,
            base_strength: 1.0,
        }
    }
}

impl SentimentConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.negative_threshold <= self.positive_threshold) {
            return Err(ConfigError::Invalid(format!(
                "sentiment.negative_threshold ({}) must not exceed sentiment.positive_threshold ({})",
                self.negative_threshold, self.positive_threshold
            )));
        }
        if !self.adjustment.is_finite() || !self.base_strength.is_finite() {
            return Err(ConfigError::Invalid(
                "sentiment.adjustment and sentiment.base_strength must be finite".into(),
            ));
        }
        Ok(())
    }
}

/// Score boundaries of the five action buckets. Shared by the per-bar scorer
/// and the fused-strength aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionThresholds {
    pub hard_buy: f64,
    pub light_buy: f64,
    pub light_sell: f64,
    pub hard_sell: f64,
}

impl Default for ActionThresholds {
    fn default() -> Self {
        Self {
            hard_buy: 4.0,
            light_buy: 2.0,
            light_sell: -2.0,
            hard_sell: -4.0,
        }
    }
}

impl ActionThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        let ordered = self.hard_sell <= self.light_sell
            && self.light_sell < self.light_buy
            && self.light_buy <= self.hard_buy;
        if !ordered {
            return Err(ConfigError::Invalid(format!(
                "actions must satisfy hard_sell <= light_sell < light_buy <= hard_buy, got {} / {} / {} / {}",
                self.hard_sell, self.light_sell, self.light_buy, self.hard_buy
            )));
        }
        Ok(())
    }
}
