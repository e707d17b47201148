//! Batch configuration: which tickers to analyze, from which files, with
//! which sentiment, under which engine settings.
//!
//! ```toml
//! [engine.patterns]
//! doji_tolerance = 0.002
//!
//! [[tickers]]
//! symbol = "AAPL"
//! path = "data/AAPL.csv"
//! sentiment = 0.35
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use smarttrader_core::config::{ConfigError as EngineConfigError, EngineConfig};

use crate::report::sanitize_symbol;

/// Errors from loading or validating a batch configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read batch config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse batch config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Engine(#[from] EngineConfigError),

    #[error("ticker '{symbol}': {reason}")]
    Ticker { symbol: String, reason: String },

    #[error("batch config lists no tickers")]
    Empty,
}

/// One security to analyze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSpec {
    pub symbol: String,
    /// CSV of bars and indicators. Relative paths resolve against the
    /// directory of the batch file.
    pub path: PathBuf,
    /// News sentiment in [-1, 1]. Defaults to neutral.
    #[serde(default)]
    pub sentiment: f64,
}

/// A whole batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub tickers: Vec<TickerSpec>,
}

impl BatchConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file and resolve ticker paths relative to it.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Prefix every relative ticker path with `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for ticker in &mut self.tickers {
            if ticker.path.is_relative() {
                ticker.path = base.join(&ticker.path);
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tickers.is_empty() {
            return Err(ConfigError::Empty);
        }
        self.engine.validate()?;
        for (i, ticker) in self.tickers.iter().enumerate() {
            if ticker.symbol.trim().is_empty() {
                return Err(ConfigError::Ticker {
                    symbol: format!("#{}", i + 1),
                    reason: "symbol is empty".into(),
                });
            }
            validate_sentiment(ticker.sentiment).map_err(|reason| ConfigError::Ticker {
                symbol: ticker.symbol.clone(),
                reason,
            })?;
            if self.tickers[..i].iter().any(|t| t.symbol == ticker.symbol) {
                return Err(ConfigError::Ticker {
                    symbol: ticker.symbol.clone(),
                    reason: "listed more than once".into(),
                });
            }
            // artifacts land in one directory per sanitized symbol
            let dir = sanitize_symbol(&ticker.symbol);
            if let Some(other) = self.tickers[..i]
                .iter()
                .find(|t| sanitize_symbol(&t.symbol) == dir)
            {
                return Err(ConfigError::Ticker {
                    symbol: ticker.symbol.clone(),
                    reason: format!(
                        "shares output directory '{dir}' with ticker '{}'",
                        other.symbol
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Sentiment must be a finite number in [-1, 1].
pub fn validate_sentiment(value: f64) -> Result<(), String> {
    if value.is_finite() && (-1.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("sentiment must be a finite number in [-1, 1], got {value}"))
    }
}
