//! SmartTrader Core — candlestick patterns, indicator scoring and sentiment
//! fusion over daily bar series.
//!
//! This crate contains the analysis engine:
//! - Domain types (bars, bar series, occurrences, signal records, actions)
//! - Pattern scanner driven by a declarative 50-rule table
//! - Signal scorer combining indicator votes with pattern hits
//! - Sentiment fuser and the overall-action aggregator
//!
//! Every entry point is a pure function of its inputs and an injected
//! [`config::EngineConfig`]. Nothing here performs I/O.

pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod domain;
pub mod patterns;
pub mod schema;
pub mod scoring;
pub mod sentiment;

pub use aggregate::{aggregate, total_strength};
pub use analysis::{analyze, Analysis};
pub use config::{ActionThresholds, ConfigError, EngineConfig, PatternConfig, ScoringConfig, SentimentConfig};
pub use domain::{Action, Bar, BarSeries, FusedSignal, PatternOccurrence, SignalRecord};
pub use patterns::{scan, Pattern};
pub use schema::{Field, SchemaError};
pub use scoring::score;
pub use sentiment::fuse;
