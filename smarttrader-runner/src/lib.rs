//! SmartTrader Runner — CSV loading, report artifacts, parallel batches.
//!
//! This crate builds on `smarttrader-core` to provide:
//! - CSV loading into a `BarSeries` (Polars, case-insensitive headers)
//! - Per-ticker reports with BLAKE3 dataset and config hashes
//! - TOML batch configuration
//! - Parallel multi-ticker runs with per-ticker error isolation

pub mod batch;
pub mod config;
pub mod loader;
pub mod report;

pub use batch::{run_batch, run_ticker, BatchError, BatchResult, SummaryRow, TickerOutcome, TickerRun};
pub use config::{validate_sentiment, BatchConfig, ConfigError, TickerSpec};
pub use loader::{load_csv, LoadError};
pub use report::{AnalysisReport, ReportError, ReportManifest, SCHEMA_VERSION};
