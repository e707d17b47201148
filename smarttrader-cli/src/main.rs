//! SmartTrader CLI — analyze, patterns, batch and explain commands.
//!
//! Commands:
//! - `analyze` — scan, score and fuse one CSV; print the latest signal and the overall action
//! - `patterns` — list every candlestick pattern occurrence in one CSV
//! - `batch` — analyze many tickers in parallel from a TOML batch file
//! - `explain` — describe the indicator rules and the action ladder

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use smarttrader_core::schema::PATTERN_FIELDS;
use smarttrader_core::{scan, Analysis, EngineConfig, Pattern};
use smarttrader_runner::batch::SUMMARY_FILE;
use smarttrader_runner::{load_csv, run_batch, validate_sentiment, AnalysisReport, BatchConfig};

#[derive(Parser)]
#[command(
    name = "smarttrader",
    about = "SmartTrader CLI — candlestick patterns, indicator scoring and sentiment fusion"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one security from a CSV of bars and indicators.
    Analyze {
        /// CSV with date, OHLCV and indicator columns.
        #[arg(long)]
        input: PathBuf,

        /// Symbol to report under. Defaults to the file name.
        #[arg(long)]
        symbol: Option<String>,

        /// News sentiment in [-1, 1].
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        sentiment: f64,

        /// Engine configuration (TOML). Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write report.json and signals.csv under <DIR>/<SYMBOL>/.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print the full analysis as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// List candlestick pattern occurrences in one CSV.
    Patterns {
        /// CSV with date and OHLC columns.
        #[arg(long)]
        input: PathBuf,

        /// Engine configuration (TOML).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Analyze every ticker listed in a batch file, in parallel.
    Batch {
        /// Batch file with [[tickers]] entries and an optional [engine] table.
        #[arg(long)]
        config: PathBuf,

        /// Save per-ticker artifacts and batch_summary.json here.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Describe the scoring rules, the sentiment rules and the action ladder.
    Explain {
        /// Engine configuration (TOML) whose thresholds to describe.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            symbol,
            sentiment,
            config,
            output_dir,
            json,
        } => run_analyze(&input, symbol, sentiment, config.as_deref(), output_dir.as_deref(), json),
        Commands::Patterns { input, config } => run_patterns(&input, config.as_deref()),
        Commands::Batch { config, output_dir } => run_batch_cmd(&config, output_dir.as_deref()),
        Commands::Explain { config } => run_explain(config.as_deref()),
    }
}

/// Used when `RUST_LOG` is unset. `smarttrader` is this binary's own target.
const DEFAULT_LOG_FILTER: &str = "smarttrader=info,smarttrader_core=info,smarttrader_runner=info";

/// Logs go to stderr so `--json` output stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::from_file(p)
            .with_context(|| format!("loading engine config {}", p.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Upper-cased file stem, e.g. `data/aapl.csv` -> `AAPL`.
fn symbol_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_uppercase())
}

fn run_analyze(
    input: &Path,
    symbol: Option<String>,
    sentiment: f64,
    config_path: Option<&Path>,
    output_dir: Option<&Path>,
    json: bool,
) -> Result<()> {
    if let Err(reason) = validate_sentiment(sentiment) {
        bail!("--sentiment: {reason}");
    }
    let Some(symbol) = symbol.or_else(|| symbol_from_path(input)) else {
        bail!("cannot derive a symbol from '{}'; pass --symbol", input.display());
    };

    let config = load_engine_config(config_path)?;
    let series = load_csv(input, &symbol)?;
    let report = AnalysisReport::build(&series, sentiment, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.analysis)?);
    } else {
        print_analysis(&report.analysis);
    }

    if let Some(dir) = output_dir {
        let saved = report.save(dir)?;
        tracing::info!(symbol = %symbol, dir = %saved.display(), "artifacts saved");
    }
    Ok(())
}

fn run_patterns(input: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_engine_config(config_path)?;
    let symbol = symbol_from_path(input).unwrap_or_else(|| "INPUT".into());
    let series = load_csv(input, &symbol)?;
    let occurrences = scan(&series, &config.patterns)?;

    let scanned = series.clean(PATTERN_FIELDS)?.len();
    println!("{symbol}: {} pattern(s) over {scanned} bar(s)", occurrences.len());
    if occurrences.is_empty() {
        return Ok(());
    }
    println!();
    println!("{:<12} {:<32} {:<8}", "Date", "Pattern", "Polarity");
    println!("{}", "-".repeat(54));
    for occ in &occurrences {
        let polarity = occ
            .pattern
            .polarity()
            .map(|p| format!("{p:?}"))
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<12} {:<32} {:<8}",
            occ.date.to_string(),
            occ.pattern.label(),
            polarity
        );
    }
    Ok(())
}

fn run_batch_cmd(config_path: &Path, output_dir: Option<&Path>) -> Result<()> {
    let batch = BatchConfig::from_file(config_path)
        .with_context(|| format!("loading batch config {}", config_path.display()))?;
    let result = run_batch(&batch, output_dir);

    println!();
    println!(
        "{:<10} {:<11} {:>9} {:<11} {:>6} {:>9}",
        "Symbol", "Overall", "Strength", "Latest", "Score", "Patterns"
    );
    println!("{}", "-".repeat(61));
    for row in result.summary() {
        match (&row.error, row.overall) {
            (None, Some(overall)) => println!(
                "{:<10} {:<11} {:>9.2} {:<11} {:>6} {:>9}",
                row.symbol,
                overall.label(),
                row.total_strength.unwrap_or_default(),
                row.latest_action.map(|a| a.label()).unwrap_or("-"),
                row.latest_score.map(|s| s.to_string()).unwrap_or_else(|| "-".into()),
                row.patterns
            ),
            (error, _) => println!(
                "{:<10} FAILED: {}",
                row.symbol,
                error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
    println!();

    if let Some(dir) = output_dir {
        let path = result.write_summary(dir)?;
        tracing::info!(path = %path.display(), "batch summary saved");
    }

    let failed = result.failure_count();
    if failed > 0 {
        bail!(
            "{failed} of {} ticker(s) failed (see {SUMMARY_FILE} or the table above)",
            result.outcomes.len()
        );
    }
    Ok(())
}

fn run_explain(config_path: Option<&Path>) -> Result<()> {
    let config = load_engine_config(config_path)?;
    let s = &config.scoring;
    let f = &config.sentiment;
    let a = &config.actions;

    println!("=== Signal Score (per bar) ===");
    println!(
        "Scored once {} clean rows with close, volume, SMA, RSI, MACD and MACD signal exist.",
        s.min_history
    );
    println!("  RSI < {:<6}        +2  oversold", s.rsi_oversold);
    println!("  RSI > {:<6}        -2  overbought", s.rsi_overbought);
    println!("  MACD > signal       +1  bullish crossover");
    println!("  MACD < signal       -1  bearish crossover");
    println!("  close > SMA         +1  price above its average");
    println!("  close < SMA         -1  price below its average");
    println!(
        "  volume spike        +1  volume above {}x its {}-bar mean",
        s.volume_spike_multiplier, s.volume_window
    );
    println!(
        "  trend               +1 / -1  SMA above (Uptrend) or not above (Downtrend) its {}-bar mean",
        s.trend_window
    );
    println!("  pattern             +1  each pattern detected on the same date");
    println!();

    println!("=== Sentiment Fusion (per pattern occurrence) ===");
    println!("  every occurrence starts at {}", f.base_strength);
    println!(
        "  sentiment > {} : Bullish patterns +{step}, Bearish patterns -{step}",
        f.positive_threshold,
        step = f.adjustment
    );
    println!(
        "  sentiment < {} : Bullish patterns -{step}, Bearish patterns +{step}",
        f.negative_threshold,
        step = f.adjustment
    );
    println!("  patterns without a polarity keep the base strength");
    println!();

    println!("=== Action Ladder (bar score or total fused strength) ===");
    println!("  >= {:<6} HARD BUY", a.hard_buy);
    println!("  >= {:<6} Light Buy", a.light_buy);
    println!("  <= {:<6} HARD SELL", a.hard_sell);
    println!("  <= {:<6} Light Sell", a.light_sell);
    println!("  otherwise  HOLD");
    println!();

    println!("=== Patterns ({}) ===", Pattern::ALL.len());
    for pattern in Pattern::ALL {
        let polarity = pattern
            .polarity()
            .map(|p| format!("{p:?}"))
            .unwrap_or_else(|| "-".into());
        println!("  {:<32} {polarity}", pattern.label());
    }
    Ok(())
}

fn print_analysis(analysis: &Analysis) {
    println!();
    println!("=== {} ===", analysis.symbol);
    println!("Patterns found: {}", analysis.patterns.len());
    println!("Bars scored:    {}", analysis.signals.len());
    println!();

    match analysis.latest_signal() {
        Some(latest) => {
            println!("--- Latest Signal ({}) ---", latest.date);
            println!("Action: {}", latest.action);
            println!("Score:  {}", latest.score);
            for reason in &latest.reasons {
                println!("  - {reason}");
            }
        }
        None => println!("--- Latest Signal ---\n(not enough history to score)"),
    }
    println!();

    println!("--- Sentiment Fusion ---");
    println!("Sentiment:      {:+.2}", analysis.sentiment);
    println!("Total strength: {:.2}", analysis.total_strength);
    println!("Overall:        {}", analysis.overall);
    if !analysis.fused.is_empty() {
        println!();
        for fused in analysis.fused.iter().rev().take(10) {
            println!(
                "  {:<12} {:<32} {:.2}",
                fused.date.to_string(),
                fused.pattern.label(),
                fused.strength
            );
        }
        if analysis.fused.len() > 10 {
            println!("  ... {} earlier", analysis.fused.len() - 10);
        }
    }
    println!();
}
