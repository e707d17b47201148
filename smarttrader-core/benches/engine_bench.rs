//! Criterion benchmarks for SmartTrader hot paths.
//!
//! Benchmarks:
//! 1. Pattern scan (50 rules per bar over a cleaned series)
//! 2. Signal scoring (indicator votes plus the date join)
//! 3. Full analysis (scan, score, fuse, aggregate)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use smarttrader_core::domain::{Bar, BarSeries};
use smarttrader_core::patterns::scan_bars;
use smarttrader_core::schema::Field;
use smarttrader_core::{analyze, scan, score, EngineConfig};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            let open = close + (i as f64 * 0.7).cos() * 1.5;
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0 + (i % 3) as f64 * 0.5,
                low: open.min(close) - 1.0 - (i % 5) as f64 * 0.3,
                close,
                volume: 1_000_000.0 + (i % 7) as f64 * 250_000.0,
            }
        })
        .collect()
}

fn make_series(n: usize) -> BarSeries {
    let bars = make_bars(n);
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let sma: Vec<f64> = (0..n)
        .map(|i| {
            let from = i.saturating_sub(19);
            closes[from..=i].iter().sum::<f64>() / (i - from + 1) as f64
        })
        .collect();
    let rsi: Vec<f64> = (0..n).map(|i| 50.0 + (i as f64 * 0.05).sin() * 30.0).collect();
    let macd: Vec<f64> = (0..n).map(|i| (i as f64 * 0.08).sin()).collect();
    let macd_signal: Vec<f64> = (0..n).map(|i| (i as f64 * 0.08 - 0.3).sin()).collect();

    BarSeries::from_bars("BENCH", &bars)
        .and_then(|s| s.with_column(Field::Sma, sma))
        .and_then(|s| s.with_column(Field::Rsi, rsi))
        .and_then(|s| s.with_column(Field::Macd, macd))
        .and_then(|s| s.with_column(Field::MacdSignal, macd_signal))
        .unwrap()
}

// ── 1. Pattern Scan ──────────────────────────────────────────────────

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_scan");
    let config = EngineConfig::default();

    for &bar_count in &[252, 1260, 2520] {
        let bars = make_bars(bar_count);
        group.bench_with_input(BenchmarkId::new("clean_bars", bar_count), &bar_count, |b, _| {
            b.iter(|| scan_bars(black_box(&bars), black_box(&config.patterns)));
        });

        let series = make_series(bar_count);
        group.bench_with_input(BenchmarkId::new("series", bar_count), &bar_count, |b, _| {
            b.iter(|| scan(black_box(&series), black_box(&config.patterns)));
        });
    }

    group.finish();
}

// ── 2. Signal Scoring ────────────────────────────────────────────────

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("signal_score");
    let config = EngineConfig::default();

    for &bar_count in &[252, 1260, 2520] {
        let series = make_series(bar_count);
        let patterns = scan(&series, &config.patterns).unwrap();
        group.bench_with_input(BenchmarkId::new("with_patterns", bar_count), &bar_count, |b, _| {
            b.iter(|| {
                score(
                    black_box(&series),
                    black_box(&patterns),
                    &config.scoring,
                    &config.actions,
                )
            });
        });
    }

    group.finish();
}

// ── 3. Full Analysis ─────────────────────────────────────────────────

fn bench_analyze(c: &mut Criterion) {
    let config = EngineConfig::default();
    let series = make_series(2520);
    c.bench_function("analyze_2520_bars", |b| {
        b.iter(|| analyze(black_box(&series), black_box(0.35), &config));
    });
}

criterion_group!(benches, bench_scan, bench_score, bench_analyze);
criterion_main!(benches);
