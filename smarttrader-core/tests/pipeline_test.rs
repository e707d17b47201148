//! End-to-end tests through the public API: scan → score → fuse → aggregate.

use chrono::NaiveDate;
use smarttrader_core::domain::{Action, BarSeries, SignalRecord};
use smarttrader_core::patterns::Pattern;
use smarttrader_core::schema::Field;
use smarttrader_core::{analyze, scan, score, EngineConfig, SchemaError};

// ── Helpers ──────────────────────────────────────────────────────────

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

/// A quiet uptrend of `n` bars with neutral indicators. Bodies are small
/// and shadows balanced, so few patterns fire on their own.
fn quiet_columns(n: usize) -> Vec<(Field, Vec<f64>)> {
    let close: Vec<f64> = (0..n).map(|i| 100.0 + i as f64 * 0.5).collect();
    let open: Vec<f64> = close.iter().map(|c| c - 0.3).collect();
    vec![
        (Field::Open, open),
        (Field::High, close.iter().map(|c| c + 0.4).collect()),
        (Field::Low, close.iter().map(|c| c - 0.7).collect()),
        (Field::Volume, vec![10_000.0; n]),
        (Field::Sma, close.iter().map(|c| c - 1.0).collect()),
        (Field::Rsi, vec![55.0; n]),
        (Field::Macd, vec![0.5; n]),
        (Field::MacdSignal, vec![0.2; n]),
        (Field::Close, close),
    ]
}

fn build(columns: Vec<(Field, Vec<f64>)>) -> BarSeries {
    let n = columns[0].1.len();
    let dates = (0..n)
        .map(|i| base_date() + chrono::Duration::days(i as i64))
        .collect();
    columns
        .into_iter()
        .fold(BarSeries::new("ACME", dates).unwrap(), |s, (f, v)| {
            s.with_column(f, v).unwrap()
        })
}

fn set(columns: &mut [(Field, Vec<f64>)], field: Field, index: usize, value: f64) {
    if let Some((_, values)) = columns.iter_mut().find(|(f, _)| *f == field) {
        values[index] = value;
    }
}

/// Quiet series with a textbook bullish engulfing pair at bars 13 and 14.
fn engulfing_series() -> BarSeries {
    let mut columns = quiet_columns(16);
    for (field, value) in [
        (Field::Open, 10.0),
        (Field::High, 10.2),
        (Field::Low, 7.9),
        (Field::Close, 8.0),
    ] {
        set(&mut columns, field, 13, value);
    }
    for (field, value) in [
        (Field::Open, 7.0),
        (Field::High, 11.1),
        (Field::Low, 6.9),
        (Field::Close, 11.0),
    ] {
        set(&mut columns, field, 14, value);
    }
    build(columns)
}

fn record_on(records: &[SignalRecord], date: NaiveDate) -> &SignalRecord {
    records.iter().find(|r| r.date == date).unwrap()
}

// ── Linkage ──────────────────────────────────────────────────────────

#[test]
fn engulfing_flows_from_scanner_into_scorer() {
    let series = engulfing_series();
    let config = EngineConfig::default();
    let engulfing_day = series.dates()[14];

    let patterns = scan(&series, &config.patterns).unwrap();
    assert!(patterns
        .iter()
        .any(|o| o.date == engulfing_day && o.pattern == Pattern::BullishEngulfing));

    let records = score(&series, &patterns, &config.scoring, &config.actions).unwrap();
    let record = record_on(&records, engulfing_day);
    let hits = record
        .reasons
        .iter()
        .filter(|r| *r == "Pattern detected: Bullish Engulfing")
        .count();
    assert_eq!(hits, 1);
}

#[test]
fn each_pattern_point_is_counted_in_the_score() {
    let series = engulfing_series();
    let config = EngineConfig::default();
    let patterns = scan(&series, &config.patterns).unwrap();
    let with = score(&series, &patterns, &config.scoring, &config.actions).unwrap();
    let without = score(&series, &[], &config.scoring, &config.actions).unwrap();
    assert_eq!(with.len(), without.len());
    for (a, b) in with.iter().zip(&without) {
        let hits = patterns.iter().filter(|o| o.date == a.date).count() as i64;
        assert_eq!(a.score, b.score + hits);
        assert_eq!(&a.reasons[..b.reasons.len()], &b.reasons[..]);
    }
}

// ── Whole pipeline ───────────────────────────────────────────────────

#[test]
fn positive_news_lifts_bullish_patterns() {
    let series = engulfing_series();
    let config = EngineConfig::default();
    let neutral = analyze(&series, 0.0, &config).unwrap();
    let upbeat = analyze(&series, 0.8, &config).unwrap();
    assert_eq!(neutral.patterns, upbeat.patterns);

    let strength = |analysis: &smarttrader_core::Analysis, pattern: Pattern| {
        analysis
            .fused
            .iter()
            .find(|f| f.pattern == pattern)
            .map(|f| f.strength)
    };
    assert_eq!(strength(&neutral, Pattern::BullishEngulfing), Some(1.0));
    assert_eq!(strength(&upbeat, Pattern::BullishEngulfing), Some(1.5));
    // the collapse into the pair is a bearish kicker, which good news weakens
    assert_eq!(strength(&upbeat, Pattern::BearishKicker), Some(0.5));
}

#[test]
fn overall_action_never_sells_on_default_settings() {
    let series = engulfing_series();
    let config = EngineConfig::default();
    for sentiment in [-1.0, -0.5, 0.0, 0.5, 1.0] {
        let analysis = analyze(&series, sentiment, &config).unwrap();
        assert!(analysis.total_strength >= 0.0);
        assert!(!analysis.overall.is_sell(), "sentiment {sentiment}");
    }
}

#[test]
fn latest_signal_is_the_last_scored_bar() {
    let series = engulfing_series();
    let analysis = analyze(&series, 0.0, &EngineConfig::default()).unwrap();
    let latest = analysis.latest_signal().unwrap();
    assert_eq!(latest.date, *series.dates().last().unwrap());
}

#[test]
fn quiet_uptrend_scores_a_buy() {
    let analysis = analyze(&build(quiet_columns(30)), 0.0, &EngineConfig::default()).unwrap();
    let latest = analysis.latest_signal().unwrap();
    // MACD above signal, close above SMA, SMA above its own mean
    assert!(latest.reasons.starts_with(&[
        "MACD Bullish Crossover".to_string(),
        "Price > SMA".to_string(),
    ]));
    assert!(latest.reasons.contains(&"Uptrend".to_string()));
    assert!(latest.score >= 3);
    assert!(matches!(latest.action, Action::LightBuy | Action::HardBuy));
}

#[test]
fn gaps_in_indicators_do_not_break_the_date_join() {
    let mut columns = quiet_columns(16);
    // knock out the RSI two bars before the engulfing pair
    set(&mut columns, Field::Rsi, 11, f64::NAN);
    for (field, value) in [(Field::Open, 10.0), (Field::High, 10.2), (Field::Low, 7.9), (Field::Close, 8.0)] {
        set(&mut columns, field, 13, value);
    }
    for (field, value) in [(Field::Open, 7.0), (Field::High, 11.1), (Field::Low, 6.9), (Field::Close, 11.0)] {
        set(&mut columns, field, 14, value);
    }
    let series = build(columns);
    let analysis = analyze(&series, 0.0, &EngineConfig::default()).unwrap();
    let record = record_on(&analysis.signals, series.dates()[14]);
    assert!(record
        .reasons
        .contains(&"Pattern detected: Bullish Engulfing".to_string()));
    assert!(analysis.signals.iter().all(|r| r.date != series.dates()[11]));
}

// ── Failure modes ────────────────────────────────────────────────────

#[test]
fn prices_without_indicators_scan_but_do_not_score() {
    let columns: Vec<(Field, Vec<f64>)> = quiet_columns(20)
        .into_iter()
        .filter(|(f, _)| !f.is_indicator())
        .collect();
    let series = build(columns);
    let config = EngineConfig::default();
    assert!(scan(&series, &config.patterns).is_ok());
    let err = analyze(&series, 0.0, &config).unwrap_err();
    let SchemaError::MissingColumns(missing) = err;
    assert_eq!(
        missing,
        vec![Field::Sma, Field::Rsi, Field::Macd, Field::MacdSignal]
    );
}

#[test]
fn output_is_stable_across_serialization() {
    let analysis = analyze(&engulfing_series(), 0.3, &EngineConfig::default()).unwrap();
    let first = serde_json::to_string_pretty(&analysis).unwrap();
    let again = analyze(&engulfing_series(), 0.3, &EngineConfig::default()).unwrap();
    assert_eq!(first, serde_json::to_string_pretty(&again).unwrap());
    assert!(first.contains("\"Bullish Engulfing\""));
}
