//! Sentiment fusion: weight each pattern occurrence by news polarity.
//!
//! Every occurrence starts at the base strength. A bullish label gains when
//! sentiment is positive and loses when it is negative; a bearish label does
//! the opposite. Labels naming neither polarity keep the base strength.

use crate::config::SentimentConfig;
use crate::domain::{FusedSignal, PatternOccurrence};
use crate::patterns::Polarity;

/// Fuse a sentiment score into a list of occurrences, preserving order.
pub fn fuse(
    patterns: &[PatternOccurrence],
    sentiment: f64,
    config: &SentimentConfig,
) -> Vec<FusedSignal> {
    patterns
        .iter()
        .map(|occurrence| FusedSignal {
            date: occurrence.date,
            pattern: occurrence.pattern,
            strength: config.base_strength
                + adjustment(occurrence.pattern.polarity(), sentiment, config),
        })
        .collect()
}

fn adjustment(polarity: Option<Polarity>, sentiment: f64, config: &SentimentConfig) -> f64 {
    let positive = sentiment > config.positive_threshold;
    let negative = sentiment < config.negative_threshold;
    match polarity {
        Some(Polarity::Bullish) if positive => config.adjustment,
        Some(Polarity::Bullish) if negative => -config.adjustment,
        Some(Polarity::Bearish) if negative => config.adjustment,
        Some(Polarity::Bearish) if positive => -config.adjustment,
        _ => 0.0,
    }
}
