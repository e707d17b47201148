//! Engine outputs: pattern occurrences, per-bar signal records, fused signals
//! and the five-level action ladder they all resolve to.
//!
//! All of these are immutable once produced and serialize losslessly; reason
//! order in a [`SignalRecord`] is part of its meaning.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ActionThresholds;
use crate::patterns::Pattern;

/// Ordinal trading recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "HARD SELL")]
    HardSell,
    #[serde(rename = "Light Sell")]
    LightSell,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "Light Buy")]
    LightBuy,
    #[serde(rename = "HARD BUY")]
    HardBuy,
}

impl Action {
    /// Bucket a score, checking from the most bullish bucket down.
    pub fn from_score(value: f64, thresholds: &ActionThresholds) -> Self {
        if value >= thresholds.hard_buy {
            Action::HardBuy
        } else if value >= thresholds.light_buy {
            Action::LightBuy
        } else if value <= thresholds.hard_sell {
            Action::HardSell
        } else if value <= thresholds.light_sell {
            Action::LightSell
        } else {
            Action::Hold
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Action::HardBuy => "HARD BUY",
            Action::LightBuy => "Light Buy",
            Action::Hold => "HOLD",
            Action::LightSell => "Light Sell",
            Action::HardSell => "HARD SELL",
        }
    }

    pub fn is_buy(&self) -> bool {
        matches!(self, Action::HardBuy | Action::LightBuy)
    }

    pub fn is_sell(&self) -> bool {
        matches!(self, Action::HardSell | Action::LightSell)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named formation detected at a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternOccurrence {
    pub date: NaiveDate,
    pub pattern: Pattern,
}

/// The scorer's verdict for a single bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub date: NaiveDate,
    pub action: Action,
    pub score: i64,
    /// Contributing factors in evaluation order.
    pub reasons: Vec<String>,
}

/// A pattern occurrence weighted by news sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusedSignal {
    pub date: NaiveDate,
    pub pattern: Pattern,
    pub strength: f64,
}
