//! Overall recommendation from the fused signals of one security.

use crate::config::ActionThresholds;
use crate::domain::{Action, FusedSignal};

/// Sum of fused strengths. Zero for an empty list.
pub fn total_strength(fused: &[FusedSignal]) -> f64 {
    fused.iter().map(|f| f.strength).sum()
}

/// Bucket the total strength with the same thresholds the per-bar scorer
/// uses.
///
/// Strengths are never negative under the default sentiment settings, so
/// with those settings the sell buckets are unreachable.
pub fn aggregate(fused: &[FusedSignal], thresholds: &ActionThresholds) -> Action {
    Action::from_score(total_strength(fused), thresholds)
}
