use std::collections::BTreeMap;

use super::domain::Dimension;
use super::profile::CategoryWeightProfile;
use super::ScoringError;

/// Weighted base score before guardrails, clamped to [0, 100].
///
/// Positive weights contribute `value * w`; negative weights contribute
/// `(100 - value) * |w|`. Dimensions missing from `scores` count as 0.
pub fn aggregate(
    profile: &CategoryWeightProfile,
    scores: &BTreeMap<Dimension, f64>,
) -> Result<f64, ScoringError> {
    let mut base = 0.0;
    for (dimension, weight) in profile.iter() {
        let value = scores.get(&dimension).copied().unwrap_or(0.0);
        if weight >= 0.0 {
            base += value * weight;
        } else {
            base += (100.0 - value) * weight.abs();
        }
    }

    if !base.is_finite() {
        return Err(ScoringError::NonFinite { stage: "aggregate" });
    }
    Ok(base.clamp(0.0, 100.0))
}
