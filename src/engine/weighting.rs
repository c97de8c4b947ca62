//! Recency weighting and the weighted aggregate.
//!
//! Matches are ranked newest first and weighted `exp(-λ·rank)`: recent
//! meetings dominate, older ones fade out smoothly without a hard window.
//! Confidence comes from how much the per-match host-win probability
//! scatters; the same scalar later drives shrinkage for all three outcomes.

use super::implied::{implied_probabilities, OutcomeDistribution};
use super::validator::ValidMatchSet;

/// Exponential decay rate per recency rank.
pub const RECENCY_DECAY: f64 = 0.15;
/// Lower bound on confidence so the prior always keeps some weight.
pub const MIN_CONFIDENCE: f64 = 0.3;
/// Confidence used when dispersion is undefined (a single match).
pub const SINGLE_MATCH_CONFIDENCE: f64 = 0.5;

/// Weight per recency rank, rank 0 = most recent.
pub fn recency_weights(n: usize) -> Vec<f64> {
    (0..n).map(|i| (-RECENCY_DECAY * i as f64).exp()).collect()
}

/// Sample standard deviation (n-1 denominator). `None` below two samples.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(var.sqrt())
}

/// Map host-win dispersion to a confidence in [0.3, 1.0].
pub fn confidence_from_dispersion(host_win_probs: &[f64]) -> f64 {
    match sample_std(host_win_probs) {
        Some(std) if std.is_finite() => (1.0 - std).clamp(MIN_CONFIDENCE, 1.0),
        _ => SINGLE_MATCH_CONFIDENCE,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedAggregate {
    pub distribution: OutcomeDistribution,
    pub confidence: f64,
    pub total_weight: f64,
}

/// Recency-weighted mean of the de-vigged probabilities over the valid set.
pub fn aggregate(set: &ValidMatchSet) -> WeightedAggregate {
    assert!(!set.is_empty(), "aggregate requires a non-empty match set");
    let ranked = set.by_recency();

    let probs: Vec<OutcomeDistribution> = ranked.iter().map(implied_probabilities).collect();
    let weights = recency_weights(probs.len());
    let total_weight: f64 = weights.iter().sum();

    let weighted = |pick: fn(&OutcomeDistribution) -> f64| -> f64 {
        probs
            .iter()
            .zip(&weights)
            .map(|(p, w)| w * pick(p))
            .sum::<f64>()
            / total_weight
    };

    let distribution = OutcomeDistribution {
        host_win: weighted(|p| p.host_win),
        draw: weighted(|p| p.draw),
        guest_win: weighted(|p| p.guest_win),
    };
    let host_probs: Vec<f64> = probs.iter().map(|p| p.host_win).collect();

    WeightedAggregate {
        distribution,
        confidence: confidence_from_dispersion(&host_probs),
        total_weight,
    }
}
