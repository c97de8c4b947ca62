use super::implied::OutcomeDistribution;

/// Blend the aggregate toward the uniform prior, weighted by confidence,
/// then renormalize to absorb float drift.
///
/// `confidence = 1` returns the aggregate unchanged; lower values pull each
/// outcome toward 1/3.
pub fn shrink_toward_prior(agg: &OutcomeDistribution, confidence: f64) -> OutcomeDistribution {
    let prior = OutcomeDistribution::UNIFORM;
    let blend = |p: f64, q: f64| p * confidence + q * (1.0 - confidence);
    OutcomeDistribution {
        host_win: blend(agg.host_win, prior.host_win),
        draw: blend(agg.draw, prior.draw),
        guest_win: blend(agg.guest_win, prior.guest_win),
    }
    .renormalized()
}
