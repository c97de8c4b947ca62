//! Head-to-head probability engine.
//!
//! Pipeline, each stage a pure function of the previous one:
//! validate → de-vig → recency-weight → aggregate → shrink → expected goals
//! → Monte Carlo scorelines → fair odds. The only side input is the RNG,
//! passed in by the caller so runs are reproducible under a fixed seed.

pub mod error;
pub mod goals;
pub mod implied;
pub mod odds;
pub mod shrinkage;
pub mod simulation;
pub mod validator;
pub mod weighting;

pub use error::EngineError;
pub use implied::OutcomeDistribution;
pub use odds::{fair_odds, FairOdds, SignalStrength};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::records::RawMatchRecord;
use goals::{expected_goals, GoalExpectation};
use implied::overround;
use odds::{quarter_line_probability, round_to};
use shrinkage::shrink_toward_prior;
use simulation::{simulate_goals, SimulationResult};
use validator::validate_records;
use weighting::aggregate;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeMarkets {
    pub host_win: f64,
    pub draw: f64,
    pub guest_win: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalMarkets {
    pub over_1_5: f64,
    pub over_2_5: f64,
    pub over_3_5: f64,
    pub btts: f64,
}

/// Fair prices for the three outcome and four goal markets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketOdds {
    pub host_win: FairOdds,
    pub draw: FairOdds,
    pub guest_win: FairOdds,
    pub over_1_5: FairOdds,
    pub over_2_5: FairOdds,
    pub over_3_5: FairOdds,
    pub btts: FairOdds,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricedMarket {
    pub probability: f64,
    pub odds: FairOdds,
}

impl PricedMarket {
    fn new(p: f64) -> Self {
        PricedMarket {
            probability: round_to(p, 4),
            odds: fair_odds(p),
        }
    }
}

/// Asian handicap lines priced off the simulated scorelines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandicapMarkets {
    pub host_minus_0_25: PricedMarket,
    pub guest_minus_0_25: PricedMarket,
    pub host_minus_2_5: PricedMarket,
    pub guest_minus_2_5: PricedMarket,
}

/// Intermediate model values, for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelDetail {
    /// Weighted aggregate before shrinkage.
    pub raw_outcome: OutcomeMarkets,
    pub expected_goals: GoalExpectation,
    /// Mean bookmaker overround across the analyzed matches.
    pub mean_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineResult {
    pub outcome: OutcomeMarkets,
    pub goal_markets: GoalMarkets,
    pub odds: MarketOdds,
    pub handicap: HandicapMarkets,
    pub confidence: f64,
    pub signal_strength: SignalStrength,
    /// Size of the validated match set.
    pub total_matches: usize,
    /// Rows received, including rejected ones.
    pub total_records: usize,
    pub model: ModelDetail,
}

fn rounded_outcome(d: &OutcomeDistribution) -> OutcomeMarkets {
    OutcomeMarkets {
        host_win: round_to(d.host_win, 4),
        draw: round_to(d.draw, 4),
        guest_win: round_to(d.guest_win, 4),
    }
}

fn handicap_markets(sim: &SimulationResult) -> HandicapMarkets {
    HandicapMarkets {
        host_minus_0_25: PricedMarket::new(quarter_line_probability(
            sim.p_host_ahead(),
            sim.p_level(),
            sim.p_guest_ahead(),
        )),
        guest_minus_0_25: PricedMarket::new(quarter_line_probability(
            sim.p_guest_ahead(),
            sim.p_level(),
            sim.p_host_ahead(),
        )),
        host_minus_2_5: PricedMarket::new(sim.p_host_by_3_plus()),
        guest_minus_2_5: PricedMarket::new(sim.p_guest_by_3_plus()),
    }
}

/// Run the full pipeline over raw records with the caller's random source.
pub fn analyze<R: Rng + ?Sized>(
    records: &[RawMatchRecord],
    rng: &mut R,
) -> Result<EngineResult, EngineError> {
    let (matches, report) = validate_records(records)?;

    let agg = aggregate(&matches);
    let mean_margin = matches.chronological().iter().map(overround).sum::<f64>()
        / matches.len() as f64;
    debug!(
        "Aggregate H/D/G {:.4}/{:.4}/{:.4} (confidence {:.3}, weight {:.3})",
        agg.distribution.host_win,
        agg.distribution.draw,
        agg.distribution.guest_win,
        agg.confidence,
        agg.total_weight
    );

    let shrunk = shrink_toward_prior(&agg.distribution, agg.confidence);
    let goals = expected_goals(&shrunk);
    debug!("Expected goals host {:.3} guest {:.3}", goals.host, goals.guest);

    let sim = simulate_goals(&shrunk, &goals, rng);

    let result = EngineResult {
        outcome: rounded_outcome(&shrunk),
        goal_markets: GoalMarkets {
            over_1_5: round_to(sim.p_over_1_5(), 4),
            over_2_5: round_to(sim.p_over_2_5(), 4),
            over_3_5: round_to(sim.p_over_3_5(), 4),
            btts: round_to(sim.p_btts(), 4),
        },
        odds: MarketOdds {
            host_win: fair_odds(shrunk.host_win),
            draw: fair_odds(shrunk.draw),
            guest_win: fair_odds(shrunk.guest_win),
            over_1_5: fair_odds(sim.p_over_1_5()),
            over_2_5: fair_odds(sim.p_over_2_5()),
            over_3_5: fair_odds(sim.p_over_3_5()),
            btts: fair_odds(sim.p_btts()),
        },
        handicap: handicap_markets(&sim),
        confidence: round_to(agg.confidence, 2),
        signal_strength: SignalStrength::from_host_probability(shrunk.host_win),
        total_matches: matches.len(),
        total_records: report.total,
        model: ModelDetail {
            raw_outcome: rounded_outcome(&agg.distribution),
            expected_goals: goals,
            mean_margin: round_to(mean_margin, 4),
        },
    };

    info!(
        "Host win {:.2}% / draw {:.2}% / guest win {:.2}% over {} matches (confidence {:.0}%)",
        shrunk.host_win * 100.0,
        shrunk.draw * 100.0,
        shrunk.guest_win * 100.0,
        result.total_matches,
        agg.confidence * 100.0
    );
    Ok(result)
}

/// `analyze` with a seeded RNG when `seed` is set, fresh entropy otherwise.
pub fn analyze_with_seed(
    records: &[RawMatchRecord],
    seed: Option<u64>,
) -> Result<EngineResult, EngineError> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    analyze(records, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scenario_records() -> Vec<RawMatchRecord> {
        vec![
            RawMatchRecord::new("01.03.2023", 2.0, 3.0, 4.0),
            RawMatchRecord::new("11.03.2023", 1.8, 3.2, 4.5),
            RawMatchRecord::new("21.03.2023", 2.2, 3.1, 3.8),
        ]
    }

    #[test]
    fn three_match_scenario() {
        let r = analyze_with_seed(&scenario_records(), Some(2024)).unwrap();
        assert_eq!(r.total_matches, 3);
        assert_eq!(r.total_records, 3);
        let sum = r.outcome.host_win + r.outcome.draw + r.outcome.guest_win;
        assert_relative_eq!(sum, 1.0, epsilon = 2e-4);
        assert!((0.3..=1.0).contains(&r.confidence));
        assert!(r.goal_markets.over_2_5 > 0.0 && r.goal_markets.over_2_5 < 1.0);
        assert!(r.goal_markets.over_1_5 >= r.goal_markets.over_2_5);
        assert!(r.goal_markets.over_2_5 >= r.goal_markets.over_3_5);
        assert!(r.outcome.host_win > r.outcome.guest_win);
    }

    #[test]
    fn identical_seed_is_bit_identical() {
        let a = analyze_with_seed(&scenario_records(), Some(7)).unwrap();
        let b = analyze_with_seed(&scenario_records(), Some(7)).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn empty_input_is_insufficient() {
        let err = analyze_with_seed(&[], Some(1)).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientData(error::InsufficientData::NoValidDates)
        );
        assert_eq!(err.reason(), "no valid dated matches");
    }

    #[test]
    fn non_positive_odds_are_insufficient() {
        let records = vec![
            RawMatchRecord::new("01.01.2022", 0.0, 3.0, 4.0),
            RawMatchRecord::new("08.01.2022", 2.0, 0.0, 4.0),
            RawMatchRecord::new("15.01.2022", 2.0, 3.0, -4.0),
        ];
        let err = analyze_with_seed(&records, Some(1)).unwrap_err();
        assert_eq!(err.reason(), "insufficient valid odds data");
    }

    #[test]
    fn subnormal_odds_are_excluded_not_fatal() {
        let lone = vec![RawMatchRecord::new("01.01.2020", 1e-320, 3.0, 4.0)];
        let err = analyze_with_seed(&lone, Some(1)).unwrap_err();
        assert_eq!(err.reason(), "insufficient valid odds data");

        let mixed = vec![
            RawMatchRecord::new("01.01.2020", 1e-320, 3.0, 4.0),
            RawMatchRecord::new("08.01.2020", 2.0, 3.0, 4.0),
        ];
        let r = analyze_with_seed(&mixed, Some(1)).unwrap();
        assert_eq!(r.total_matches, 1);
        assert_eq!(r.total_records, 2);
    }

    #[test]
    fn single_match_uses_half_confidence() {
        let records = vec![RawMatchRecord::new("2023-05-05", 1.5, 4.2, 6.5)];
        let r = analyze_with_seed(&records, Some(3)).unwrap();
        assert_eq!(r.confidence, 0.5);
        // shrinkage pulls the favourite toward 1/3
        assert!(r.outcome.host_win < r.model.raw_outcome.host_win);
        assert!(r.outcome.host_win > 1.0 / 3.0);
    }

    #[test]
    fn rejected_rows_counted_but_not_analyzed() {
        let mut records = scenario_records();
        records.push(RawMatchRecord::new("n/a", 2.0, 3.0, 4.0));
        records.push(RawMatchRecord::new("30.03.2023", "", 3.0, 4.0));
        let r = analyze_with_seed(&records, Some(5)).unwrap();
        assert_eq!(r.total_matches, 3);
        assert_eq!(r.total_records, 5);
    }

    #[test]
    fn margin_reported() {
        let records = vec![RawMatchRecord::new("01.01.2020", 2.0, 3.0, 4.0)];
        let r = analyze_with_seed(&records, Some(1)).unwrap();
        assert_relative_eq!(r.model.mean_margin, 0.0833, epsilon = 1e-9);
    }

    #[test]
    fn odds_track_probabilities() {
        let r = analyze_with_seed(&scenario_records(), Some(11)).unwrap();
        let host = r.odds.host_win.price().unwrap();
        assert!((host * r.outcome.host_win - 1.0).abs() < 0.01);
        let btts = r.odds.btts.price().unwrap();
        assert!((btts * r.goal_markets.btts - 1.0).abs() < 0.01);
    }

    #[test]
    fn handicap_lines_are_consistent() {
        let r = analyze_with_seed(&scenario_records(), Some(13)).unwrap();
        let h = r.handicap;
        assert!(h.host_minus_2_5.probability < h.host_minus_0_25.probability);
        assert!(h.guest_minus_2_5.probability < h.guest_minus_0_25.probability);
        // host is favoured in this set
        assert!(h.host_minus_0_25.probability > h.guest_minus_0_25.probability);
    }
}
