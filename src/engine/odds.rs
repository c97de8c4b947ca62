//! Fair (zero-margin) pricing of market probabilities.
//!
//! A fair decimal price is the reciprocal of the probability. Zero
//! probability has no finite price and maps to `FairOdds::Unbounded`,
//! serialized as the string `"unbounded"`.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FairOdds {
    Price(f64),
    Unbounded,
}

impl FairOdds {
    #[cfg(test)]
    pub fn price(self) -> Option<f64> {
        match self {
            FairOdds::Price(p) => Some(p),
            FairOdds::Unbounded => None,
        }
    }
}

impl Serialize for FairOdds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FairOdds::Price(p) => serializer.serialize_f64(*p),
            FairOdds::Unbounded => serializer.serialize_str("unbounded"),
        }
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `round(1/p, 2)` for positive `p`, otherwise unbounded.
pub fn fair_odds(p: f64) -> FairOdds {
    if p > 0.0 {
        FairOdds::Price(round_to(1.0 / p, 2))
    } else {
        FairOdds::Unbounded
    }
}

/// Break-even probability of a quarter-ball handicap bet.
///
/// On a -0.25 line a level scoreline refunds half the stake and loses the
/// other half, so the zero-EV price `o` solves
/// `win·(o − 1) = loss + ½·level`, i.e. `o = (win + loss + ½·level) / win`.
/// The returned value is `1/o`, so `fair_odds` of it is that price.
pub fn quarter_line_probability(win: f64, level: f64, loss: f64) -> f64 {
    let stake_weighted = win + loss + 0.5 * level;
    if win <= 0.0 || stake_weighted <= 0.0 {
        return 0.0;
    }
    win / stake_weighted
}

/// Coarse read of how decisive the host-win probability is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignalStrength {
    High,
    Medium,
    Low,
}

impl SignalStrength {
    pub fn from_host_probability(p: f64) -> SignalStrength {
        if p > 0.6 || p < 0.4 {
            SignalStrength::High
        } else if (0.45..=0.55).contains(&p) {
            SignalStrength::Medium
        } else {
            SignalStrength::Low
        }
    }
}
