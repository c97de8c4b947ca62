//! Proportional de-vig of three-way bookmaker odds.

use crate::records::MatchRecord;

/// Host-win / draw / guest-win probabilities summing to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeDistribution {
    pub host_win: f64,
    pub draw: f64,
    pub guest_win: f64,
}

impl OutcomeDistribution {
    pub const UNIFORM: OutcomeDistribution = OutcomeDistribution {
        host_win: 1.0 / 3.0,
        draw: 1.0 / 3.0,
        guest_win: 1.0 / 3.0,
    };

    pub fn sum(&self) -> f64 {
        self.host_win + self.draw + self.guest_win
    }

    /// Divide every component by the total so the triple sums to 1.
    pub fn renormalized(&self) -> OutcomeDistribution {
        let total = self.sum();
        assert!(
            total > 0.0 && total.is_finite(),
            "cannot renormalize outcome triple with total {}",
            total
        );
        OutcomeDistribution {
            host_win: self.host_win / total,
            draw: self.draw / total,
            guest_win: self.guest_win / total,
        }
    }

    #[cfg(test)]
    /// Largest per-outcome distance to another distribution.
    pub fn max_abs_diff(&self, other: &OutcomeDistribution) -> f64 {
        (self.host_win - other.host_win)
            .abs()
            .max((self.draw - other.draw).abs())
            .max((self.guest_win - other.guest_win).abs())
    }
}

/// Bookmaker overround: sum of inverse odds minus one.
pub fn overround(m: &MatchRecord) -> f64 {
    1.0 / m.host_win_odds + 1.0 / m.draw_odds + 1.0 / m.guest_win_odds - 1.0
}

/// Implied probabilities with the margin removed uniformly across outcomes.
///
/// Only validated records reach this point, so every price is positive.
pub fn implied_probabilities(m: &MatchRecord) -> OutcomeDistribution {
    let inv_win = 1.0 / m.host_win_odds;
    let inv_draw = 1.0 / m.draw_odds;
    let inv_loss = 1.0 / m.guest_win_odds;
    let total_inv = inv_win + inv_draw + inv_loss;
    debug_assert!(total_inv > 0.0);
    OutcomeDistribution {
        host_win: inv_win / total_inv,
        draw: inv_draw / total_inv,
        guest_win: inv_loss / total_inv,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn record(w: f64, d: f64, l: f64) -> MatchRecord {
        MatchRecord {
            date: NaiveDate::from_ymd_opt(2022, 5, 1).unwrap(),
            host_win_odds: w,
            draw_odds: d,
            guest_win_odds: l,
        }
    }

    #[test]
    fn test_devig_sums_to_one() {
        for (w, d, l) in [(2.0, 3.0, 4.0), (1.2, 6.5, 13.0), (3.1, 3.1, 2.4), (1.01, 30.0, 50.0)] {
            let p = implied_probabilities(&record(w, d, l));
            assert_relative_eq!(p.sum(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_devig_known_values() {
        // 1/2 + 1/3 + 1/4 = 13/12
        let p = implied_probabilities(&record(2.0, 3.0, 4.0));
        assert_relative_eq!(p.host_win, 6.0 / 13.0, epsilon = 1e-12);
        assert_relative_eq!(p.draw, 4.0 / 13.0, epsilon = 1e-12);
        assert_relative_eq!(p.guest_win, 3.0 / 13.0, epsilon = 1e-12);
        assert_relative_eq!(overround(&record(2.0, 3.0, 4.0)), 1.0 / 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_fair_book_unchanged() {
        let p = implied_probabilities(&record(2.0, 4.0, 4.0));
        assert_relative_eq!(p.host_win, 0.5, epsilon = 1e-12);
        assert_relative_eq!(p.draw, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_renormalize() {
        let d = OutcomeDistribution {
            host_win: 0.2,
            draw: 0.2,
            guest_win: 0.6,
        };
        let r = OutcomeDistribution {
            host_win: 0.4,
            draw: 0.4,
            guest_win: 1.2,
        }
        .renormalized();
        assert_relative_eq!(r.max_abs_diff(&d), 0.0, epsilon = 1e-12);
    }
}
