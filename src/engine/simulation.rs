//! Monte Carlo scoreline simulation.
//!
//! Each trial first picks a match outcome from the shrunk distribution, then
//! draws Poisson goal counts whose rates lean ±10% toward the picked winner.
//! Coupling the two keeps goal totals consistent with the outcome
//! probabilities instead of fitting them independently.

use rand::Rng;

use super::goals::GoalExpectation;
use super::implied::OutcomeDistribution;

/// Fixed number of simulated matches per analysis.
pub const SIMULATION_TRIALS: u32 = 10_000;
/// Rate multiplier applied to the side that wins the trial's scenario.
const SCENARIO_BOOST: f64 = 1.1;
/// Rate multiplier applied to the side that loses it.
const SCENARIO_DAMP: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    HostWin,
    Draw,
    GuestWin,
}

impl Scenario {
    /// Classify a uniform draw `r ∈ [0, 1)` against the cumulative outcome
    /// probabilities.
    pub fn classify(r: f64, dist: &OutcomeDistribution) -> Scenario {
        if r < dist.host_win {
            Scenario::HostWin
        } else if r < dist.host_win + dist.draw {
            Scenario::Draw
        } else {
            Scenario::GuestWin
        }
    }

    /// Poisson rates for this scenario.
    pub fn rates(self, goals: &GoalExpectation) -> (f64, f64) {
        match self {
            Scenario::HostWin => (goals.host * SCENARIO_BOOST, goals.guest * SCENARIO_DAMP),
            Scenario::Draw => (goals.host, goals.guest),
            Scenario::GuestWin => (goals.host * SCENARIO_DAMP, goals.guest * SCENARIO_BOOST),
        }
    }
}

/// Sample a Poisson variate by Knuth's multiplication method. Fine for the
/// small rates (< 3 goals) this model produces.
pub fn sample_poisson<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> u32 {
    if lambda <= 0.0 {
        return 0;
    }
    let limit = (-lambda).exp();
    let mut k = 0u32;
    let mut p = 1.0f64;
    loop {
        p *= rng.gen::<f64>();
        if p <= limit {
            return k;
        }
        k += 1;
    }
}

/// Raw trial counts. Probabilities are `count / trials`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationResult {
    pub trials: u32,
    pub over_1_5: u32,
    pub over_2_5: u32,
    pub over_3_5: u32,
    pub btts: u32,
    /// Trials the host won on goals.
    pub host_ahead: u32,
    /// Trials level on goals.
    pub level: u32,
    /// Trials the guest won on goals.
    pub guest_ahead: u32,
    pub host_by_3_plus: u32,
    pub guest_by_3_plus: u32,
}

impl SimulationResult {
    fn fraction(&self, count: u32) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            count as f64 / self.trials as f64
        }
    }

    pub fn p_over_1_5(&self) -> f64 {
        self.fraction(self.over_1_5)
    }

    pub fn p_over_2_5(&self) -> f64 {
        self.fraction(self.over_2_5)
    }

    pub fn p_over_3_5(&self) -> f64 {
        self.fraction(self.over_3_5)
    }

    pub fn p_btts(&self) -> f64 {
        self.fraction(self.btts)
    }

    pub fn p_host_ahead(&self) -> f64 {
        self.fraction(self.host_ahead)
    }

    pub fn p_level(&self) -> f64 {
        self.fraction(self.level)
    }

    pub fn p_guest_ahead(&self) -> f64 {
        self.fraction(self.guest_ahead)
    }

    pub fn p_host_by_3_plus(&self) -> f64 {
        self.fraction(self.host_by_3_plus)
    }

    pub fn p_guest_by_3_plus(&self) -> f64 {
        self.fraction(self.guest_by_3_plus)
    }

    fn record(&mut self, home: u32, away: u32) {
        self.trials += 1;
        let total = home + away;
        if total >= 2 {
            self.over_1_5 += 1;
        }
        if total >= 3 {
            self.over_2_5 += 1;
        }
        if total >= 4 {
            self.over_3_5 += 1;
        }
        if home > 0 && away > 0 {
            self.btts += 1;
        }
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => self.host_ahead += 1,
            std::cmp::Ordering::Equal => self.level += 1,
            std::cmp::Ordering::Less => self.guest_ahead += 1,
        }
        if home >= away + 3 {
            self.host_by_3_plus += 1;
        }
        if away >= home + 3 {
            self.guest_by_3_plus += 1;
        }
    }
}

/// Run `trials` simulated matches.
pub fn simulate_with_trials<R: Rng + ?Sized>(
    dist: &OutcomeDistribution,
    goals: &GoalExpectation,
    trials: u32,
    rng: &mut R,
) -> SimulationResult {
    let mut result = SimulationResult::default();
    for _ in 0..trials {
        let scenario = Scenario::classify(rng.gen::<f64>(), dist);
        let (lambda_home, lambda_away) = scenario.rates(goals);
        let home = sample_poisson(rng, lambda_home);
        let away = sample_poisson(rng, lambda_away);
        result.record(home, away);
    }
    result
}

/// Run the standard 10,000-trial simulation.
pub fn simulate_goals<R: Rng + ?Sized>(
    dist: &OutcomeDistribution,
    goals: &GoalExpectation,
    rng: &mut R,
) -> SimulationResult {
    simulate_with_trials(dist, goals, SIMULATION_TRIALS, rng)
}
