//! Expected goals per side from the shrunk outcome distribution.
//!
//! Base rates encode a mild home advantage independent of the data; the
//! additive terms grow with how strongly the distribution favours a side
//! or a draw. Uncalibrated against real scorelines.

use serde::Serialize;

use super::implied::OutcomeDistribution;

const HOST_BASE_GOALS: f64 = 1.2;
const GUEST_BASE_GOALS: f64 = 1.0;
const WIN_GOAL_WEIGHT: f64 = 1.0;
const DRAW_GOAL_WEIGHT: f64 = 0.3;
/// Keeps the Poisson rate away from zero.
const MIN_EXPECTED_GOALS: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalExpectation {
    pub host: f64,
    pub guest: f64,
}

pub fn expected_goals(dist: &OutcomeDistribution) -> GoalExpectation {
    let host = HOST_BASE_GOALS + dist.host_win * WIN_GOAL_WEIGHT + dist.draw * DRAW_GOAL_WEIGHT;
    let guest = GUEST_BASE_GOALS + dist.guest_win * WIN_GOAL_WEIGHT + dist.draw * DRAW_GOAL_WEIGHT;
    GoalExpectation {
        host: host.max(MIN_EXPECTED_GOALS),
        guest: guest.max(MIN_EXPECTED_GOALS),
    }
}
