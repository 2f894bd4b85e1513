// © 2023-2024 ETH Zurich
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// any later version.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Basis changes of the modulo network simplex.
//!
//! A candidate is a non-tree activity entering the tree, a tree activity on its fundamental
//! cycle leaving it, and the bound the entering activity is fixed at. Removing the leaving
//! activity splits the tree in two; the entering activity reaches its bound by shifting one side
//! against the other, which changes the slack of the leaving activity and of every non-tree
//! activity in the row of the leaving activity. Nothing else changes.
mod column_ordered;
mod hybrid;
mod simulated_annealing;
mod steepest_descent;
mod tabu_search;
#[cfg(test)]
mod tests;

pub use column_ordered::{ColumnMode, ColumnOrdered};
pub use hybrid::Hybrid;
pub use simulated_annealing::SimulatedAnnealing;
pub use steepest_descent::SteepestDescent;
pub use tabu_search::TabuSearch;

use model::base_types::{ActivityIdx, Cost, Time};
use model::config::{Config, PivotStrategy};
use solution::tableau::{Coefficient, Tableau};
use tracing::debug;

use crate::error::SolveError;

pub trait PivotRule: Send {
    /// Searches a pivot according to the rule and applies it. Returns false if the rule found
    /// nothing it accepts, in which case the tableau is left as a feasible local optimum.
    fn find_and_apply_pivot(&mut self, tableau: &mut Tableau) -> Result<bool, SolveError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PivotMove {
    pub entering: ActivityIdx,
    pub leaving: ActivityIdx,
    /// bound of the entering activity after the swap
    pub at_lower: bool,
    pub delta: Cost,
    pub robustness_delta: Cost,
}

impl PivotMove {
    /// total order used for deterministic tie-breaking
    pub fn key(&self) -> (Cost, ActivityIdx, ActivityIdx, bool) {
        (self.delta, self.entering, self.leaving, !self.at_lower)
    }
}

/// (entering, leaving, coefficient of leaving on the cycle of entering, at_lower)
pub type PivotCandidate = (ActivityIdx, ActivityIdx, Coefficient, bool);

/// All candidates of the tableau. The upper bound is only a candidate for activities with
/// positive span.
pub fn pivot_candidates(tableau: &Tableau) -> Vec<PivotCandidate> {
    let network = tableau.network();
    let mut candidates = Vec::new();
    for entering in tableau.non_tree_edges() {
        let bounds: &[bool] = if network.activity(entering).span() > 0 {
            &[true, false]
        } else {
            &[true]
        };
        for &(leaving, coefficient) in tableau.cycle(entering) {
            for &at_lower in bounds {
                candidates.push((entering, leaving, coefficient, at_lower));
            }
        }
    }
    candidates
}

/// Predicts the effect of a pivot. None if some activity would leave its bounds.
pub fn evaluate_pivot(
    tableau: &Tableau,
    entering: ActivityIdx,
    leaving: ActivityIdx,
    coefficient: Coefficient,
    at_lower: bool,
) -> Option<PivotMove> {
    let network = tableau.network();
    let period = network.period();
    let sigma = coefficient as Time;

    let entering_activity = network.activity(entering);
    let target = if at_lower {
        0
    } else {
        entering_activity.span()
    };
    let change = target - tableau.slack(entering);
    let mut delta = entering_activity.weight() * change;
    let mut robustness_delta = entering_activity.robustness() * change;

    let leaving_activity = network.activity(leaving);
    let old_slack = tableau.slack(leaving);
    let new_slack = (old_slack - sigma * change).rem_euclid(period);
    if new_slack > leaving_activity.span() {
        return None;
    }
    delta += leaving_activity.weight() * (new_slack - old_slack);
    robustness_delta += leaving_activity.robustness() * (new_slack - old_slack);

    for &(other, gamma) in tableau.row(leaving) {
        if other == entering {
            continue;
        }
        let activity = network.activity(other);
        let old_slack = tableau.slack(other);
        let new_slack = (old_slack + gamma as Time * sigma * change).rem_euclid(period);
        if new_slack > activity.span() {
            return None;
        }
        delta += activity.weight() * (new_slack - old_slack);
        robustness_delta += activity.robustness() * (new_slack - old_slack);
    }

    Some(PivotMove {
        entering,
        leaving,
        at_lower,
        delta,
        robustness_delta,
    })
}

/// Applies the pivot and checks that the rebuilt tableau has the predicted objective.
pub fn apply_move(tableau: &mut Tableau, pivot: &PivotMove) -> Result<(), SolveError> {
    let expected = tableau.objective() + pivot.delta;
    tableau.apply_pivot(pivot.entering, pivot.leaving, pivot.at_lower)?;
    if tableau.objective() != expected {
        return Err(SolveError::Consistency(format!(
            "pivot {} -> {} predicted objective {} but the rebuilt tableau has {}",
            tableau.network().activity(pivot.entering).id(),
            tableau.network().activity(pivot.leaving).id(),
            expected,
            tableau.objective()
        )));
    }
    debug!(
        "pivot: {} enters at {}, {} leaves; objective {} ({:+})",
        tableau.network().activity(pivot.entering).id(),
        if pivot.at_lower { "lower" } else { "upper" },
        tableau.network().activity(pivot.leaving).id(),
        tableau.objective(),
        pivot.delta
    );
    Ok(())
}

/// When a change counts as an improvement.
#[derive(Clone, Copy, Debug)]
pub struct Acceptance {
    minimum_improvement: f64,
    minimum_robustness: Option<Cost>,
}

impl Acceptance {
    pub fn new(minimum_improvement: f64, minimum_robustness: Option<Cost>) -> Acceptance {
        Acceptance {
            minimum_improvement,
            minimum_robustness,
        }
    }

    pub fn from_config(config: &Config) -> Acceptance {
        Acceptance::new(config.pivot.minimum_improvement, config.minimum_robustness)
    }

    /// A change may not take the robustness below the threshold, unless it does not decrease it.
    pub fn robustness_admissible(&self, robustness: Cost, robustness_delta: Cost) -> bool {
        match self.minimum_robustness {
            None => true,
            Some(minimum) => robustness + robustness_delta >= minimum || robustness_delta >= 0,
        }
    }

    /// strictly negative and at least the configured fraction of the objective
    pub fn is_improvement(&self, objective: Cost, delta: Cost) -> bool {
        delta < 0 && (-delta) as f64 >= self.minimum_improvement * objective as f64
    }

    pub fn is_improving(&self, tableau: &Tableau, pivot: &PivotMove) -> bool {
        self.is_improvement(tableau.objective(), pivot.delta)
            && self.robustness_admissible(tableau.robustness(), pivot.robustness_delta)
    }
}

pub fn build_pivot_rule(config: &Config) -> Box<dyn PivotRule> {
    let acceptance = Acceptance::from_config(config);
    match config.pivot.strategy {
        PivotStrategy::Steepest => Box::new(SteepestDescent::new(acceptance)),
        PivotStrategy::Fastest => Box::new(ColumnOrdered::new(acceptance, ColumnMode::Fastest)),
        PivotStrategy::Percentage => Box::new(ColumnOrdered::new(
            acceptance,
            ColumnMode::Percentage(config.pivot.percentage),
        )),
        PivotStrategy::SimulatedAnnealing => Box::new(SimulatedAnnealing::new(
            acceptance,
            &config.pivot.annealing,
            config.seed,
        )),
        PivotStrategy::TabuSearch => Box::new(TabuSearch::new(
            acceptance,
            config.pivot.tabu_length,
            config.pivot.tabu_max_non_improving,
        )),
        PivotStrategy::Hybrid => Box::new(Hybrid::new(
            SteepestDescent::new(acceptance),
            SimulatedAnnealing::new(acceptance, &config.pivot.annealing, config.seed),
        )),
    }
}
