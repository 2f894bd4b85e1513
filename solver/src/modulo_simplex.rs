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

//! The solve loop: INIT, then pivots until the pivot rule gives up, then one local cut search.
//! A found cut is resolved through the non-periodic subproblem and pivoting resumes; without a
//! cut the run is done.

use std::sync::Arc;
use std::time::{Duration, Instant};

use model::config::Config;
use model::network::Network;
use model::timetable::Timetable;
use serde::Serialize;
use solution::json_serialisation::{objective_value_to_json, timetable_to_json};
use solution::{ObjectiveValue, Tableau};
use tracing::{debug, info, warn};

use crate::abort::AbortSignal;
use crate::checkpoint::CheckpointStore;
use crate::error::SolveError;
use crate::initial_timetable::greedy_timetable;
use crate::local_cut::{build_local_cut_search, transform};
use crate::non_periodic::{tableau_from_assignment, tableau_from_timetable};
use crate::pivot::{build_pivot_rule, PivotRule};

/// How the first feasible spanning tree is obtained.
#[derive(Clone, Debug, Default)]
pub enum InitialSolution {
    /// greedy timetable, repaired by the non-periodic subproblem
    #[default]
    Bootstrap,
    /// a given timetable, reduced to tree form by the non-periodic subproblem
    Timetable(Timetable),
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Termination {
    LocalOptimum,
    IterationLimit,
    TimeLimit,
    Aborted,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SolveStatistics {
    pub pivots: u64,
    pub cuts: u64,
    pub termination: Termination,
    #[serde(skip)]
    pub elapsed: Duration,
}

pub struct SolveOutcome {
    pub timetable: Timetable,
    pub objective_value: ObjectiveValue,
    pub statistics: SolveStatistics,
    network: Arc<Network>,
}

impl SolveOutcome {
    pub fn network(&self) -> &Arc<Network> {
        &self.network
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "objectiveValue": objective_value_to_json(&self.objective_value),
            "statistics": serde_json::json!(self.statistics),
            "timetable": timetable_to_json(&self.network, &self.timetable),
        })
    }
}

pub struct ModuloNetworkSimplex {
    network: Arc<Network>,
    config: Arc<Config>,
    initial_solution: InitialSolution,
    abort_signal: AbortSignal,
}

impl ModuloNetworkSimplex {
    pub fn new(network: Arc<Network>, config: Arc<Config>) -> ModuloNetworkSimplex {
        ModuloNetworkSimplex {
            network,
            config,
            initial_solution: InitialSolution::default(),
            abort_signal: AbortSignal::default(),
        }
    }

    pub fn with_initial_solution(mut self, initial_solution: InitialSolution) -> Self {
        self.initial_solution = initial_solution;
        self
    }

    pub fn with_abort_signal(mut self, abort_signal: AbortSignal) -> Self {
        self.abort_signal = abort_signal;
        self
    }

    pub fn solve(&self) -> Result<SolveOutcome, SolveError> {
        self.solve_with(build_pivot_rule(&self.config))
    }

    pub(crate) fn solve_with(
        &self,
        mut pivot_rule: Box<dyn PivotRule>,
    ) -> Result<SolveOutcome, SolveError> {
        let start_time = Instant::now();
        if self.abort_signal.is_aborted() {
            return Err(SolveError::NoFeasibleSolution);
        }

        // INIT
        let mut tableau = self.initial_tableau()?;
        info!(
            "initial solution: weighted slack {}, robustness {}",
            tableau.objective(),
            tableau.robustness()
        );
        let mut checkpoints = CheckpointStore::new(&self.config);
        checkpoints.record(&tableau);

        let mut cut_search = build_local_cut_search(&self.config);
        let mut pivots: u64 = 0;
        let mut cuts: u64 = 0;

        let termination = loop {
            if let Some(termination) = self.budget_exhausted(start_time, pivots) {
                break termination;
            }

            // PIVOTING
            if pivot_rule.find_and_apply_pivot(&mut tableau)? {
                pivots += 1;
                checkpoints.record(&tableau);
                checkpoints.write_if_due(&self.network, pivots);
                continue;
            }
            debug!(
                "no pivot after {} pivots, objective {}; searching a cut",
                pivots,
                tableau.objective()
            );

            // CUT_SEARCH
            let Some(cut) = cut_search.find_cut(&tableau) else {
                break Termination::LocalOptimum;
            };
            info!(
                "cut found: {} events shifted by {}, predicted change {}",
                cut.nodes.len(),
                cut.shift,
                cut.delta
            );

            // RESOLVE
            let predicted = tableau.objective() + cut.delta;
            tableau = tableau_from_assignment(&self.network, &transform(&tableau, &cut))
                .map_err(|err| match err {
                    SolveError::ContradictingModuloParameters(cycle) => SolveError::Consistency(
                        format!("a cut left contradicting modulo parameters along {}", cycle),
                    ),
                    err => err,
                })?;
            if tableau.objective() > predicted {
                return Err(SolveError::Consistency(format!(
                    "resolving a cut gave objective {} but at most {} was predicted",
                    tableau.objective(),
                    predicted
                )));
            }
            cuts += 1;
            info!("cut applied: weighted slack {}", tableau.objective());
            checkpoints.record(&tableau);
        };

        let statistics = SolveStatistics {
            pivots,
            cuts,
            termination,
            elapsed: start_time.elapsed(),
        };

        // DONE: the last tableau, unless a non-monotone rule left a better one behind, or the
        // best checkpoint if the run was cut short
        let emit_current =
            termination == Termination::LocalOptimum && !checkpoints.beats(&tableau);
        let (timetable, objective_value) = if emit_current {
            (tableau.timetable(), ObjectiveValue::of(&tableau))
        } else {
            checkpoints.record(&tableau);
            let best = checkpoints
                .into_best()
                .ok_or(SolveError::NoFeasibleSolution)?;
            (best.timetable, best.objective_value)
        };

        info!(
            "solve finished ({:?}) after {} pivots and {} cuts in {:0.2}sec: weighted slack {}",
            statistics.termination,
            statistics.pivots,
            statistics.cuts,
            statistics.elapsed.as_secs_f32(),
            objective_value.weighted_slack
        );
        Ok(SolveOutcome {
            timetable,
            objective_value,
            statistics,
            network: self.network.clone(),
        })
    }

    fn initial_tableau(&self) -> Result<Tableau, SolveError> {
        let timetable = match &self.initial_solution {
            InitialSolution::Timetable(timetable) => {
                if timetable.len() != self.network.number_of_events() {
                    return Err(SolveError::Consistency(format!(
                        "start timetable has {} times for {} events",
                        timetable.len(),
                        self.network.number_of_events()
                    )));
                }
                timetable.clone()
            }
            InitialSolution::Bootstrap => greedy_timetable(&self.network),
        };
        let violated = timetable.violated_activities(&self.network).count();
        if violated > 0 {
            warn!(
                "start timetable violates {} activities; repairing it through the non-periodic subproblem",
                violated
            );
        }
        tableau_from_timetable(&self.network, &timetable)
    }

    fn budget_exhausted(&self, start_time: Instant, pivots: u64) -> Option<Termination> {
        if self.abort_signal.is_aborted() {
            return Some(Termination::Aborted);
        }
        if self.config.limits.iterations.map_or(false, |limit| pivots >= limit) {
            return Some(Termination::IterationLimit);
        }
        if self
            .config
            .limits
            .time
            .map_or(false, |limit| start_time.elapsed() >= limit)
        {
            return Some(Termination::TimeLimit);
        }
        None
    }
}
