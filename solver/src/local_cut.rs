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

//! Local cuts: shifting the potentials of a set of events by the same amount modulo the period.
//!
//! Only activities with exactly one end in the set change. An activity whose head is shifted
//! by delta gains delta slack, one whose tail is shifted loses it (both modulo the period).
//! The search is used when no pivot improves; a found cut is turned into new modulo parameters
//! by [`transform`] and the non-periodic subproblem re-optimizes from there.
mod combined;
mod connected_region;
mod random_node;
mod single_node;
mod waiting_edge;

pub use combined::CombinedCut;
pub use connected_region::ConnectedRegionCut;
pub use random_node::RandomNodeCut;
pub use single_node::SingleNodeCut;
pub use waiting_edge::WaitingEdgeCut;

use model::base_types::{ActivityIdx, Cost, EventIdx, Time};
use model::config::{Config, LocalCutStrategy};
use rayon::prelude::*;
use solution::{ModuloAssignment, Tableau};

use crate::pivot::Acceptance;

pub trait LocalCutSearch: Send {
    /// An improving cut, if the strategy finds one.
    fn find_cut(&mut self, tableau: &Tableau) -> Option<Cut>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cut {
    pub nodes: Vec<EventIdx>,
    /// added to the potential of every event in nodes, in 1..period
    pub shift: Time,
    pub delta: Cost,
    pub robustness_delta: Cost,
}

/// (activity, +1 if its head is in the set, -1 if its tail is)
fn crossing_activities(tableau: &Tableau, inside: &[bool]) -> Vec<(ActivityIdx, Time)> {
    let network = tableau.network();
    network
        .activities()
        .filter_map(|a| {
            let activity = network.activity(a);
            match (inside[activity.tail().idx()], inside[activity.head().idx()]) {
                (false, true) => Some((a, 1)),
                (true, false) => Some((a, -1)),
                _ => None,
            }
        })
        .collect()
}

fn membership(tableau: &Tableau, nodes: &[EventIdx]) -> Vec<bool> {
    let mut inside = vec![false; tableau.network().number_of_events()];
    for node in nodes {
        inside[node.idx()] = true;
    }
    inside
}

/// The best improving and robustness-admissible shift of the given events, if any.
pub fn evaluate_cut(tableau: &Tableau, nodes: &[EventIdx], acceptance: &Acceptance) -> Option<Cut> {
    let network = tableau.network();
    let period = network.period();
    let crossing = crossing_activities(tableau, &membership(tableau, nodes));
    if crossing.is_empty() {
        return None;
    }

    (1..period)
        .into_par_iter()
        .filter_map(|shift| {
            let mut delta = 0;
            let mut robustness_delta = 0;
            for &(a, direction) in crossing.iter() {
                let activity = network.activity(a);
                let slack = tableau.slack(a);
                let new_slack = (slack + direction * shift).rem_euclid(period);
                if new_slack > activity.span() {
                    return None;
                }
                delta += activity.weight() * (new_slack - slack);
                robustness_delta += activity.robustness() * (new_slack - slack);
            }
            Some((delta, shift, robustness_delta))
        })
        .filter(|&(delta, _, robustness_delta)| {
            acceptance.is_improvement(tableau.objective(), delta)
                && acceptance.robustness_admissible(tableau.robustness(), robustness_delta)
        })
        .min()
        .map(|(delta, shift, robustness_delta)| Cut {
            nodes: nodes.to_vec(),
            shift,
            delta,
            robustness_delta,
        })
}

/// Modulo parameters of the timetable obtained by applying the cut. Activities not crossing the
/// cut keep theirs.
pub fn transform(tableau: &Tableau, cut: &Cut) -> ModuloAssignment {
    let network = tableau.network();
    let period = network.period();
    let inside = membership(tableau, &cut.nodes);
    let potential = |event: EventIdx| {
        tableau.potential(event) + if inside[event.idx()] { cut.shift } else { 0 }
    };
    let mut modulo_parameters: Vec<_> =
        network.activities().map(|a| tableau.modulo_parameter(a)).collect();
    for (a, direction) in crossing_activities(tableau, &inside) {
        let activity = network.activity(a);
        let slack = (tableau.slack(a) + direction * cut.shift).rem_euclid(period);
        let difference = potential(activity.head()) - potential(activity.tail());
        modulo_parameters[a.idx()] = (difference - activity.lower() - slack) / period;
    }
    ModuloAssignment::new(modulo_parameters)
}

/// Never finds a cut.
pub struct NoCut;

impl LocalCutSearch for NoCut {
    fn find_cut(&mut self, _tableau: &Tableau) -> Option<Cut> {
        None
    }
}

pub fn build_local_cut_search(config: &Config) -> Box<dyn LocalCutSearch> {
    let acceptance = Acceptance::new(0.0, config.minimum_robustness);
    match config.local_cut.strategy {
        LocalCutStrategy::SingleNode => Box::new(SingleNodeCut::new(acceptance)),
        LocalCutStrategy::RandomNode => Box::new(RandomNodeCut::new(
            acceptance,
            config.local_cut.random_node_sample,
            config.seed,
        )),
        LocalCutStrategy::WaitingEdge => Box::new(WaitingEdgeCut::new(acceptance)),
        LocalCutStrategy::ConnectedRegion => Box::new(ConnectedRegionCut::new(
            acceptance,
            config.local_cut.region_seeds,
            config.seed,
        )),
        LocalCutStrategy::Combined => Box::new(CombinedCut::new(
            SingleNodeCut::new(acceptance),
            WaitingEdgeCut::new(acceptance),
            ConnectedRegionCut::new(acceptance, config.local_cut.region_seeds, config.seed),
        )),
        LocalCutStrategy::None => Box::new(NoCut),
    }
}
