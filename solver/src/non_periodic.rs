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

//! The non-periodic subproblem: with all modulo parameters fixed, find potentials minimizing
//! the weighted slack subject to `lower + z * T <= pi_j - pi_i <= upper + z * T`.
//!
//! Its dual is a min-cost flow problem, solved by the network simplex of `rs_graph`. Every
//! activity (i, j) contributes an arc i -> j with cost -(lower + z * T) and an arc j -> i with
//! cost (upper + z * T). A node with weighted in-degree minus weighted out-degree d must absorb a
//! net inflow of d; this is modelled as a circulation through an additional node.
//! Optimal potentials are recovered as shortest-path distances in the residual network, and the
//! tight activities of the optimum are decoded into a spanning tree.
#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use model::base_types::{ActivityIdx, Cost, EventIdx, Time};
use model::network::Network;
use model::timetable::Timetable;
use itertools::Itertools;
use model::utilities::UnionFind;
use rs_graph::linkedlistgraph::Edge as RsEdge;
use rs_graph::mcf::network_simplex;
use rs_graph::traits::FiniteGraph;
use rs_graph::Buildable;
use rs_graph::Builder;
use rs_graph::IndexGraph;
use rs_graph::LinkedListGraph;
use solution::{Basis, ModuloAssignment, Tableau};
use tracing::{debug, trace, warn};

use crate::error::SolveError;

type NetworkNumberType = i64;

struct EdgeLabel {
    lower_bound: NetworkNumberType,
    upper_bound: NetworkNumberType,
    cost: NetworkNumberType,
}

pub struct NonPeriodicProblem<'a> {
    network: &'a Network,
    bounds: Vec<(Time, Time)>, // per activity, bounds on pi_head - pi_tail
}

impl<'a> NonPeriodicProblem<'a> {
    pub fn new(network: &'a Network, assignment: &ModuloAssignment) -> NonPeriodicProblem<'a> {
        NonPeriodicProblem {
            network,
            bounds: network
                .activities()
                .map(|a| assignment.shifted_bounds(network, a))
                .collect(),
        }
    }

    pub fn bounds(&self, activity: ActivityIdx) -> (Time, Time) {
        self.bounds[activity.idx()]
    }
}

pub struct NonPeriodicSolution {
    potentials: Vec<Time>,
    bounds: Vec<(Time, Time)>,
    // per activity the flow on the arc tail -> head and on the arc head -> tail
    flows: Vec<(NetworkNumberType, NetworkNumberType)>,
}

impl NonPeriodicSolution {
    /// unrolled potential, not reduced modulo the period
    pub fn potential(&self, event: EventIdx) -> Time {
        self.potentials[event.idx()]
    }

    /// sum of weight * (pi_j - pi_i - shifted lower bound)
    pub fn objective(&self, network: &Network) -> Cost {
        network
            .activities()
            .map(|a| {
                let activity = network.activity(a);
                activity.weight()
                    * (self.potential(activity.head()) - self.potential(activity.tail())
                        - self.bounds[a.idx()].0)
            })
            .sum()
    }

    /// Decodes a spanning tree of tight activities: activities carrying flow first, then the
    /// other tight ones. Remaining components are joined by shifting one of them until a
    /// boundary activity becomes tight; the shift does not change the objective since the
    /// potentials are optimal.
    pub fn into_basis(mut self, network: &Network) -> Result<Basis, SolveError> {
        let events = network.number_of_events();
        let mut components = UnionFind::new(events);
        let mut tree: Vec<(ActivityIdx, bool)> = Vec::with_capacity(events.saturating_sub(1));

        for a in network.activities() {
            let activity = network.activity(a);
            let (forward, backward) = self.flows[a.idx()];
            if (forward > 0 || backward > 0)
                && components.union(activity.tail().idx(), activity.head().idx())
            {
                tree.push((a, forward > 0));
            }
        }
        for a in network.activities() {
            let activity = network.activity(a);
            let (lower, upper) = self.bounds[a.idx()];
            let difference = self.potential(activity.head()) - self.potential(activity.tail());
            if (difference == lower || difference == upper)
                && components.union(activity.tail().idx(), activity.head().idx())
            {
                tree.push((a, difference == lower));
            }
        }

        while components.number_of_sets() > 1 {
            let root = components.find(0);
            let inside: Vec<bool> = (0..events).map(|v| components.find(v) == root).collect();
            // (room, activity, at_lower)
            let mut closest: Option<(Time, ActivityIdx, bool)> = None;
            for a in network.activities() {
                let activity = network.activity(a);
                let (tail_inside, head_inside) =
                    (inside[activity.tail().idx()], inside[activity.head().idx()]);
                if tail_inside == head_inside {
                    continue;
                }
                let (lower, upper) = self.bounds[a.idx()];
                let difference = self.potential(activity.head()) - self.potential(activity.tail());
                // lowering the component raises the difference of outgoing activities
                let candidate = if tail_inside {
                    (upper - difference, a, false)
                } else {
                    (difference - lower, a, true)
                };
                if closest.map_or(true, |c| candidate < c) {
                    closest = Some(candidate);
                }
            }
            let Some((room, a, at_lower)) = closest else {
                return Err(SolveError::Consistency(
                    "non-periodic solution spans a disconnected network".to_string(),
                ));
            };
            for v in (0..events).filter(|&v| inside[v]) {
                self.potentials[v] -= room;
            }
            let activity = network.activity(a);
            components.union(activity.tail().idx(), activity.head().idx());
            tree.push((a, at_lower));
        }

        if tree.len() + 1 != events.max(1) {
            return Err(SolveError::Consistency(format!(
                "decoded {} tree activities for {} events",
                tree.len(),
                events
            )));
        }
        Ok(Basis::from_tree_edges(network, tree)?)
    }
}

/// A cycle of activities whose shifted bounds cannot hold at the same time. Every activity is
/// stored with the direction the cycle passes it in, `true` from tail to head.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContradictingCycle {
    activities: Vec<(ActivityIdx, bool)>,
    ids: Vec<String>,
}

impl ContradictingCycle {
    fn new(network: &Network, activities: Vec<(ActivityIdx, bool)>) -> ContradictingCycle {
        let ids = activities
            .iter()
            .map(|&(a, _)| network.activity(a).id().to_string())
            .collect();
        ContradictingCycle { activities, ids }
    }

    pub fn activities(&self) -> &[(ActivityIdx, bool)] {
        &self.activities
    }

    /// Range of the potential differences summed along the cycle. The bounds can only hold if
    /// it contains 0.
    fn tension_range(&self, bounds: impl Fn(ActivityIdx) -> (Time, Time)) -> (Time, Time) {
        self.activities
            .iter()
            .fold((0, 0), |(low, high), &(a, forward)| {
                let (lower, upper) = bounds(a);
                if forward {
                    (low + lower, high + upper)
                } else {
                    (low - upper, high - lower)
                }
            })
    }

    /// True if no modulo parameters satisfy the cycle: the range of its unshifted bounds
    /// contains no multiple of the period.
    pub fn is_periodically_infeasible(&self, network: &Network) -> bool {
        let period = network.period();
        let (low, high) = self.tension_range(|a| {
            let activity = network.activity(a);
            (activity.lower(), activity.upper())
        });
        high.div_euclid(period) * period < low
    }

    /// Assignments moving the range of the cycle one period towards 0 by changing the modulo
    /// parameter of a single activity. Activities the timetable violates come first, then
    /// lighter ones.
    pub fn repairs(
        &self,
        network: &Network,
        assignment: &ModuloAssignment,
        timetable: &Timetable,
    ) -> Vec<ModuloAssignment> {
        let (low, high) = self.tension_range(|a| assignment.shifted_bounds(network, a));
        let step = match (low > 0, high < 0) {
            (true, _) => -1,
            (_, true) => 1,
            _ => return Vec::new(),
        };
        let violated: HashSet<ActivityIdx> = timetable.violated_activities(network).collect();
        self.activities
            .iter()
            .sorted_by_key(|&&(a, _)| (!violated.contains(&a), network.activity(a).weight(), a))
            .map(|&(a, forward)| {
                let change = if forward { step } else { -step };
                assignment.with_modulo_parameter(a, assignment.modulo_parameter(a) + change)
            })
            .collect()
    }

    fn into_error(self, network: &Network) -> SolveError {
        if self.is_periodically_infeasible(network) {
            SolveError::InfeasibleInstance(format!(
                "the bounds of the activities {} contradict each other",
                self
            ))
        } else {
            SolveError::ContradictingModuloParameters(self)
        }
    }
}

impl fmt::Display for ContradictingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ids.join(", "))
    }
}

pub fn solve_non_periodic(problem: &NonPeriodicProblem) -> Result<NonPeriodicSolution, SolveError> {
    let network = problem.network;
    let events = network.number_of_events();

    if let Some(cycle) = find_contradicting_cycle(network, &problem.bounds) {
        return Err(cycle.into_error(network));
    }

    // no optimal flow needs more than the total weight on a single arc
    let capacity = network.total_weight() + 1;

    let mut builder = LinkedListGraph::<u32>::new_builder();
    let nodes: Vec<_> = (0..events).map(|_| builder.add_node()).collect();
    let balancing_node = builder.add_node();
    let mut edges: HashMap<RsEdge, EdgeLabel> = HashMap::new();
    let mut activity_arcs: Vec<Option<(RsEdge, RsEdge)>> = Vec::new();

    for a in network.activities() {
        let activity = network.activity(a);
        if activity.is_loop() {
            activity_arcs.push(None);
            continue;
        }
        let (lower, upper) = problem.bounds(a);
        let (tail, head) = (nodes[activity.tail().idx()], nodes[activity.head().idx()]);
        let forward = builder.add_edge(tail, head);
        edges.insert(
            forward,
            EdgeLabel {
                lower_bound: 0,
                upper_bound: capacity,
                cost: -lower,
            },
        );
        let backward = builder.add_edge(head, tail);
        edges.insert(
            backward,
            EdgeLabel {
                lower_bound: 0,
                upper_bound: capacity,
                cost: upper,
            },
        );
        activity_arcs.push(Some((forward, backward)));
    }

    for event in network.events() {
        let demand = network.demand_of(event);
        let edge = match demand.signum() {
            1 => builder.add_edge(nodes[event.idx()], balancing_node),
            -1 => builder.add_edge(balancing_node, nodes[event.idx()]),
            _ => continue,
        };
        edges.insert(
            edge,
            EdgeLabel {
                lower_bound: demand.abs(),
                upper_bound: demand.abs(),
                cost: 0,
            },
        );
    }
    let graph = builder.into_graph();

    let (_, flow) = network_simplex(
        &graph,
        |_| 0, // balance is 0 everywhere -> circulation
        |e| edges[&e].lower_bound,
        |e| edges[&e].upper_bound,
        |e| edges[&e].cost,
    )
    .ok_or_else(|| {
        SolveError::InfeasibleInstance("the non-periodic flow problem has no solution".to_string())
    })?;

    let flows: Vec<(NetworkNumberType, NetworkNumberType)> = activity_arcs
        .iter()
        .map(|arcs| match arcs {
            Some((forward, backward)) => (
                flow[graph.edge_id(*forward)].1,
                flow[graph.edge_id(*backward)].1,
            ),
            None => (0, 0),
        })
        .collect();
    trace!(
        "non-periodic flow of {} arcs with total {}",
        graph.num_edges(),
        flows.iter().map(|(f, b)| f + b).sum::<NetworkNumberType>()
    );

    let potentials = shortest_path_potentials(network, &problem.bounds, &flows)?;
    let solution = NonPeriodicSolution {
        potentials,
        bounds: problem.bounds.clone(),
        flows,
    };
    debug!(
        "non-periodic subproblem solved with weighted slack {}",
        solution.objective(network)
    );
    Ok(solution)
}

/// Distances from a virtual source in the residual network (arcs of both directions are always
/// available, their reverses wherever flow runs), negated. The bounds are known to be
/// consistent, so a negative cycle means the flow is not optimal.
fn shortest_path_potentials(
    network: &Network,
    bounds: &[(Time, Time)],
    flows: &[(NetworkNumberType, NetworkNumberType)],
) -> Result<Vec<Time>, SolveError> {
    let events = network.number_of_events();
    let mut residual: Vec<Vec<(usize, Time)>> = vec![Vec::new(); events];
    for a in network.activities() {
        let activity = network.activity(a);
        if activity.is_loop() {
            continue;
        }
        let (tail, head) = (activity.tail().idx(), activity.head().idx());
        let (lower, upper) = bounds[a.idx()];
        let (forward, backward) = flows[a.idx()];
        residual[tail].push((head, -lower));
        residual[head].push((tail, upper));
        if forward > 0 {
            residual[head].push((tail, lower));
        }
        if backward > 0 {
            residual[tail].push((head, -upper));
        }
    }

    let mut distance: Vec<Time> = vec![0; events];
    let mut arcs_on_path = vec![0; events];
    let mut queued = vec![true; events];
    let mut queue: std::collections::VecDeque<usize> = (0..events).collect();

    while let Some(u) = queue.pop_front() {
        queued[u] = false;
        for &(v, cost) in residual[u].iter() {
            if distance[u] + cost < distance[v] {
                distance[v] = distance[u] + cost;
                arcs_on_path[v] = arcs_on_path[u] + 1;
                if arcs_on_path[v] >= events {
                    return Err(SolveError::Consistency(format!(
                        "residual network of the non-periodic flow has a negative cycle through {}",
                        network.event(EventIdx(v as u32)).id()
                    )));
                }
                if !queued[v] {
                    queued[v] = true;
                    queue.push_back(v);
                }
            }
        }
    }
    Ok(distance.into_iter().map(|d| -d).collect())
}

/// Bellman-Ford on the constraint graph: `pi_head - pi_tail >= lower` is an arc tail -> head of
/// cost -lower, `pi_head - pi_tail <= upper` an arc head -> tail of cost upper. Loops are checked
/// directly.
fn find_contradicting_cycle(
    network: &Network,
    bounds: &[(Time, Time)],
) -> Option<ContradictingCycle> {
    for a in network.activities() {
        let (lower, upper) = bounds[a.idx()];
        if network.activity(a).is_loop() && !(lower <= 0 && 0 <= upper) {
            return Some(ContradictingCycle::new(network, vec![(a, true)]));
        }
    }

    let events = network.number_of_events();
    // (from, to, cost, activity, traversed from tail to head)
    let arcs: Vec<(usize, usize, Time, ActivityIdx, bool)> = network
        .activities()
        .filter(|&a| !network.activity(a).is_loop())
        .flat_map(|a| {
            let activity = network.activity(a);
            let (tail, head) = (activity.tail().idx(), activity.head().idx());
            let (lower, upper) = bounds[a.idx()];
            [(tail, head, -lower, a, true), (head, tail, upper, a, false)]
        })
        .collect();

    let mut distance: Vec<Time> = vec![0; events];
    let mut predecessor: Vec<Option<(usize, ActivityIdx, bool)>> = vec![None; events];
    let mut last_relaxed = None;
    for _ in 0..events {
        last_relaxed = None;
        for &(from, to, cost, a, forward) in arcs.iter() {
            if distance[from] + cost < distance[to] {
                distance[to] = distance[from] + cost;
                predecessor[to] = Some((from, a, forward));
                last_relaxed = Some(to);
            }
        }
        last_relaxed?;
    }

    // still relaxing after |events| rounds; walking back |events| steps ends on the cycle
    let mut v = last_relaxed?;
    for _ in 0..events {
        v = predecessor[v]?.0;
    }
    let first = v;
    let mut activities = Vec::new();
    loop {
        let (u, a, forward) = predecessor[v]?;
        activities.push((a, forward));
        v = u;
        if v == first || activities.len() > events {
            break;
        }
    }
    activities.reverse();
    Some(ContradictingCycle::new(network, activities))
}

/// Reduces a timetable to tree form: modulo parameters are read off the timetable (nearest ones
/// for violated activities), then the non-periodic subproblem is solved and decoded.
///
/// The parameters guessed for violated activities may contradict each other on a feasible
/// instance. Then one activity on the contradicting cycle is moved by a period and the
/// subproblem is solved again, at most twice per activity, before giving up with
/// `NoFeasibleSolution`. Only contradictions no modulo parameters can resolve are reported as
/// `InfeasibleInstance`.
pub fn tableau_from_timetable(
    network: &Arc<Network>,
    timetable: &Timetable,
) -> Result<Tableau, SolveError> {
    let mut assignment = ModuloAssignment::from_timetable(network, timetable);
    let mut tried: HashSet<ModuloAssignment> = HashSet::new();
    let max_attempts = 2 * network.number_of_activities() + 1;

    while tried.len() < max_attempts {
        let cycle = match tableau_from_assignment(network, &assignment) {
            Err(SolveError::ContradictingModuloParameters(cycle)) => cycle,
            result => return result,
        };
        tried.insert(assignment.clone());
        let Some(repaired) = cycle
            .repairs(network, &assignment, timetable)
            .into_iter()
            .find(|repaired| !tried.contains(repaired))
        else {
            break;
        };
        debug!(
            "modulo parameters contradict along {}; moving one of them by a period",
            cycle
        );
        assignment = repaired;
    }
    warn!(
        "no consistent modulo parameters found for the start timetable after {} attempts",
        tried.len()
    );
    Err(SolveError::NoFeasibleSolution)
}

pub fn tableau_from_assignment(
    network: &Arc<Network>,
    assignment: &ModuloAssignment,
) -> Result<Tableau, SolveError> {
    let problem = NonPeriodicProblem::new(network, assignment);
    let solution = solve_non_periodic(&problem)?;
    let basis = solution.into_basis(network)?;
    Ok(Tableau::build(network.clone(), basis)?)
}
