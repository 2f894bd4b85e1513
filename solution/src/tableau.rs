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

//! The simplex tableau of the modulo network simplex.
//!
//! Everything here is derived from the network and a [`Basis`]: node potentials, slacks and
//! modulo parameters of all activities, the fundamental cycle of every non-tree activity and,
//! per tree activity, the non-tree activities whose cycle runs through it (its row).
//!
//! With `pi(head) - pi(tail) = lower + slack + z * T` for every activity, walking the
//! fundamental cycle of a non-tree activity g (g itself, then the tree path from head(g) back to
//! tail(g)) sums the potential differences to zero. Cycle coefficients are +1 for tree edges
//! traversed along their orientation and -1 otherwise.
#[cfg(test)]
mod tests;

use std::collections::VecDeque;
use std::sync::Arc;

use model::base_types::{ActivityIdx, Cost, EventIdx, ModuloParameter, Time};
use model::network::Network;
use model::timetable::Timetable;
use tracing::trace;

use crate::basis::{Basis, EdgeState};
use crate::error::TableauError;
use crate::modulo_assignment::ModuloAssignment;

pub type Coefficient = i8;

#[derive(Clone, Debug)]
pub struct Tableau {
    network: Arc<Network>,
    basis: Basis,

    potentials: Vec<Time>, // per event, in [0, period)
    slacks: Vec<Time>,     // per activity
    modulo_parameters: Vec<ModuloParameter>,

    cycles: Vec<Vec<(ActivityIdx, Coefficient)>>, // per non-tree activity
    rows: Vec<Vec<(ActivityIdx, Coefficient)>>,   // per tree activity

    objective: Cost,
    robustness: Cost,
}

// methods
impl Tableau {
    pub fn network(&self) -> &Arc<Network> {
        &self.network
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    pub fn potential(&self, event: EventIdx) -> Time {
        self.potentials[event.idx()]
    }

    pub fn slack(&self, activity: ActivityIdx) -> Time {
        self.slacks[activity.idx()]
    }

    pub fn modulo_parameter(&self, activity: ActivityIdx) -> ModuloParameter {
        self.modulo_parameters[activity.idx()]
    }

    /// lower + slack, the duration of the activity
    pub fn tension(&self, activity: ActivityIdx) -> Time {
        self.network.activity(activity).lower() + self.slack(activity)
    }

    /// Tree activities on the fundamental cycle of a non-tree activity with their coefficients.
    /// Empty for tree activities and self-loops.
    pub fn cycle(&self, activity: ActivityIdx) -> &[(ActivityIdx, Coefficient)] {
        &self.cycles[activity.idx()]
    }

    /// Non-tree activities whose fundamental cycle contains the given tree activity, together
    /// with the coefficient of the tree activity on that cycle.
    pub fn row(&self, activity: ActivityIdx) -> &[(ActivityIdx, Coefficient)] {
        &self.rows[activity.idx()]
    }

    pub fn non_tree_edges(&self) -> impl Iterator<Item = ActivityIdx> + '_ {
        self.basis.non_tree_edges()
    }

    /// sum of weight * slack
    pub fn objective(&self) -> Cost {
        self.objective
    }

    /// sum of robustness coefficient * slack
    pub fn robustness(&self) -> Cost {
        self.robustness
    }

    /// sum of weight * duration over the activities of the input (connectors excluded)
    pub fn weighted_duration(&self) -> Cost {
        self.network
            .activities()
            .filter(|&a| !self.network.activity(a).kind().is_connector())
            .map(|a| self.network.activity(a).weight() * self.tension(a))
            .sum()
    }

    /// Event times read out from the potentials.
    pub fn timetable(&self) -> Timetable {
        Timetable::new(self.potentials.clone(), self.network.period())
    }

    pub fn modulo_assignment(&self) -> ModuloAssignment {
        ModuloAssignment::new(self.modulo_parameters.clone())
    }
}

// modifications
impl Tableau {
    pub fn build(network: Arc<Network>, basis: Basis) -> Result<Tableau, TableauError> {
        let mut tableau = Tableau {
            network,
            basis,
            potentials: Vec::new(),
            slacks: Vec::new(),
            modulo_parameters: Vec::new(),
            cycles: Vec::new(),
            rows: Vec::new(),
            objective: 0,
            robustness: 0,
        };
        tableau.rebuild()?;
        Ok(tableau)
    }

    /// Recomputes everything from the basis. On error the previous state is kept.
    pub fn rebuild(&mut self) -> Result<(), TableauError> {
        let network = self.network.clone();
        let period = network.period();
        let tree = SpanningTree::traverse(&network, &self.basis)?;

        let mut slacks = vec![0; network.number_of_activities()];
        let mut modulo_parameters = vec![0; network.number_of_activities()];
        for a in network.activities() {
            let activity = network.activity(a);
            let excess = tree.potentials[activity.head().idx()]
                - tree.potentials[activity.tail().idx()]
                - activity.lower();
            let slack = match self.basis.state(a) {
                EdgeState::Tree { at_lower: true } => 0,
                EdgeState::Tree { at_lower: false } => activity.span(),
                EdgeState::NonTree => {
                    let slack = excess.rem_euclid(period);
                    if slack > activity.span() {
                        return Err(TableauError::InfeasibleActivity {
                            activity: activity.id().to_string(),
                            slack,
                            span: activity.span(),
                        });
                    }
                    slack
                }
            };
            slacks[a.idx()] = slack;
            modulo_parameters[a.idx()] = (excess - slack) / period;
        }

        let mut cycles = vec![Vec::new(); network.number_of_activities()];
        let mut rows: Vec<Vec<(ActivityIdx, Coefficient)>> =
            vec![Vec::new(); network.number_of_activities()];
        for g in self.basis.non_tree_edges() {
            let cycle = tree.fundamental_cycle(&network, g);
            for &(f, coefficient) in cycle.iter() {
                rows[f.idx()].push((g, coefficient));
            }
            cycles[g.idx()] = cycle;
        }

        self.objective = network
            .activities()
            .map(|a| network.activity(a).weight() * slacks[a.idx()])
            .sum();
        self.robustness = network
            .activities()
            .map(|a| network.activity(a).robustness() * slacks[a.idx()])
            .sum();
        self.potentials = tree.potentials;
        self.slacks = slacks;
        self.modulo_parameters = modulo_parameters;
        self.cycles = cycles;
        self.rows = rows;
        trace!(
            "tableau rebuilt: objective {}, robustness {}",
            self.objective,
            self.robustness
        );
        Ok(())
    }

    /// Entering becomes a tree activity with the given flag, leaving leaves the tree.
    /// The caller is responsible for leaving lying on the cycle of entering. On error the
    /// tableau is unchanged.
    pub fn apply_pivot(
        &mut self,
        entering: ActivityIdx,
        leaving: ActivityIdx,
        at_lower: bool,
    ) -> Result<(), TableauError> {
        let mut basis = self.basis.clone();
        basis.swap(entering, leaving, at_lower);
        self.replace_basis(basis)
    }

    /// Switches to another basis of the same network, e.g. a remembered best one.
    pub fn replace_basis(&mut self, basis: Basis) -> Result<(), TableauError> {
        let previous = std::mem::replace(&mut self.basis, basis);
        self.rebuild().map_err(|err| {
            self.basis = previous;
            err
        })
    }
}

/// Breadth-first traversal of the tree activities, rooted at event 0.
struct SpanningTree {
    potentials: Vec<Time>,
    parent: Vec<Option<(EventIdx, ActivityIdx)>>,
    depth: Vec<usize>,
}

impl SpanningTree {
    fn traverse(network: &Network, basis: &Basis) -> Result<SpanningTree, TableauError> {
        let events = network.number_of_events();
        let period = network.period();
        if basis.number_of_tree_edges() + 1 != events.max(1) {
            return Err(TableauError::NotSpanningTree {
                tree_edges: basis.number_of_tree_edges(),
                events,
            });
        }

        let mut adjacency: Vec<Vec<(ActivityIdx, bool)>> = vec![Vec::new(); events];
        for (a, at_lower) in basis.tree_edges() {
            let activity = network.activity(a);
            adjacency[activity.tail().idx()].push((a, at_lower));
            adjacency[activity.head().idx()].push((a, at_lower));
        }

        let mut tree = SpanningTree {
            potentials: vec![0; events],
            parent: vec![None; events],
            depth: vec![0; events],
        };
        if events == 0 {
            return Ok(tree);
        }

        let mut visited = vec![false; events];
        visited[0] = true;
        let mut reached = 1;
        let mut queue = VecDeque::from([EventIdx(0)]);
        while let Some(event) = queue.pop_front() {
            let parent_edge = tree.parent[event.idx()].map(|(_, a)| a);
            for &(a, at_lower) in adjacency[event.idx()].iter() {
                if parent_edge == Some(a) {
                    continue;
                }
                let activity = network.activity(a);
                let other = activity.other_end(event);
                if visited[other.idx()] {
                    return Err(TableauError::CycleInTree {
                        activity: activity.id().to_string(),
                    });
                }
                let tension = if at_lower {
                    activity.lower()
                } else {
                    activity.upper()
                };
                let own = tree.potentials[event.idx()];
                tree.potentials[other.idx()] = if activity.tail() == event {
                    (own + tension).rem_euclid(period)
                } else {
                    (own - tension).rem_euclid(period)
                };
                tree.parent[other.idx()] = Some((event, a));
                tree.depth[other.idx()] = tree.depth[event.idx()] + 1;
                visited[other.idx()] = true;
                reached += 1;
                queue.push_back(other);
            }
        }

        if reached != events {
            return Err(TableauError::NotSpanningTree {
                tree_edges: basis.number_of_tree_edges(),
                events,
            });
        }
        Ok(tree)
    }

    /// Tree path from head(g) to tail(g).
    fn fundamental_cycle(
        &self,
        network: &Network,
        g: ActivityIdx,
    ) -> Vec<(ActivityIdx, Coefficient)> {
        let activity = network.activity(g);
        let mut up_from_head = Vec::new();
        let mut up_from_tail = Vec::new();
        let (mut u, mut v) = (activity.head(), activity.tail());
        while u != v {
            if self.depth[u.idx()] >= self.depth[v.idx()] {
                let (parent, f) = self.parent[u.idx()].expect("only the root has no parent");
                // traversed from u up to parent
                let coefficient = if network.activity(f).tail() == u { 1 } else { -1 };
                up_from_head.push((f, coefficient));
                u = parent;
            } else {
                let (parent, f) = self.parent[v.idx()].expect("only the root has no parent");
                // traversed from parent down to v
                let coefficient = if network.activity(f).head() == v { 1 } else { -1 };
                up_from_tail.push((f, coefficient));
                v = parent;
            }
        }
        up_from_head.extend(up_from_tail.into_iter().rev());
        up_from_head
    }
}
