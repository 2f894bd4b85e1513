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

use im::Vector;
use model::base_types::ActivityIdx;
use model::network::Network;
use model::utilities::UnionFind;

use crate::error::TableauError;

/// Role of an activity in the spanning-tree basis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeState {
    /// fixed at slack 0 if at_lower, at slack upper - lower otherwise
    Tree { at_lower: bool },
    NonTree,
}

/// Tree/non-tree partition of the activities together with the at-lower flags.
///
/// Stored in an `im::Vector`, so snapshots of a basis are cheap.
/// The fingerprint identifies the tree configuration and is kept up to date by `swap`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Basis {
    states: Vector<EdgeState>,
    number_of_tree_edges: usize,
    fingerprint: u64,
}

impl Basis {
    /// Creates the basis whose tree consists of the given activities (with their at-lower flags).
    /// Fails if they do not form a spanning tree of the network.
    pub fn from_tree_edges(
        network: &Network,
        tree_edges: impl IntoIterator<Item = (ActivityIdx, bool)>,
    ) -> Result<Basis, TableauError> {
        let mut states: Vector<EdgeState> =
            std::iter::repeat(EdgeState::NonTree).take(network.number_of_activities()).collect();
        let mut components = UnionFind::new(network.number_of_events());
        let mut number_of_tree_edges = 0;
        let mut fingerprint = 0;

        for (activity_idx, at_lower) in tree_edges {
            let activity = network.activity(activity_idx);
            if !components.union(activity.tail().idx(), activity.head().idx()) {
                return Err(TableauError::CycleInTree {
                    activity: activity.id().to_string(),
                });
            }
            states.set(activity_idx.idx(), EdgeState::Tree { at_lower });
            number_of_tree_edges += 1;
            fingerprint ^= edge_fingerprint(activity_idx, at_lower);
        }

        if number_of_tree_edges + 1 != network.number_of_events().max(1) {
            return Err(TableauError::NotSpanningTree {
                tree_edges: number_of_tree_edges,
                events: network.number_of_events(),
            });
        }

        Ok(Basis {
            states,
            number_of_tree_edges,
            fingerprint,
        })
    }

    pub fn state(&self, activity: ActivityIdx) -> EdgeState {
        self.states[activity.idx()]
    }

    pub fn is_tree(&self, activity: ActivityIdx) -> bool {
        matches!(self.state(activity), EdgeState::Tree { .. })
    }

    /// None for non-tree activities.
    pub fn at_lower(&self, activity: ActivityIdx) -> Option<bool> {
        match self.state(activity) {
            EdgeState::Tree { at_lower } => Some(at_lower),
            EdgeState::NonTree => None,
        }
    }

    pub fn number_of_tree_edges(&self) -> usize {
        self.number_of_tree_edges
    }

    pub fn tree_edges(&self) -> impl Iterator<Item = (ActivityIdx, bool)> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter_map(|(idx, state)| match state {
                EdgeState::Tree { at_lower } => Some((ActivityIdx::from(idx), *at_lower)),
                EdgeState::NonTree => None,
            })
    }

    pub fn non_tree_edges(&self) -> impl Iterator<Item = ActivityIdx> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, state)| **state == EdgeState::NonTree)
            .map(|(idx, _)| ActivityIdx::from(idx))
    }

    /// Entering becomes a tree edge with the given flag, leaving becomes a non-tree edge.
    /// Whether the result is still a spanning tree is checked by the next tableau rebuild.
    pub fn swap(&mut self, entering: ActivityIdx, leaving: ActivityIdx, at_lower: bool) {
        if let EdgeState::Tree { at_lower: old_flag } = self.state(leaving) {
            self.fingerprint ^= edge_fingerprint(leaving, old_flag);
        }
        self.states.set(leaving.idx(), EdgeState::NonTree);
        self.states
            .set(entering.idx(), EdgeState::Tree { at_lower });
        self.fingerprint ^= edge_fingerprint(entering, at_lower);
    }

    /// Fingerprint of swapping entering and leaving, without performing it.
    pub fn fingerprint_after_swap(
        &self,
        entering: ActivityIdx,
        leaving: ActivityIdx,
        at_lower: bool,
    ) -> u64 {
        let mut fingerprint = self.fingerprint ^ edge_fingerprint(entering, at_lower);
        if let EdgeState::Tree { at_lower: old_flag } = self.state(leaving) {
            fingerprint ^= edge_fingerprint(leaving, old_flag);
        }
        fingerprint
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

// splitmix64 finalizer
fn edge_fingerprint(activity: ActivityIdx, at_lower: bool) -> u64 {
    let mut z = (((activity.0 as u64) << 1) | at_lower as u64).wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}
