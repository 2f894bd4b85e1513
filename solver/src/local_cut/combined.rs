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

use solution::Tableau;

use super::{ConnectedRegionCut, Cut, LocalCutSearch, SingleNodeCut, WaitingEdgeCut};

/// Single-node cuts first, then waiting-edge cuts, then connected regions.
pub struct CombinedCut {
    single_node: SingleNodeCut,
    waiting_edge: WaitingEdgeCut,
    connected_region: ConnectedRegionCut,
}

impl CombinedCut {
    pub fn new(
        single_node: SingleNodeCut,
        waiting_edge: WaitingEdgeCut,
        connected_region: ConnectedRegionCut,
    ) -> CombinedCut {
        CombinedCut {
            single_node,
            waiting_edge,
            connected_region,
        }
    }
}

impl LocalCutSearch for CombinedCut {
    fn find_cut(&mut self, tableau: &Tableau) -> Option<Cut> {
        self.single_node
            .find_cut(tableau)
            .or_else(|| self.waiting_edge.find_cut(tableau))
            .or_else(|| self.connected_region.find_cut(tableau))
    }
}
