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

use model::base_types::EventIdx;
use solution::Tableau;

use super::{evaluate_cut, Cut, LocalCutSearch};
use crate::pivot::Acceptance;

/// Shifts single events. The scan starts after the event of the last successful cut.
pub struct SingleNodeCut {
    acceptance: Acceptance,
    start: usize,
}

impl SingleNodeCut {
    pub fn new(acceptance: Acceptance) -> SingleNodeCut {
        SingleNodeCut {
            acceptance,
            start: 0,
        }
    }
}

impl LocalCutSearch for SingleNodeCut {
    fn find_cut(&mut self, tableau: &Tableau) -> Option<Cut> {
        let events = tableau.network().number_of_events();
        for offset in 0..events {
            let v = (self.start + offset) % events;
            if let Some(cut) = evaluate_cut(tableau, &[EventIdx::from(v)], &self.acceptance) {
                self.start = v + 1;
                return Some(cut);
            }
        }
        None
    }
}
