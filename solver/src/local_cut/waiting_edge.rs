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

use super::{evaluate_cut, Cut, LocalCutSearch};
use crate::pivot::Acceptance;

/// Shifts both ends of a wait activity together, so that the wait itself keeps its slack.
pub struct WaitingEdgeCut {
    acceptance: Acceptance,
    start: usize,
}

impl WaitingEdgeCut {
    pub fn new(acceptance: Acceptance) -> WaitingEdgeCut {
        WaitingEdgeCut {
            acceptance,
            start: 0,
        }
    }
}

impl LocalCutSearch for WaitingEdgeCut {
    fn find_cut(&mut self, tableau: &Tableau) -> Option<Cut> {
        let network = tableau.network();
        let activities = network.number_of_activities();
        for offset in 0..activities {
            let a = (self.start + offset) % activities;
            let activity = network.activity(a.into());
            if !activity.kind().is_wait() || activity.is_loop() {
                continue;
            }
            let nodes = [activity.tail(), activity.head()];
            if let Some(cut) = evaluate_cut(tableau, &nodes, &self.acceptance) {
                self.start = a + 1;
                return Some(cut);
            }
        }
        None
    }
}
