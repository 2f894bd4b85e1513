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
use rand::rngs::SmallRng;
use rand::seq::index::sample;
use rand::SeedableRng;
use solution::Tableau;

use super::{evaluate_cut, Cut, LocalCutSearch};
use crate::pivot::Acceptance;

/// Like the single-node cut, but only a random sample of events is tried per call.
pub struct RandomNodeCut {
    acceptance: Acceptance,
    sample_size: usize,
    rng: SmallRng,
}

impl RandomNodeCut {
    pub fn new(acceptance: Acceptance, sample_size: usize, seed: u64) -> RandomNodeCut {
        RandomNodeCut {
            acceptance,
            sample_size,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl LocalCutSearch for RandomNodeCut {
    fn find_cut(&mut self, tableau: &Tableau) -> Option<Cut> {
        let events = tableau.network().number_of_events();
        sample(&mut self.rng, events, self.sample_size.min(events))
            .into_iter()
            .find_map(|v| evaluate_cut(tableau, &[EventIdx::from(v)], &self.acceptance))
    }
}
