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

use model::base_types::{ActivityIdx, EventIdx, Time};
use rand::rngs::SmallRng;
use rand::seq::index::sample;
use rand::SeedableRng;
use solution::Tableau;

use super::{evaluate_cut, Cut, LocalCutSearch};
use crate::pivot::Acceptance;

/// Grows a connected set of events from random seeds. As long as shifting the set does not
/// improve, the boundary activity with the smallest span is absorbed (ties by index).
pub struct ConnectedRegionCut {
    acceptance: Acceptance,
    seeds: usize,
    rng: SmallRng,
}

impl ConnectedRegionCut {
    pub fn new(acceptance: Acceptance, seeds: usize, seed: u64) -> ConnectedRegionCut {
        ConnectedRegionCut {
            acceptance,
            seeds,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn grow(&self, tableau: &Tableau, seed: EventIdx) -> Option<Cut> {
        let network = tableau.network();
        let events = network.number_of_events();
        let mut inside = vec![false; events];
        inside[seed.idx()] = true;
        let mut region = vec![seed];

        while region.len() < events {
            if let Some(cut) = evaluate_cut(tableau, &region, &self.acceptance) {
                return Some(cut);
            }
            let narrowest: Option<(Time, ActivityIdx, EventIdx)> = region
                .iter()
                .flat_map(|&v| network.incident(v).map(move |a| (v, a)))
                .filter_map(|(v, a)| {
                    let other = network.activity(a).other_end(v);
                    (!inside[other.idx()]).then(|| (network.activity(a).span(), a, other))
                })
                .min();
            let (_, _, other) = narrowest?;
            inside[other.idx()] = true;
            region.push(other);
        }
        None
    }
}

impl LocalCutSearch for ConnectedRegionCut {
    fn find_cut(&mut self, tableau: &Tableau) -> Option<Cut> {
        let events = tableau.network().number_of_events();
        let seeds = sample(&mut self.rng, events, self.seeds.min(events)).into_vec();
        seeds
            .into_iter()
            .find_map(|v| self.grow(tableau, EventIdx::from(v)))
    }
}
