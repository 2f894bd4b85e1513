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

use model::config::ConfigAnnealing;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use solution::tableau::Tableau;

use super::{apply_move, evaluate_pivot, pivot_candidates, Acceptance, PivotRule};
use crate::error::SolveError;

/// Samples the candidates in random order. Improving candidates are taken at once, others with
/// probability min(1, exp(-delta / temperature)) as long as the temperature is above its minimum.
/// The temperature is multiplied by the cooling factor on every accepted pivot.
pub struct SimulatedAnnealing {
    acceptance: Acceptance,
    temperature: f64,
    cooling_factor: f64,
    min_temperature: f64,
    rng: SmallRng,
}

impl SimulatedAnnealing {
    pub fn new(acceptance: Acceptance, annealing: &ConfigAnnealing, seed: u64) -> Self {
        SimulatedAnnealing {
            acceptance,
            temperature: annealing.temperature,
            cooling_factor: annealing.cooling_factor,
            min_temperature: annealing.min_temperature,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }
}

impl PivotRule for SimulatedAnnealing {
    fn find_and_apply_pivot(&mut self, tableau: &mut Tableau) -> Result<bool, SolveError> {
        let mut candidates = pivot_candidates(tableau);
        candidates.shuffle(&mut self.rng);

        let hot = self.temperature > self.min_temperature;
        for (entering, leaving, coefficient, at_lower) in candidates {
            let Some(pivot) = evaluate_pivot(tableau, entering, leaving, coefficient, at_lower)
            else {
                continue;
            };
            if !self
                .acceptance
                .robustness_admissible(tableau.robustness(), pivot.robustness_delta)
            {
                continue;
            }
            // exp(-delta / temperature) exceeds 1 for any decrease below the improvement threshold
            let accepted = self.acceptance.is_improving(tableau, &pivot)
                || (hot && self.rng.gen::<f64>() < (-(pivot.delta as f64) / self.temperature).exp());
            if accepted {
                apply_move(tableau, &pivot)?;
                self.temperature *= self.cooling_factor;
                return Ok(true);
            }
        }
        Ok(false)
    }
}
