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

use solution::tableau::Tableau;
use tracing::info;

use super::{PivotRule, SimulatedAnnealing, SteepestDescent};
use crate::error::SolveError;

/// Steepest descent until the first local optimum, simulated annealing from then on.
pub struct Hybrid {
    steepest: SteepestDescent,
    annealing: SimulatedAnnealing,
    switched: bool,
}

impl Hybrid {
    pub fn new(steepest: SteepestDescent, annealing: SimulatedAnnealing) -> Hybrid {
        Hybrid {
            steepest,
            annealing,
            switched: false,
        }
    }
}

impl PivotRule for Hybrid {
    fn find_and_apply_pivot(&mut self, tableau: &mut Tableau) -> Result<bool, SolveError> {
        if !self.switched {
            if self.steepest.find_and_apply_pivot(tableau)? {
                return Ok(true);
            }
            info!(
                "steepest descent reached objective {}; switching to simulated annealing",
                tableau.objective()
            );
            self.switched = true;
        }
        self.annealing.find_and_apply_pivot(tableau)
    }
}
