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

use rayon::prelude::*;
use solution::tableau::Tableau;

use super::{apply_move, evaluate_pivot, pivot_candidates, Acceptance, PivotMove, PivotRule};
use crate::error::SolveError;

/// Evaluates every candidate (in parallel) and applies the one with the most negative delta.
pub struct SteepestDescent {
    acceptance: Acceptance,
}

impl SteepestDescent {
    pub fn new(acceptance: Acceptance) -> SteepestDescent {
        SteepestDescent { acceptance }
    }

    /// The best robustness-admissible candidate, improving or not.
    pub(super) fn best_pivot(
        &self,
        tableau: &Tableau,
        filter: impl Fn(&PivotMove) -> bool + Sync,
    ) -> Option<PivotMove> {
        pivot_candidates(tableau)
            .par_iter()
            .filter_map(|&(entering, leaving, coefficient, at_lower)| {
                evaluate_pivot(tableau, entering, leaving, coefficient, at_lower)
            })
            .filter(|pivot| {
                self.acceptance
                    .robustness_admissible(tableau.robustness(), pivot.robustness_delta)
            })
            .filter(|pivot| filter(pivot))
            .min_by_key(|pivot| pivot.key())
    }
}

impl PivotRule for SteepestDescent {
    fn find_and_apply_pivot(&mut self, tableau: &mut Tableau) -> Result<bool, SolveError> {
        match self.best_pivot(tableau, |_| true) {
            Some(pivot) if self.acceptance.is_improving(tableau, &pivot) => {
                apply_move(tableau, &pivot)?;
                Ok(true)
            }
            _ => Ok(false), // no improvement found
        }
    }
}
