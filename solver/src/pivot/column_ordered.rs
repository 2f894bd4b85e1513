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

use itertools::Itertools;
use solution::tableau::Tableau;

use super::{apply_move, evaluate_pivot, Acceptance, PivotMove, PivotRule};
use crate::error::SolveError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColumnMode {
    /// take the first improving candidate
    Fastest,
    /// scan at least this fraction of the candidates, then take the best improving one seen
    Percentage(f64),
}

/// Scans the columns of the tableau ordered by ascending cycle length, short cycles first.
pub struct ColumnOrdered {
    acceptance: Acceptance,
    mode: ColumnMode,
}

impl ColumnOrdered {
    pub fn new(acceptance: Acceptance, mode: ColumnMode) -> ColumnOrdered {
        ColumnOrdered { acceptance, mode }
    }
}

impl PivotRule for ColumnOrdered {
    fn find_and_apply_pivot(&mut self, tableau: &mut Tableau) -> Result<bool, SolveError> {
        let network = tableau.network().clone();
        let columns = tableau
            .non_tree_edges()
            .sorted_by_key(|&e| (tableau.cycle(e).len(), e))
            .collect_vec();

        let total: usize = columns
            .iter()
            .map(|&e| {
                let bounds = if network.activity(e).span() > 0 { 2 } else { 1 };
                tableau.cycle(e).len() * bounds
            })
            .sum();
        let threshold = match self.mode {
            ColumnMode::Fastest => 0,
            ColumnMode::Percentage(percentage) => {
                ((percentage.clamp(0.0, 1.0) * total as f64).ceil() as usize).max(1)
            }
        };

        let mut scanned = 0;
        let mut best: Option<PivotMove> = None;
        'columns: for &entering in columns.iter() {
            let bounds: &[bool] = if network.activity(entering).span() > 0 {
                &[true, false]
            } else {
                &[true]
            };
            for &(leaving, coefficient) in tableau.cycle(entering) {
                for &at_lower in bounds {
                    scanned += 1;
                    let Some(pivot) =
                        evaluate_pivot(tableau, entering, leaving, coefficient, at_lower)
                    else {
                        continue;
                    };
                    if self.acceptance.is_improving(tableau, &pivot)
                        && best.map_or(true, |b| pivot.key() < b.key())
                    {
                        best = Some(pivot);
                    }
                    if best.is_some() && scanned >= threshold {
                        break 'columns;
                    }
                }
            }
        }

        match best {
            Some(pivot) => {
                apply_move(tableau, &pivot)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
