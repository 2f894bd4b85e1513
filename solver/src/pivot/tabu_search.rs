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

use std::collections::{HashSet, VecDeque};

use model::base_types::Cost;
use solution::{basis::Basis, tableau::Tableau};
use tracing::debug;

use super::{apply_move, Acceptance, PivotRule, SteepestDescent};
use crate::error::SolveError;

/// Steepest search over the candidates that do not lead back to one of the recently visited
/// tree configurations. A tabu candidate is allowed if it reaches a new best objective.
///
/// Non-improving pivots are taken until `max_non_improving` pivots in a row did not improve on
/// the best objective; then the best basis seen is restored and the search reports a local
/// optimum.
pub struct TabuSearch {
    steepest: SteepestDescent,
    tabu_length: usize,
    max_non_improving: usize,
    recent: VecDeque<u64>,
    tabu: HashSet<u64>,
    best: Option<(Cost, Basis)>,
    non_improving: usize,
}

impl TabuSearch {
    pub fn new(acceptance: Acceptance, tabu_length: usize, max_non_improving: usize) -> Self {
        TabuSearch {
            steepest: SteepestDescent::new(acceptance),
            tabu_length,
            max_non_improving,
            recent: VecDeque::with_capacity(tabu_length + 1),
            tabu: HashSet::new(),
            best: None,
            non_improving: 0,
        }
    }

    fn remember(&mut self, fingerprint: u64) {
        if self.tabu_length == 0 || self.tabu.contains(&fingerprint) {
            return;
        }
        self.recent.push_back(fingerprint);
        self.tabu.insert(fingerprint);
        while self.recent.len() > self.tabu_length {
            if let Some(oldest) = self.recent.pop_front() {
                self.tabu.remove(&oldest);
            }
        }
    }

    /// Restores the best basis if the current one is worse.
    fn restore_best(&mut self, tableau: &mut Tableau) -> Result<(), SolveError> {
        if let Some((objective, basis)) = &self.best {
            if *objective < tableau.objective() {
                debug!("tabu search: restoring best basis with objective {}", objective);
                tableau.replace_basis(basis.clone())?;
            }
        }
        self.non_improving = 0;
        Ok(())
    }
}

impl PivotRule for TabuSearch {
    fn find_and_apply_pivot(&mut self, tableau: &mut Tableau) -> Result<bool, SolveError> {
        if self
            .best
            .as_ref()
            .map_or(true, |(objective, _)| tableau.objective() < *objective)
        {
            // first call, or the tableau was improved from outside (by a cut)
            self.best = Some((tableau.objective(), tableau.basis().clone()));
            self.non_improving = 0;
            self.remember(tableau.basis().fingerprint());
        }
        let best_objective = self.best.as_ref().map_or(Cost::MAX, |(objective, _)| *objective);
        let objective = tableau.objective();
        let basis = tableau.basis();
        let pivot = self.steepest.best_pivot(tableau, |pivot| {
            !self.tabu.contains(&basis.fingerprint_after_swap(
                pivot.entering,
                pivot.leaving,
                pivot.at_lower,
            )) || objective + pivot.delta < best_objective
        });

        let Some(pivot) = pivot else {
            self.restore_best(tableau)?;
            return Ok(false);
        };
        if objective + pivot.delta >= best_objective && self.non_improving >= self.max_non_improving
        {
            self.restore_best(tableau)?;
            return Ok(false);
        }

        apply_move(tableau, &pivot)?;
        self.remember(tableau.basis().fingerprint());
        if tableau.objective() < best_objective {
            self.best = Some((tableau.objective(), tableau.basis().clone()));
            self.non_improving = 0;
        } else {
            self.non_improving += 1;
        }
        Ok(true)
    }
}
