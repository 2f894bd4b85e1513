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

use model::error::ModelError;
use solution::error::TableauError;
use thiserror::Error;

use crate::non_periodic::ContradictingCycle;

#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("infeasible instance: {0}")]
    InfeasibleInstance(String),

    /// The fixed modulo parameters contradict each other, other ones may not.
    #[error("the modulo parameters of the activities {0} contradict each other")]
    ContradictingModuloParameters(ContradictingCycle),

    #[error("internal consistency violated: {0}")]
    Consistency(String),

    #[error("no feasible solution found within the budget")]
    NoFeasibleSolution,
}

impl From<TableauError> for SolveError {
    fn from(err: TableauError) -> Self {
        match err {
            TableauError::InfeasibleActivity { .. } => {
                SolveError::InfeasibleInstance(err.to_string())
            }
            TableauError::NotSpanningTree { .. } | TableauError::CycleInTree { .. } => {
                SolveError::Consistency(err.to_string())
            }
        }
    }
}
