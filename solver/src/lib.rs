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

pub mod abort;
pub mod checkpoint;
pub mod error;
pub mod initial_timetable;
pub mod local_cut;
pub mod modulo_simplex;
pub mod non_periodic;
pub mod pivot;
#[cfg(test)]
mod test_utilities;

pub use abort::AbortSignal;
pub use error::SolveError;
pub use modulo_simplex::{
    InitialSolution, ModuloNetworkSimplex, SolveOutcome, SolveStatistics, Termination,
};
