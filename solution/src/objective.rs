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

use model::base_types::Cost;
use serde::Serialize;

use crate::tableau::Tableau;

/// Objective values of a solved timetable as reported to the caller.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveValue {
    /// the value the solver minimizes
    pub weighted_slack: Cost,
    pub weighted_duration: Cost,
    pub robustness: Cost,
}

impl ObjectiveValue {
    pub fn of(tableau: &Tableau) -> ObjectiveValue {
        ObjectiveValue {
            weighted_slack: tableau.objective(),
            weighted_duration: tableau.weighted_duration(),
            robustness: tableau.robustness(),
        }
    }
}
