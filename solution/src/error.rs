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

use model::base_types::Time;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableauError {
    #[error("basis has {tree_edges} tree edges but the network has {events} events")]
    NotSpanningTree { tree_edges: usize, events: usize },

    #[error("tree edge {activity} closes a cycle")]
    CycleInTree { activity: String },

    #[error(
        "activity {activity} admits no slack in [0, {span}] \
         (smallest slack modulo the period is {slack})"
    )]
    InfeasibleActivity {
        activity: String,
        slack: Time,
        span: Time,
    },
}
