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

use thiserror::Error;

use crate::base_types::{Cost, Time};

/// Structural input errors. All of them are fatal and reported before any solving begins.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("period must be positive, got {0}")]
    NonPositivePeriod(Time),

    #[error("event id {0} is used more than once")]
    DuplicateEvent(String),

    #[error("activity {activity} references unknown event {event}")]
    UnknownEvent { activity: String, event: String },

    #[error("activity {activity} has upper bound {upper} below lower bound {lower}")]
    InvalidBounds {
        activity: String,
        lower: Time,
        upper: Time,
    },

    #[error(
        "headways are excluded but headway activity {activity} carries weight {weight}; \
         excluding it would drop part of the objective"
    )]
    WeightedHeadwayExcluded { activity: String, weight: Cost },

    #[error("start timetable has no time for event {0}")]
    MissingEventTime(String),

    #[error("invalid instance json: {0}")]
    Json(#[from] serde_json::Error),
}
