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

use model::{base_types::Time, network::Network, timetable::Timetable};
use serde::Serialize;

use crate::objective::ObjectiveValue;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonEventTime {
    event_id: String,
    time: Time,
}

/// One entry per event, in input order.
pub fn timetable_to_json(network: &Network, timetable: &Timetable) -> serde_json::Value {
    let json_timetable: Vec<JsonEventTime> = timetable
        .iter()
        .map(|(event, time)| JsonEventTime {
            event_id: network.event(event).id().to_string(),
            time,
        })
        .collect();
    serde_json::json!(json_timetable)
}

pub fn objective_value_to_json(objective_value: &ObjectiveValue) -> serde_json::Value {
    serde_json::json!(objective_value)
}

/// Writes objective value, statistics and timetable into a pretty-printed json file.
pub fn write_solution_to_json(
    network: &Network,
    timetable: &Timetable,
    objective_value: &ObjectiveValue,
    statistics: serde_json::Value,
    path: &str,
) -> Result<(), std::io::Error> {
    let json_output = serde_json::json!({
        "objectiveValue": objective_value_to_json(objective_value),
        "statistics": statistics,
        "timetable": timetable_to_json(network, timetable),
    });
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &json_output)?;
    Ok(())
}
