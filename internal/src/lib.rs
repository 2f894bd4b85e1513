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

use std::sync::Arc;
use std::time as stdtime;

use model::json_serialisation::load_periodic_timetabling_instance_from_json;
use solver::{InitialSolution, ModuloNetworkSimplex, SolveError};
use tracing::info;

/// Solves the instance like the server does, and additionally logs the timetable.
pub fn run(input_data: serde_json::Value) -> Result<serde_json::Value, SolveError> {
    let start_time = stdtime::Instant::now();
    let (network, config, start_timetable) =
        load_periodic_timetabling_instance_from_json(input_data)?;

    let initial_solution = match start_timetable {
        Some(timetable) => {
            info!("starting from the given timetable");
            InitialSolution::Timetable(timetable)
        }
        None => InitialSolution::Bootstrap,
    };
    let final_solution = ModuloNetworkSimplex::new(network.clone(), Arc::clone(&config))
        .with_initial_solution(initial_solution)
        .solve()?;

    let runtime_duration = stdtime::Instant::now().duration_since(start_time);

    info!("Final timetable:");
    for (event, time) in final_solution.timetable.iter() {
        info!("  {:>20}: {:>6}", network.event(event).id(), time);
    }
    info!(
        "Final objective value: weighted slack {}, weighted duration {}, robustness {}",
        final_solution.objective_value.weighted_slack,
        final_solution.objective_value.weighted_duration,
        final_solution.objective_value.robustness
    );
    info!(
        "{} pivots, {} cuts, {:?}",
        final_solution.statistics.pivots,
        final_solution.statistics.cuts,
        final_solution.statistics.termination
    );
    info!("Running time: {:0.2}sec", runtime_duration.as_secs_f32());

    Ok(server::create_output_json(&final_solution, runtime_duration))
}

#[cfg(test)]
mod tests {
    #[test]
    fn small_instance_run() {
        let input: serde_json::Value =
            serde_json::from_str(include_str!("../../model/resources/small_instance.json"))
                .unwrap();
        let output = super::run(input).unwrap();
        assert_eq!(output["timetable"].as_array().unwrap().len(), 4);
        assert!(output["objectiveValue"]["weightedSlack"].as_i64().unwrap() >= 0);
        assert!(output["objectiveValue"]["robustness"].as_i64().unwrap() >= 0);
        assert!(output["info"]["hostname"].is_string());
    }
}
