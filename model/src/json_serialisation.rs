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


use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::base_types::{ActivityKind, Cost, Time};
use crate::config::{Config, LocalCutStrategy, PivotStrategy};
use crate::error::ModelError;
use crate::network::{ActivityRecord, EventRecord, Network, NetworkOptions};
use crate::timetable::Timetable;

type Integer = i64;

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonEvent {
    id: String,
    time: Option<Integer>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonActivity {
    id: String,
    #[serde(rename = "type")]
    kind: ActivityKind,
    tail: String,
    head: String,
    lower_bound: Integer,
    upper_bound: Integer,
    weight: Integer,
    robustness: Option<Integer>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct Parameters {
    include_headways: Option<bool>,
    pivot_strategy: Option<PivotStrategy>,
    minimum_improvement: Option<f64>,
    percentage: Option<f64>,
    tabu_length: Option<usize>,
    tabu_max_non_improving: Option<usize>,
    annealing_temperature: Option<f64>,
    annealing_cooling: Option<f64>,
    annealing_min_temperature: Option<f64>,
    local_cut_strategy: Option<LocalCutStrategy>,
    random_node_sample: Option<usize>,
    region_seeds: Option<usize>,
    iteration_limit: Option<u64>,
    time_limit_in_seconds: Option<f64>,
    minimum_robustness: Option<Integer>,
    checkpoint_interval: Option<u64>,
    checkpoint_path: Option<String>,
    seed: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonInput {
    period: Integer,
    events: Vec<JsonEvent>,
    activities: Vec<JsonActivity>,
    #[serde(default)]
    parameters: Parameters,
}

/// Loads network, configuration and (if every event carries a time) the start timetable.
pub fn load_periodic_timetabling_instance_from_json(
    input_data: serde_json::Value,
) -> Result<(Arc<Network>, Arc<Config>, Option<Timetable>), ModelError> {
    let json_input: JsonInput = serde_json::from_value(input_data)?;
    let config = create_config(&json_input.parameters);
    let start_timetable = create_start_timetable(&json_input)?;
    let network = create_network(json_input, &config)?;
    info!("{} loaded", network);
    Ok((Arc::new(network), Arc::new(config), start_timetable))
}

fn create_config(parameters: &Parameters) -> Config {
    let mut config = Config::default();
    if let Some(include_headways) = parameters.include_headways {
        config.include_headways = include_headways;
    }
    if let Some(strategy) = parameters.pivot_strategy {
        config.pivot.strategy = strategy;
    }
    if let Some(minimum_improvement) = parameters.minimum_improvement {
        config.pivot.minimum_improvement = minimum_improvement;
    }
    if let Some(percentage) = parameters.percentage {
        config.pivot.percentage = percentage;
    }
    if let Some(tabu_length) = parameters.tabu_length {
        config.pivot.tabu_length = tabu_length;
    }
    if let Some(max_non_improving) = parameters.tabu_max_non_improving {
        config.pivot.tabu_max_non_improving = max_non_improving;
    }
    if let Some(temperature) = parameters.annealing_temperature {
        config.pivot.annealing.temperature = temperature;
    }
    if let Some(cooling_factor) = parameters.annealing_cooling {
        config.pivot.annealing.cooling_factor = cooling_factor;
    }
    if let Some(min_temperature) = parameters.annealing_min_temperature {
        config.pivot.annealing.min_temperature = min_temperature;
    }
    if let Some(strategy) = parameters.local_cut_strategy {
        config.local_cut.strategy = strategy;
    }
    if let Some(sample) = parameters.random_node_sample {
        config.local_cut.random_node_sample = sample;
    }
    if let Some(seeds) = parameters.region_seeds {
        config.local_cut.region_seeds = seeds;
    }
    config.limits.iterations = parameters.iteration_limit;
    config.limits.time = parameters
        .time_limit_in_seconds
        .map(|seconds| Duration::from_secs_f64(seconds.max(0.0)));
    config.minimum_robustness = parameters.minimum_robustness.map(|r| r as Cost);
    if let Some(interval) = parameters.checkpoint_interval {
        config.checkpoint.interval = interval.max(1);
    }
    config.checkpoint.path = parameters.checkpoint_path.as_ref().map(PathBuf::from);
    if let Some(seed) = parameters.seed {
        config.seed = seed;
    }
    config
}

fn create_start_timetable(json_input: &JsonInput) -> Result<Option<Timetable>, ModelError> {
    if json_input.events.iter().all(|e| e.time.is_none()) {
        return Ok(None);
    }
    let times = json_input
        .events
        .iter()
        .map(|e| {
            e.time
                .map(|t| t as Time)
                .ok_or_else(|| ModelError::MissingEventTime(e.id.clone()))
        })
        .collect::<Result<Vec<Time>, ModelError>>()?;
    Ok(Some(Timetable::new(times, json_input.period.max(1))))
}

fn create_network(json_input: JsonInput, config: &Config) -> Result<Network, ModelError> {
    let event_records = json_input
        .events
        .into_iter()
        .map(|e| EventRecord {
            id: e.id,
            time: e.time,
        })
        .collect();

    let activity_records = json_input
        .activities
        .into_iter()
        .map(|a| ActivityRecord {
            id: a.id,
            kind: a.kind,
            tail: a.tail,
            head: a.head,
            lower_bound: a.lower_bound,
            upper_bound: a.upper_bound,
            weight: a.weight,
            robustness: a.robustness.unwrap_or(0),
        })
        .collect();

    Network::from_records(
        json_input.period,
        event_records,
        activity_records,
        &NetworkOptions {
            include_headways: config.include_headways,
        },
    )
}
