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

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gethostname::gethostname;
use model::json_serialisation::load_periodic_timetabling_instance_from_json;
use solver::{InitialSolution, ModuloNetworkSimplex, SolveError, SolveOutcome};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log output to stderr, filtered by `RUST_LOG` (default: info).
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hyper=warn,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub fn solve_instance(input_data: serde_json::Value) -> Result<serde_json::Value, SolveError> {
    let start_time = stdtime::Instant::now();
    let (network, config, start_timetable) =
        load_periodic_timetabling_instance_from_json(input_data)?;
    info!(
        "*** Instance with {} events and {} activities loaded (elapsed time: {:0.2}sec) ***",
        network.number_of_events(),
        network.number_of_activities(),
        start_time.elapsed().as_secs_f32()
    );

    let initial_solution = match start_timetable {
        Some(timetable) => InitialSolution::Timetable(timetable),
        None => InitialSolution::Bootstrap,
    };
    let outcome = ModuloNetworkSimplex::new(network, Arc::clone(&config))
        .with_initial_solution(initial_solution)
        .solve()?;

    let runtime_duration = start_time.elapsed();
    info!(
        "*** Solved: weighted slack {}, weighted duration {}, robustness {} (running time: {:0.2}sec) ***",
        outcome.objective_value.weighted_slack,
        outcome.objective_value.weighted_duration,
        outcome.objective_value.robustness,
        runtime_duration.as_secs_f32()
    );

    Ok(create_output_json(&outcome, runtime_duration))
}

pub fn create_output_json(
    outcome: &SolveOutcome,
    runtime_duration: stdtime::Duration,
) -> serde_json::Value {
    let timestamp = stdtime::SystemTime::now()
        .duration_since(stdtime::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    let mut json_output = outcome.to_json();
    json_output["info"] = serde_json::json!({
        "runningTime": format!("{:0.2}sec", runtime_duration.as_secs_f32()),
        "numberOfThreads": rayon::current_num_threads(),
        "unixTimestamp": timestamp,
        "hostname": gethostname().into_string().unwrap_or("unknown".to_string()),
    });
    json_output
}

/// Errors answered by the /solve endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error("solver task failed: {0}")]
    Task(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::Solve(SolveError::Model(_))
            | ServerError::Solve(SolveError::InfeasibleInstance(_))
            | ServerError::Solve(SolveError::NoFeasibleSolution) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Solve(SolveError::ContradictingModuloParameters(_))
            | ServerError::Solve(SolveError::Consistency(_))
            | ServerError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        error!(error = %self, "request failed");
        (
            status,
            axum::Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
