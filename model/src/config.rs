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
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::base_types::Cost;

#[derive(Clone, Debug)]
pub struct Config {
    pub include_headways: bool,
    pub pivot: ConfigPivot,
    pub local_cut: ConfigLocalCut,
    pub limits: ConfigLimits,
    pub minimum_robustness: Option<Cost>,
    pub checkpoint: ConfigCheckpoint,
    pub seed: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PivotStrategy {
    Steepest,
    Fastest,
    Percentage,
    SimulatedAnnealing,
    TabuSearch,
    Hybrid,
}

#[derive(Clone, Debug)]
pub struct ConfigPivot {
    pub strategy: PivotStrategy,
    /// an improving pivot must gain at least this fraction of the current objective
    pub minimum_improvement: f64,
    /// fraction of the candidates scanned by the percentage rule before it settles
    pub percentage: f64,
    pub tabu_length: usize,
    pub tabu_max_non_improving: usize,
    pub annealing: ConfigAnnealing,
}

#[derive(Clone, Debug)]
pub struct ConfigAnnealing {
    pub temperature: f64,
    pub cooling_factor: f64,
    pub min_temperature: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LocalCutStrategy {
    SingleNode,
    RandomNode,
    WaitingEdge,
    ConnectedRegion,
    Combined,
    None,
}

#[derive(Clone, Debug)]
pub struct ConfigLocalCut {
    pub strategy: LocalCutStrategy,
    pub random_node_sample: usize,
    pub region_seeds: usize,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigLimits {
    /// maximal number of accepted pivots, None means unlimited
    pub iterations: Option<u64>,
    pub time: Option<Duration>,
}

#[derive(Clone, Debug)]
pub struct ConfigCheckpoint {
    /// number of pivots between two checkpoint writes
    pub interval: u64,
    pub path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            include_headways: true,
            pivot: ConfigPivot {
                strategy: PivotStrategy::Steepest,
                minimum_improvement: 0.0,
                percentage: 0.5,
                tabu_length: 100,
                tabu_max_non_improving: 50,
                annealing: ConfigAnnealing {
                    temperature: 100.0,
                    cooling_factor: 0.95,
                    min_temperature: 0.1,
                },
            },
            local_cut: ConfigLocalCut {
                strategy: LocalCutStrategy::SingleNode,
                random_node_sample: 10,
                region_seeds: 5,
            },
            limits: ConfigLimits::default(),
            minimum_robustness: None,
            checkpoint: ConfigCheckpoint {
                interval: 100,
                path: None,
            },
            seed: 0,
        }
    }
}
