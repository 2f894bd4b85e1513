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

use model::base_types::Cost;
use model::config::Config;
use model::network::Network;
use model::timetable::Timetable;
use solution::json_serialisation::write_solution_to_json;
use solution::{Basis, ObjectiveValue, Tableau};
use tracing::{debug, warn};

/// A feasible solution seen during the run.
#[derive(Clone, Debug)]
pub struct Checkpoint {
    pub basis: Basis,
    pub timetable: Timetable,
    pub objective_value: ObjectiveValue,
    pub robustness_ok: bool,
}

impl Checkpoint {
    fn of(tableau: &Tableau, minimum_robustness: Option<Cost>) -> Checkpoint {
        Checkpoint {
            basis: tableau.basis().clone(),
            timetable: tableau.timetable(),
            objective_value: ObjectiveValue::of(tableau),
            robustness_ok: minimum_robustness.map_or(true, |m| tableau.robustness() >= m),
        }
    }

    /// solutions meeting the robustness threshold first, then by objective
    fn rank(&self) -> (bool, Cost) {
        (!self.robustness_ok, self.objective_value.weighted_slack)
    }
}

/// Keeps the best solution in memory and writes it to disk every `interval` pivots if it
/// changed. Writing is best-effort.
pub struct CheckpointStore {
    best: Option<Checkpoint>,
    minimum_robustness: Option<Cost>,
    path: Option<PathBuf>,
    interval: u64,
    unwritten: bool,
    last_write: u64,
}

impl CheckpointStore {
    pub fn new(config: &Config) -> CheckpointStore {
        CheckpointStore {
            best: None,
            minimum_robustness: config.minimum_robustness,
            path: config.checkpoint.path.clone(),
            interval: config.checkpoint.interval.max(1),
            unwritten: false,
            last_write: 0,
        }
    }

    fn rank_of(&self, tableau: &Tableau) -> (bool, Cost) {
        let robustness_ok = self
            .minimum_robustness
            .map_or(true, |m| tableau.robustness() >= m);
        (!robustness_ok, tableau.objective())
    }

    /// true if the tableau is strictly better than the best checkpoint
    pub fn is_better(&self, tableau: &Tableau) -> bool {
        self.best
            .as_ref()
            .map_or(true, |best| self.rank_of(tableau) < best.rank())
    }

    /// true if the best checkpoint is strictly better than the tableau
    pub fn beats(&self, tableau: &Tableau) -> bool {
        self.best
            .as_ref()
            .map_or(false, |best| best.rank() < self.rank_of(tableau))
    }

    /// Stores the tableau if it is strictly better. Returns whether it was stored.
    pub fn record(&mut self, tableau: &Tableau) -> bool {
        if !self.is_better(tableau) {
            return false;
        }
        self.best = Some(Checkpoint::of(tableau, self.minimum_robustness));
        self.unwritten = true;
        true
    }

    /// Writes the best checkpoint if a path is configured, it changed since the last write and
    /// at least `interval` pivots passed.
    pub fn write_if_due(&mut self, network: &Network, pivots: u64) {
        if !self.unwritten || pivots < self.last_write + self.interval {
            return;
        }
        let (Some(path), Some(best)) = (&self.path, &self.best) else {
            return;
        };
        let statistics = serde_json::json!({ "pivots": pivots });
        match write_solution_to_json(
            network,
            &best.timetable,
            &best.objective_value,
            statistics,
            &path.to_string_lossy(),
        ) {
            Ok(()) => {
                debug!(
                    "checkpoint with objective {} written to {}",
                    best.objective_value.weighted_slack,
                    path.display()
                );
                self.unwritten = false;
                self.last_write = pivots;
            }
            Err(err) => {
                warn!("writing checkpoint to {} failed: {}", path.display(), err);
                self.last_write = pivots;
            }
        }
    }

    pub fn best(&self) -> Option<&Checkpoint> {
        self.best.as_ref()
    }

    pub fn into_best(self) -> Option<Checkpoint> {
        self.best
    }
}

#[cfg(test)]
mod tests {
    use model::config::Config;
    use model::test_utilities::two_event_network;
    use model::timetable::Timetable;
    use solution::Tableau;

    use super::CheckpointStore;
    use crate::non_periodic::tableau_from_timetable;

    fn optimal_tableau() -> Tableau {
        let network = two_event_network();
        tableau_from_timetable(&network, &Timetable::new(vec![0, 4], 10)).unwrap()
    }

    #[test]
    fn robust_solutions_rank_first() {
        // ARRANGE: the drive has robustness 0, so any positive threshold fails
        let mut config = Config::default();
        config.minimum_robustness = Some(1);
        let mut store = CheckpointStore::new(&config);
        let tableau = optimal_tableau();

        // ACT & ASSERT
        assert!(store.record(&tableau));
        assert!(!store.record(&tableau));
        assert!(!store.best().unwrap().robustness_ok);
        assert!(!store.beats(&tableau));
    }

    #[test]
    fn best_checkpoint_is_written_when_due() {
        // ARRANGE
        let path = std::env::temp_dir().join(format!("checkpoint_{}.json", std::process::id()));
        let mut config = Config::default();
        config.checkpoint.path = Some(path.clone());
        config.checkpoint.interval = 2;
        let mut store = CheckpointStore::new(&config);
        let network = two_event_network();
        store.record(&optimal_tableau());

        // ACT
        store.write_if_due(&network, 1);
        let written_early = path.exists();
        store.write_if_due(&network, 2);

        // ASSERT
        assert!(!written_early);
        let json: serde_json::Value =
            serde_json::from_reader(std::fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(json["objectiveValue"]["weightedSlack"], 0);
        assert_eq!(json["statistics"]["pivots"], 2);
        std::fs::remove_file(&path).unwrap();
    }
}
