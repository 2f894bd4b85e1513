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

use model::base_types::{ActivityIdx, ModuloParameter, Time};
use model::network::Network;
use model::timetable::Timetable;

/// The number of full periods folded into every activity's potential difference.
///
/// Fixing them turns the periodic problem into a non-periodic one: with potentials
/// unrolled, activity (i, j) requires pi_j - pi_i in [lower + z * T, upper + z * T].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModuloAssignment {
    modulo_parameters: Vec<ModuloParameter>,
}

impl ModuloAssignment {
    pub fn new(modulo_parameters: Vec<ModuloParameter>) -> ModuloAssignment {
        ModuloAssignment { modulo_parameters }
    }

    /// Chooses for every activity the modulo parameter that puts its duration into
    /// [lower, upper]. If the timetable violates the activity, the parameter with the smaller
    /// violation is taken.
    pub fn from_timetable(network: &Network, timetable: &Timetable) -> ModuloAssignment {
        let period = network.period();
        let modulo_parameters = network
            .activities()
            .map(|a| {
                let activity = network.activity(a);
                let difference = timetable.time(activity.head()) - timetable.time(activity.tail());
                let excess = difference - activity.lower();
                let slack = excess.rem_euclid(period);
                let z = (excess - slack) / period;
                if slack <= activity.span() {
                    z
                } else if period - slack < slack - activity.span() {
                    // duration lower + slack - T undershoots less than lower + slack overshoots
                    z + 1
                } else {
                    z
                }
            })
            .collect();
        ModuloAssignment { modulo_parameters }
    }

    pub fn modulo_parameter(&self, activity: ActivityIdx) -> ModuloParameter {
        self.modulo_parameters[activity.idx()]
    }

    /// copy with the modulo parameter of one activity replaced
    pub fn with_modulo_parameter(
        &self,
        activity: ActivityIdx,
        modulo_parameter: ModuloParameter,
    ) -> ModuloAssignment {
        let mut modulo_parameters = self.modulo_parameters.clone();
        modulo_parameters[activity.idx()] = modulo_parameter;
        ModuloAssignment { modulo_parameters }
    }

    pub fn len(&self) -> usize {
        self.modulo_parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modulo_parameters.is_empty()
    }

    /// bounds on pi_head - pi_tail in the unrolled problem
    pub fn shifted_bounds(&self, network: &Network, activity: ActivityIdx) -> (Time, Time) {
        let a = network.activity(activity);
        let shift = self.modulo_parameter(activity) * network.period();
        (a.lower() + shift, a.upper() + shift)
    }
}
