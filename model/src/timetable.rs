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

use crate::base_types::{ActivityIdx, Cost, EventIdx, Time};
use crate::network::Network;

/// One time in [0, period) per event, indexed by event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timetable {
    times: Vec<Time>,
}

impl Timetable {
    /// Reduces all times modulo the period.
    pub fn new(times: Vec<Time>, period: Time) -> Timetable {
        Timetable {
            times: times.into_iter().map(|t| t.rem_euclid(period)).collect(),
        }
    }

    pub fn time(&self, event: EventIdx) -> Time {
        self.times[event.idx()]
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EventIdx, Time)> + '_ {
        self.times
            .iter()
            .enumerate()
            .map(|(i, &t)| (EventIdx::from(i), t))
    }

    /// (head - tail - lower) mod period, the smallest admissible slack of the activity.
    pub fn slack_of(&self, network: &Network, activity: ActivityIdx) -> Time {
        let a = network.activity(activity);
        (self.time(a.head()) - self.time(a.tail()) - a.lower()).rem_euclid(network.period())
    }

    /// activities whose smallest slack exceeds their span
    pub fn violated_activities<'a>(
        &'a self,
        network: &'a Network,
    ) -> impl Iterator<Item = ActivityIdx> + 'a {
        network
            .activities()
            .filter(move |&a| self.slack_of(network, a) > network.activity(a).span())
    }

    pub fn is_feasible(&self, network: &Network) -> bool {
        self.violated_activities(network).next().is_none()
    }

    /// sum of weight * slack over all activities
    pub fn weighted_slack(&self, network: &Network) -> Cost {
        network
            .activities()
            .map(|a| network.activity(a).weight() * self.slack_of(network, a))
            .sum()
    }
}
