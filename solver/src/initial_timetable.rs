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

use std::collections::VecDeque;

use model::base_types::{Cost, EventIdx, Time};
use model::network::Network;
use model::timetable::Timetable;
use tracing::debug;

/// Times the events greedily in breadth-first order.
///
/// The first event of every component gets time 0. Every further event chooses among the times
/// that put one of its activities to an already timed event at a bound: fewest violated
/// activities first, then least weighted slack, then the earliest time.
/// The result is not necessarily feasible.
pub fn greedy_timetable(network: &Network) -> Timetable {
    let period = network.period();
    let events = network.number_of_events();
    let mut times: Vec<Option<Time>> = vec![None; events];

    for component in network.connected_components() {
        let mut queue = VecDeque::new();
        for &event in component.iter().take(1) {
            times[event.idx()] = Some(0);
            queue.push_back(event);
        }
        while let Some(event) = queue.pop_front() {
            for a in network.incident(event) {
                let next = network.activity(a).other_end(event);
                if times[next.idx()].is_some() {
                    continue;
                }
                times[next.idx()] = Some(best_time(network, &times, next));
                queue.push_back(next);
            }
        }
    }

    let timetable = Timetable::new(times.into_iter().map(|t| t.unwrap_or(0)).collect(), period);
    debug!(
        "greedy timetable violates {} activities",
        timetable.violated_activities(network).count()
    );
    timetable
}

fn best_time(network: &Network, times: &[Option<Time>], event: EventIdx) -> Time {
    let period = network.period();
    let mut candidates: Vec<Time> = Vec::new();
    for a in network.incident(event) {
        let activity = network.activity(a);
        if activity.is_loop() {
            continue;
        }
        let other = activity.other_end(event);
        let Some(other_time) = times[other.idx()] else {
            continue;
        };
        for bound in [activity.lower(), activity.upper()] {
            let time = if activity.head() == event {
                other_time + bound
            } else {
                other_time - bound
            };
            candidates.push(time.rem_euclid(period));
        }
    }

    candidates
        .into_iter()
        .map(|time| (evaluate_time(network, times, event, time), time))
        .min()
        .map_or(0, |(_, time)| time)
}

/// (violated activities, weighted slack) towards the timed neighbours
fn evaluate_time(
    network: &Network,
    times: &[Option<Time>],
    event: EventIdx,
    time: Time,
) -> (usize, Cost) {
    let period = network.period();
    let mut violations = 0;
    let mut weighted_slack = 0;
    for a in network.incident(event) {
        let activity = network.activity(a);
        if activity.is_loop() {
            continue;
        }
        let Some(other_time) = times[activity.other_end(event).idx()] else {
            continue;
        };
        let (tail_time, head_time) = if activity.head() == event {
            (other_time, time)
        } else {
            (time, other_time)
        };
        let slack = (head_time - tail_time - activity.lower()).rem_euclid(period);
        if slack > activity.span() {
            violations += 1;
        } else {
            weighted_slack += activity.weight() * slack;
        }
    }
    (violations, weighted_slack)
}

#[cfg(test)]
mod tests {
    use model::base_types::EventIdx;
    use model::test_utilities::{rigid_triangle_network, two_event_network};

    use super::greedy_timetable;

    #[test]
    fn rigid_triangle_is_timed_exactly() {
        let network = rigid_triangle_network();
        let timetable = greedy_timetable(&network);
        assert_eq!(timetable.time(EventIdx(0)), 0);
        assert_eq!(timetable.time(EventIdx(1)), 2);
        assert_eq!(timetable.time(EventIdx(2)), 5);
        assert_eq!(timetable.weighted_slack(&network), 0);
    }

    #[test]
    fn neighbour_is_placed_at_the_lower_bound() {
        let network = two_event_network();
        let timetable = greedy_timetable(&network);
        assert!(timetable.is_feasible(&network));
        assert_eq!(timetable.time(EventIdx(1)), 2);
    }
}
