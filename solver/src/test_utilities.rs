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

use model::base_types::{ActivityKind, Time};
use model::network::{ActivityRecord, EventRecord, Network, NetworkOptions};
use model::timetable::Timetable;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use solution::Tableau;

use crate::non_periodic::tableau_from_timetable;

/// A random network for which the returned timetable is feasible. A path through all events is
/// laid first, further activities connect random pairs. Spans stay below half the period.
pub fn random_feasible_network(
    seed: u64,
    events: usize,
    activities: usize,
    period: Time,
) -> (Arc<Network>, Timetable) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let times: Vec<Time> = (0..events).map(|_| rng.gen_range(0..period)).collect();
    let event_records = (0..events)
        .map(|i| EventRecord::new(&format!("e{}", i)))
        .collect();

    let kinds = [ActivityKind::Drive, ActivityKind::Wait, ActivityKind::Change];
    let mut activity_records = Vec::new();
    for k in 0..activities {
        let (tail, head) = if k + 1 < events {
            (k, k + 1)
        } else {
            let tail = rng.gen_range(0..events);
            (tail, (tail + rng.gen_range(1..events)) % events)
        };
        let duration = (times[head] - times[tail]).rem_euclid(period);
        let lower = duration - rng.gen_range(0..=duration.min(period / 4));
        let upper = duration + rng.gen_range(0..=period / 4);
        let mut record = ActivityRecord::new(
            &format!("a{}", k),
            kinds[rng.gen_range(0..kinds.len())],
            &format!("e{}", tail),
            &format!("e{}", head),
            lower,
            upper,
            rng.gen_range(0..20),
        );
        record.robustness = rng.gen_range(0..3);
        activity_records.push(record);
    }

    let network = Network::from_records(
        period,
        event_records,
        activity_records,
        &NetworkOptions::default(),
    )
    .unwrap();
    (Arc::new(network), Timetable::new(times, period))
}

pub fn random_tableau(seed: u64) -> Tableau {
    let (network, timetable) = random_feasible_network(seed, 12, 30, 20);
    tableau_from_timetable(&network, &timetable).unwrap()
}
