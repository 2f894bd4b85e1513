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

pub mod activity;
pub mod event;

pub use activity::{Activity, ActivityRecord};
pub use event::{Event, EventRecord};

use std::collections::{HashMap, VecDeque};
use std::fmt;

use tracing::warn;

use crate::base_types::{ActivityIdx, ActivityKind, Cost, EventIdx, Time};
use crate::error::ModelError;

pub struct NetworkOptions {
    pub include_headways: bool,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        NetworkOptions {
            include_headways: true,
        }
    }
}

/// The periodic event-activity network. Events and activities live in arenas and are referred to
/// by their index. Once built, the network never changes.
#[derive(Debug)]
pub struct Network {
    period: Time,
    events: Vec<Event>,
    activities: Vec<Activity>,

    // for each event the activities leaving / entering it
    outgoing: Vec<Vec<ActivityIdx>>,
    incoming: Vec<Vec<ActivityIdx>>,

    event_by_id: HashMap<String, EventIdx>,

    // redundant information
    connector_count: usize,
    total_weight: Cost,
}

// methods
impl Network {
    pub fn period(&self) -> Time {
        self.period
    }

    pub fn number_of_events(&self) -> usize {
        self.events.len()
    }

    pub fn number_of_activities(&self) -> usize {
        self.activities.len()
    }

    pub fn event(&self, idx: EventIdx) -> &Event {
        &self.events[idx.idx()]
    }

    pub fn activity(&self, idx: ActivityIdx) -> &Activity {
        &self.activities[idx.idx()]
    }

    pub fn events(&self) -> impl Iterator<Item = EventIdx> + '_ {
        (0..self.events.len()).map(EventIdx::from)
    }

    pub fn activities(&self) -> impl Iterator<Item = ActivityIdx> + '_ {
        (0..self.activities.len()).map(ActivityIdx::from)
    }

    pub fn outgoing(&self, event: EventIdx) -> impl Iterator<Item = ActivityIdx> + '_ {
        self.outgoing[event.idx()].iter().copied()
    }

    pub fn incoming(&self, event: EventIdx) -> impl Iterator<Item = ActivityIdx> + '_ {
        self.incoming[event.idx()].iter().copied()
    }

    /// all activities with the event as tail or head (self-loops appear twice)
    pub fn incident(&self, event: EventIdx) -> impl Iterator<Item = ActivityIdx> + '_ {
        self.outgoing(event).chain(self.incoming(event))
    }

    pub fn event_idx_of(&self, id: &str) -> Option<EventIdx> {
        self.event_by_id.get(id).copied()
    }

    /// number of zero-weight activities added to connect the components of the input
    pub fn connector_count(&self) -> usize {
        self.connector_count
    }

    /// sum of absolute weights, an upper bound for every flow the non-periodic problem needs
    pub fn total_weight(&self) -> Cost {
        self.total_weight
    }

    /// weighted in-degree minus weighted out-degree
    pub fn demand_of(&self, event: EventIdx) -> Cost {
        let inflow: Cost = self
            .incoming(event)
            .map(|a| self.activity(a).weight())
            .sum();
        let outflow: Cost = self
            .outgoing(event)
            .map(|a| self.activity(a).weight())
            .sum();
        inflow - outflow
    }
}

// static functions
impl Network {
    /// Builds the network from parsed records.
    ///
    /// Dangling event references, a non-positive period and inverted bounds are rejected.
    /// Headway activities are dropped if configured so, which is refused if one of them carries
    /// weight. Disconnected inputs are chained together by zero-weight connector activities with
    /// bounds [0, 0], one per additional component, in discovery order.
    pub fn from_records(
        period: Time,
        event_records: Vec<EventRecord>,
        activity_records: Vec<ActivityRecord>,
        options: &NetworkOptions,
    ) -> Result<Network, ModelError> {
        if period <= 0 {
            return Err(ModelError::NonPositivePeriod(period));
        }

        let mut event_by_id: HashMap<String, EventIdx> = HashMap::new();
        let mut events: Vec<Event> = Vec::with_capacity(event_records.len());
        for record in event_records {
            let idx = EventIdx::from(events.len());
            if event_by_id.insert(record.id.clone(), idx).is_some() {
                return Err(ModelError::DuplicateEvent(record.id));
            }
            events.push(Event::new(idx, record.id));
        }

        let mut activities: Vec<Activity> = Vec::with_capacity(activity_records.len());
        for record in activity_records {
            let tail = *event_by_id
                .get(&record.tail)
                .ok_or_else(|| ModelError::UnknownEvent {
                    activity: record.id.clone(),
                    event: record.tail.clone(),
                })?;
            let head = *event_by_id
                .get(&record.head)
                .ok_or_else(|| ModelError::UnknownEvent {
                    activity: record.id.clone(),
                    event: record.head.clone(),
                })?;
            if record.upper_bound < record.lower_bound {
                return Err(ModelError::InvalidBounds {
                    activity: record.id,
                    lower: record.lower_bound,
                    upper: record.upper_bound,
                });
            }

            if record.kind.is_headway() && !options.include_headways {
                if record.weight != 0 {
                    return Err(ModelError::WeightedHeadwayExcluded {
                        activity: record.id,
                        weight: record.weight,
                    });
                }
                continue;
            }

            if record.upper_bound - record.lower_bound >= period {
                warn!(
                    "activity {} has span {} which is not below the period {}",
                    record.id,
                    record.upper_bound - record.lower_bound,
                    period
                );
            }

            activities.push(Activity::new(
                ActivityIdx::from(activities.len()),
                record.id,
                record.kind,
                tail,
                head,
                record.lower_bound,
                record.upper_bound,
                record.weight,
                record.robustness,
            ));
        }

        let mut network = Network::assemble(period, events, activities, event_by_id);
        network.connect_components();
        Ok(network)
    }

    fn assemble(
        period: Time,
        events: Vec<Event>,
        activities: Vec<Activity>,
        event_by_id: HashMap<String, EventIdx>,
    ) -> Network {
        let mut network = Network {
            period,
            outgoing: vec![Vec::new(); events.len()],
            incoming: vec![Vec::new(); events.len()],
            events,
            activities: Vec::with_capacity(activities.len()),
            event_by_id,
            connector_count: 0,
            total_weight: 0,
        };
        for activity in activities {
            network.push_activity(activity);
        }
        network
    }

    fn push_activity(&mut self, activity: Activity) {
        self.outgoing[activity.tail().idx()].push(activity.idx());
        self.incoming[activity.head().idx()].push(activity.idx());
        self.total_weight += activity.weight().abs();
        self.activities.push(activity);
    }

    /// Returns the connected components of the undirected skeleton, ordered by the smallest
    /// event index they contain. Within a component events are in breadth-first order.
    pub fn connected_components(&self) -> Vec<Vec<EventIdx>> {
        let mut visited = vec![false; self.events.len()];
        let mut components = Vec::new();
        for start in self.events() {
            if visited[start.idx()] {
                continue;
            }
            visited[start.idx()] = true;
            let mut component = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(event) = queue.pop_front() {
                for a in self.incident(event) {
                    let other = self.activity(a).other_end(event);
                    if !visited[other.idx()] {
                        visited[other.idx()] = true;
                        component.push(other);
                        queue.push_back(other);
                    }
                }
            }
            components.push(component);
        }
        components
    }

    fn connect_components(&mut self) {
        let components = self.connected_components();
        if components.len() <= 1 {
            return;
        }
        warn!(
            "network consists of {} connected components; chaining them by {} connector activities",
            components.len(),
            components.len() - 1
        );
        let representatives: Vec<EventIdx> = components.iter().map(|c| c[0]).collect();
        for (counter, pair) in representatives.windows(2).enumerate() {
            let connector = Activity::new(
                ActivityIdx::from(self.activities.len()),
                format!("connector_{}", counter + 1),
                ActivityKind::Connector,
                pair[0],
                pair[1],
                0,
                0,
                0,
                0,
            );
            self.push_activity(connector);
            self.connector_count += 1;
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "periodic network (period {}) with {} events and {} activities ({} connectors)",
            self.period,
            self.events.len(),
            self.activities.len(),
            self.connector_count
        )
    }
}
