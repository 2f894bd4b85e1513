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

use std::fmt;

use crate::base_types::{ActivityIdx, ActivityKind, Cost, EventIdx, Time};

/// An activity record as delivered by the parser; tail and head are event ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityRecord {
    pub id: String,
    pub kind: ActivityKind,
    pub tail: String,
    pub head: String,
    pub lower_bound: Time,
    pub upper_bound: Time,
    pub weight: Cost,
    pub robustness: Cost,
}

impl ActivityRecord {
    pub fn new(
        id: &str,
        kind: ActivityKind,
        tail: &str,
        head: &str,
        lower_bound: Time,
        upper_bound: Time,
        weight: Cost,
    ) -> ActivityRecord {
        ActivityRecord {
            id: String::from(id),
            kind,
            tail: String::from(tail),
            head: String::from(head),
            lower_bound,
            upper_bound,
            weight,
            robustness: 0,
        }
    }
}

/// A periodic activity from tail to head. Its duration must lie in [lower, upper] modulo the
/// period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Activity {
    idx: ActivityIdx,
    id: String,
    kind: ActivityKind,
    tail: EventIdx,
    head: EventIdx,
    lower: Time,
    upper: Time,
    weight: Cost,
    robustness: Cost,
}

impl Activity {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        idx: ActivityIdx,
        id: String,
        kind: ActivityKind,
        tail: EventIdx,
        head: EventIdx,
        lower: Time,
        upper: Time,
        weight: Cost,
        robustness: Cost,
    ) -> Activity {
        Activity {
            idx,
            id,
            kind,
            tail,
            head,
            lower,
            upper,
            weight,
            robustness,
        }
    }

    pub fn idx(&self) -> ActivityIdx {
        self.idx
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    pub fn tail(&self) -> EventIdx {
        self.tail
    }

    pub fn head(&self) -> EventIdx {
        self.head
    }

    /// returns the endpoint that is not the given one (for self-loops the event itself)
    pub fn other_end(&self, event: EventIdx) -> EventIdx {
        if self.tail == event {
            self.head
        } else {
            self.tail
        }
    }

    pub fn is_loop(&self) -> bool {
        self.tail == self.head
    }

    pub fn lower(&self) -> Time {
        self.lower
    }

    pub fn upper(&self) -> Time {
        self.upper
    }

    /// upper - lower, the largest slack the activity admits
    pub fn span(&self) -> Time {
        self.upper - self.lower
    }

    pub fn weight(&self) -> Cost {
        self.weight
    }

    pub fn robustness(&self) -> Cost {
        self.robustness
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}->{}, [{}, {}], w={})",
            self.id, self.kind, self.tail, self.head, self.lower, self.upper, self.weight
        )
    }
}
