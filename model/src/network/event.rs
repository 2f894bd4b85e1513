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

use crate::base_types::{EventIdx, Time};

/// An event record as delivered by the parser. `time` is set when resuming from a timetable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventRecord {
    pub id: String,
    pub time: Option<Time>,
}

impl EventRecord {
    pub fn new(id: &str) -> EventRecord {
        EventRecord {
            id: String::from(id),
            time: None,
        }
    }
}

/// A periodic event. Its time is not stored here: it is read out of the node potentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    idx: EventIdx,
    id: String,
}

impl Event {
    pub(crate) fn new(idx: EventIdx, id: String) -> Event {
        Event { idx, id }
    }

    pub fn idx(&self) -> EventIdx {
        self.idx
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
