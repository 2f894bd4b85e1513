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

use derive_more::Display;
use serde::{Deserialize, Serialize};

pub type Idx = u32;

/// Points in time and durations. Event times live in [0, period).
pub type Time = i64;
/// Passenger weights and everything that is weight times duration.
pub type Cost = i64;
/// Number of full periods folded into a potential difference.
pub type ModuloParameter = i64;

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventIdx(pub Idx);

impl EventIdx {
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for EventIdx {
    fn from(idx: usize) -> Self {
        EventIdx(idx as Idx)
    }
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActivityIdx(pub Idx);

impl ActivityIdx {
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for ActivityIdx {
    fn from(idx: usize) -> Self {
        ActivityIdx(idx as Idx)
    }
}

/// The label of an activity. The solver only asks whether an activity is a headway (may be
/// excluded), a waiting activity (waiting-edge cuts) or a connector added by the model itself.
#[derive(Display, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ActivityKind {
    #[display(fmt = "drive")]
    Drive,
    #[display(fmt = "wait")]
    Wait,
    #[display(fmt = "change")]
    Change,
    #[display(fmt = "headway")]
    Headway,
    #[display(fmt = "sync")]
    #[serde(alias = "synchronization")]
    Sync,
    #[display(fmt = "turnaround")]
    Turnaround,
    #[display(fmt = "connector")]
    Connector,
}

impl ActivityKind {
    pub fn is_headway(self) -> bool {
        matches!(self, ActivityKind::Headway)
    }

    pub fn is_wait(self) -> bool {
        matches!(self, ActivityKind::Wait)
    }

    pub fn is_connector(self) -> bool {
        matches!(self, ActivityKind::Connector)
    }
}
