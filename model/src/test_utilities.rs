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

//! Small hand-made networks shared by the tests of all crates.

use std::sync::Arc;

use crate::base_types::{ActivityKind, Cost, Time};
use crate::network::{ActivityRecord, EventRecord, Network, NetworkOptions};

pub type TestActivity<'a> = (&'a str, ActivityKind, &'a str, &'a str, Time, Time, Cost);

pub fn build_network(
    period: Time,
    events: &[&str],
    activities: &[TestActivity],
    options: &NetworkOptions,
) -> Arc<Network> {
    let event_records = events.iter().map(|id| EventRecord::new(id)).collect();
    let activity_records = activities
        .iter()
        .map(|&(id, kind, tail, head, lower, upper, weight)| {
            ActivityRecord::new(id, kind, tail, head, lower, upper, weight)
        })
        .collect();
    Arc::new(
        Network::from_records(period, event_records, activity_records, options)
            .expect("test network must be valid"),
    )
}

/// Two events, one drive activity with bounds [2, 5], period 10, weight 1.
pub fn two_event_network() -> Arc<Network> {
    build_network(
        10,
        &["dep", "arr"],
        &[("drive", ActivityKind::Drive, "dep", "arr", 2, 5, 1)],
        &NetworkOptions::default(),
    )
}

/// A triangle whose non-tree activity admits exactly one slack value.
pub fn rigid_triangle_network() -> Arc<Network> {
    build_network(
        10,
        &["e0", "e1", "e2"],
        &[
            ("a01", ActivityKind::Drive, "e0", "e1", 2, 2, 5),
            ("a12", ActivityKind::Wait, "e1", "e2", 3, 3, 5),
            ("a02", ActivityKind::Change, "e0", "e2", 5, 5, 5),
        ],
        &NetworkOptions::default(),
    )
}

/// Two lines sharing a transfer, with headways and a turnaround. Feasible, not rigid.
pub fn two_line_network() -> Arc<Network> {
    build_network(
        10,
        &["l1_dep_a", "l1_arr_b", "l1_dep_b", "l1_arr_c", "l2_dep_b", "l2_arr_d"],
        &[
            ("drive_ab", ActivityKind::Drive, "l1_dep_a", "l1_arr_b", 3, 5, 10),
            ("wait_b", ActivityKind::Wait, "l1_arr_b", "l1_dep_b", 1, 3, 10),
            ("drive_bc", ActivityKind::Drive, "l1_dep_b", "l1_arr_c", 2, 4, 10),
            ("change_b", ActivityKind::Change, "l1_arr_b", "l2_dep_b", 2, 8, 5),
            ("drive_bd", ActivityKind::Drive, "l2_dep_b", "l2_arr_d", 4, 6, 8),
            ("turn_d", ActivityKind::Turnaround, "l2_arr_d", "l1_dep_a", 3, 12, 1),
            ("headway_1", ActivityKind::Headway, "l1_dep_a", "l2_dep_b", 2, 8, 0),
            ("headway_2", ActivityKind::Headway, "l2_dep_b", "l1_dep_a", 2, 8, 0),
        ],
        &NetworkOptions::default(),
    )
}

/// Two parallel activities whose bounds can never be met simultaneously modulo the period.
pub fn contradicting_network() -> Arc<Network> {
    build_network(
        10,
        &["e0", "e1"],
        &[
            ("early", ActivityKind::Drive, "e0", "e1", 0, 2, 1),
            ("late", ActivityKind::Drive, "e0", "e1", 5, 7, 1),
        ],
        &NetworkOptions::default(),
    )
}

/// A triangle whose only feasible timetables put "b" 8 after "a": heavy slack is forced on "ab".
/// Timing all events at 0 violates "bc".
pub fn forced_slack_triangle() -> Arc<Network> {
    build_network(
        10,
        &["a", "b", "c"],
        &[
            ("ab", ActivityKind::Drive, "a", "b", 0, 9, 100),
            ("ac", ActivityKind::Change, "a", "c", 0, 0, 1),
            ("bc", ActivityKind::Wait, "b", "c", 2, 2, 1),
        ],
        &NetworkOptions::default(),
    )
}
