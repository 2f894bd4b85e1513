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

use itertools::assert_equal;
use model::base_types::{ActivityIdx, EventIdx};
use model::network::Network;
use model::test_utilities::{
    contradicting_network, rigid_triangle_network, two_event_network, two_line_network,
};

use crate::basis::Basis;
use crate::error::TableauError;
use crate::modulo_assignment::ModuloAssignment;
use crate::tableau::Tableau;

fn a(idx: u32) -> ActivityIdx {
    ActivityIdx(idx)
}

/// drive_ab, wait_b, drive_bc, change_b and drive_bd at their lower bounds.
fn two_line_tableau(network: &Arc<Network>) -> Tableau {
    let basis = Basis::from_tree_edges(
        network,
        [(a(0), true), (a(1), true), (a(2), true), (a(3), true), (a(4), true)],
    )
    .unwrap();
    Tableau::build(network.clone(), basis).unwrap()
}

fn assert_consistent(tableau: &Tableau) {
    let network = tableau.network();
    let period = network.period();
    for activity_idx in network.activities() {
        let activity = network.activity(activity_idx);
        let slack = tableau.slack(activity_idx);
        assert!(slack >= 0 && slack <= activity.span(), "{}", activity);
        match tableau.basis().at_lower(activity_idx) {
            Some(true) => assert_eq!(slack, 0),
            Some(false) => assert_eq!(slack, activity.span()),
            None => {}
        }
        assert_eq!(
            tableau.potential(activity.head()) - tableau.potential(activity.tail()),
            activity.lower() + slack + tableau.modulo_parameter(activity_idx) * period
        );
    }
    for event in network.events() {
        assert!((0..period).contains(&tableau.potential(event)));
    }
}

#[test]
fn two_event_network_at_lower_and_at_upper() {
    // ARRANGE
    let network = two_event_network();

    // ACT
    let at_lower = Tableau::build(
        network.clone(),
        Basis::from_tree_edges(&network, [(a(0), true)]).unwrap(),
    )
    .unwrap();
    let at_upper = Tableau::build(
        network.clone(),
        Basis::from_tree_edges(&network, [(a(0), false)]).unwrap(),
    )
    .unwrap();

    // ASSERT
    assert_eq!(at_lower.potential(EventIdx(1)), 2);
    assert_eq!(at_lower.slack(a(0)), 0);
    assert_eq!(at_lower.objective(), 0);
    assert_eq!(at_upper.potential(EventIdx(1)), 5);
    assert_eq!(at_upper.slack(a(0)), 3);
    assert_eq!(at_upper.objective(), 3);
    assert_consistent(&at_lower);
    assert_consistent(&at_upper);
}

#[test]
fn two_line_network_values() {
    // ACT
    let network = two_line_network();
    let tableau = two_line_tableau(&network);

    // ASSERT
    assert_equal(
        network.events().map(|e| tableau.potential(e)),
        [0, 3, 4, 6, 5, 9],
    );
    // turn_d, headway_1, headway_2
    assert_eq!(tableau.slack(a(5)), 8);
    assert_eq!(tableau.modulo_parameter(a(5)), -2);
    assert_eq!(tableau.slack(a(6)), 3);
    assert_eq!(tableau.slack(a(7)), 3);
    assert_eq!(tableau.modulo_parameter(a(7)), -1);
    assert_eq!(tableau.objective(), 8);
    assert_eq!(tableau.robustness(), 0);
    assert_eq!(
        tableau.weighted_duration(),
        10 * 3 + 10 + 10 * 2 + 5 * 2 + 8 * 4 + 11
    );
    assert_consistent(&tableau);
}

#[test]
fn cycles_and_rows() {
    // ARRANGE
    let network = rigid_triangle_network();
    let basis = Basis::from_tree_edges(&network, [(a(0), true), (a(1), true)]).unwrap();

    // ACT
    let tableau = Tableau::build(network, basis).unwrap();

    // ASSERT
    // a02 runs e0 -> e2, its cycle goes back e2 -> e1 -> e0 against both tree edges
    assert_equal(tableau.cycle(a(2)).iter().copied(), [(a(1), -1), (a(0), -1)]);
    assert_equal(tableau.row(a(0)).iter().copied(), [(a(2), -1)]);
    assert_equal(tableau.row(a(1)).iter().copied(), [(a(2), -1)]);
    assert!(tableau.cycle(a(0)).is_empty());
    assert_eq!(tableau.slack(a(2)), 0);
    assert_eq!(tableau.objective(), 0);
}

#[test]
fn potential_differences_sum_to_zero_along_every_cycle() {
    // ARRANGE
    let network = two_line_network();
    let tableau = two_line_tableau(&network);
    let period = network.period();
    let difference = |activity_idx: ActivityIdx| {
        tableau.tension(activity_idx) + tableau.modulo_parameter(activity_idx) * period
    };

    // ACT & ASSERT
    for g in tableau.non_tree_edges() {
        let along_tree: i64 = tableau
            .cycle(g)
            .iter()
            .map(|&(f, coefficient)| coefficient as i64 * difference(f))
            .sum();
        assert_eq!(difference(g) + along_tree, 0, "cycle of {}", network.activity(g));
        for &(f, coefficient) in tableau.cycle(g) {
            assert!(tableau.row(f).contains(&(g, coefficient)));
        }
    }
}

#[test]
fn rebuild_is_idempotent() {
    // ARRANGE
    let network = two_line_network();
    let mut tableau = two_line_tableau(&network);
    let before = tableau.clone();

    // ACT
    tableau.rebuild().unwrap();

    // ASSERT
    assert_eq!(tableau.objective(), before.objective());
    assert_eq!(tableau.robustness(), before.robustness());
    assert_eq!(tableau.timetable(), before.timetable());
    assert_eq!(tableau.modulo_assignment(), before.modulo_assignment());
    for activity_idx in network.activities() {
        assert_eq!(tableau.slack(activity_idx), before.slack(activity_idx));
        assert_eq!(tableau.cycle(activity_idx), before.cycle(activity_idx));
        assert_eq!(tableau.row(activity_idx), before.row(activity_idx));
    }
}

#[test]
fn apply_pivot_swaps_the_basis() {
    // ARRANGE
    let network = rigid_triangle_network();
    let mut tableau = Tableau::build(
        network.clone(),
        Basis::from_tree_edges(&network, [(a(0), true), (a(1), true)]).unwrap(),
    )
    .unwrap();

    let predicted = tableau.basis().fingerprint_after_swap(a(2), a(0), true);

    // ACT
    tableau.apply_pivot(a(2), a(0), true).unwrap();

    // ASSERT
    assert!(tableau.basis().is_tree(a(2)));
    assert!(!tableau.basis().is_tree(a(0)));
    assert_eq!(tableau.slack(a(0)), 0);
    assert_eq!(tableau.potential(EventIdx(1)), 2);
    assert_eq!(tableau.potential(EventIdx(2)), 5);
    let expected = Basis::from_tree_edges(&network, [(a(1), true), (a(2), true)]).unwrap();
    assert_eq!(tableau.basis().fingerprint(), expected.fingerprint());
    assert_eq!(tableau.basis().fingerprint(), predicted);
    assert_eq!(tableau.basis(), &expected);
}

#[test]
fn timetable_and_modulo_assignment_agree() {
    // ARRANGE
    let network = two_line_network();
    let tableau = two_line_tableau(&network);

    // ACT
    let timetable = tableau.timetable();

    // ASSERT
    assert!(timetable.is_feasible(&network));
    assert_eq!(timetable.weighted_slack(&network), tableau.objective());
    assert_eq!(
        ModuloAssignment::from_timetable(&network, &timetable),
        tableau.modulo_assignment()
    );
}

#[test]
fn corrupted_trees_are_rejected() {
    let network = two_line_network();

    // too few tree edges
    let result = Basis::from_tree_edges(&network, [(a(0), true), (a(1), true)]);
    assert_eq!(
        result,
        Err(TableauError::NotSpanningTree {
            tree_edges: 2,
            events: 6
        })
    );

    // headway_1, drive_bd and turn_d close the cycle l1_dep_a, l2_dep_b, l2_arr_d
    let result = Basis::from_tree_edges(
        &network,
        [(a(0), true), (a(6), true), (a(4), true), (a(5), true), (a(1), true)],
    );
    assert!(matches!(result, Err(TableauError::CycleInTree { activity }) if activity == "turn_d"));

    // a swap whose leaving edge is not on the cycle of the entering edge breaks the tree
    let mut tableau = two_line_tableau(&network);
    let before = tableau.objective();
    let result = tableau.apply_pivot(a(7), a(2), true);
    assert!(matches!(result, Err(TableauError::CycleInTree { .. })));
    assert_eq!(tableau.objective(), before);
    assert!(tableau.basis().is_tree(a(2)));
    assert!(!tableau.basis().is_tree(a(7)));
}

#[test]
fn contradicting_bounds_are_infeasible() {
    let network = contradicting_network();
    for at_lower in [true, false] {
        let basis = Basis::from_tree_edges(&network, [(a(0), at_lower)]).unwrap();
        let result = Tableau::build(network.clone(), basis);
        assert!(matches!(
            result,
            Err(TableauError::InfeasibleActivity { activity, .. }) if activity == "late"
        ));
    }
}

#[test]
fn debug_output_shows_the_network() {
    // ARRANGE
    let network = two_line_network();
    let tableau = two_line_tableau(&network);

    // ACT
    let text = format!("{:?}", tableau);

    // ASSERT
    assert!(text.contains("period: 10"));
    assert!(text.contains("drive_ab"));
}
