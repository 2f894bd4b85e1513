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

use model::base_types::{ActivityKind, EventIdx};
use model::network::NetworkOptions;
use model::test_utilities::{
    build_network, contradicting_network, forced_slack_triangle, two_line_network,
};
use model::timetable::Timetable;
use solution::{ModuloAssignment, Tableau};

use super::{
    solve_non_periodic, tableau_from_assignment, tableau_from_timetable, NonPeriodicProblem,
};
use crate::error::SolveError;
use crate::test_utilities::{random_feasible_network, random_tableau};

#[test]
fn potentials_respect_the_shifted_bounds() {
    for seed in 0..5 {
        // ARRANGE
        let (network, timetable) = random_feasible_network(seed, 10, 25, 30);
        let assignment = ModuloAssignment::from_timetable(&network, &timetable);
        let problem = NonPeriodicProblem::new(&network, &assignment);

        // ACT
        let solution = solve_non_periodic(&problem).unwrap();

        // ASSERT
        for a in network.activities() {
            let activity = network.activity(a);
            let (lower, upper) = problem.bounds(a);
            let difference =
                solution.potential(activity.head()) - solution.potential(activity.tail());
            assert!(lower <= difference && difference <= upper);
        }
        // the given timetable is a feasible point of the same problem
        assert!(solution.objective(&network) <= timetable.weighted_slack(&network));
    }
}

#[test]
fn decoded_tree_reproduces_the_optimum() {
    for seed in 0..5 {
        // ARRANGE
        let (network, timetable) = random_feasible_network(seed + 100, 12, 30, 20);
        let assignment = ModuloAssignment::from_timetable(&network, &timetable);
        let solution = solve_non_periodic(&NonPeriodicProblem::new(&network, &assignment)).unwrap();
        let objective = solution.objective(&network);

        // ACT
        let basis = solution.into_basis(&network).unwrap();
        let tableau = Tableau::build(network.clone(), basis).unwrap();

        // ASSERT
        assert_eq!(
            tableau.basis().number_of_tree_edges() + 1,
            network.number_of_events()
        );
        assert_eq!(tableau.objective(), objective);
        assert!(tableau.timetable().is_feasible(&network));
    }
}

#[test]
fn tree_solutions_are_not_worsened() {
    for tableau in [random_tableau(21), random_tableau(22)] {
        // ACT
        let resolved = tableau_from_assignment(tableau.network(), &tableau.modulo_assignment())
            .unwrap();

        // ASSERT
        assert!(resolved.objective() <= tableau.objective());
        assert_eq!(resolved.modulo_assignment().len(), tableau.modulo_assignment().len());
    }
}

#[test]
fn two_line_timetable_is_reduced_to_tree_form() {
    // ARRANGE: feasible, weighted slack 30
    let network = two_line_network();
    let timetable = Timetable::new(vec![0, 5, 6, 8, 8, 2], 10);
    assert!(timetable.is_feasible(&network));

    // ACT
    let tableau = tableau_from_timetable(&network, &timetable).unwrap();

    // ASSERT
    assert!(tableau.objective() <= timetable.weighted_slack(&network));
    assert_eq!(tableau.potential(EventIdx(0)), 0);
    assert!(tableau.timetable().is_feasible(&network));
}

#[test]
fn contradicting_bounds_are_reported() {
    // ARRANGE
    let network = contradicting_network();
    let timetable = Timetable::new(vec![0, 1], 10);

    // ACT
    let result = tableau_from_timetable(&network, &timetable);

    // ASSERT
    match result {
        Err(SolveError::InfeasibleInstance(message)) => {
            assert!(message.contains("early") || message.contains("late"));
        }
        other => panic!("expected InfeasibleInstance, got {:?}", other.map(|t| t.objective())),
    }
}

#[test]
fn loops_are_checked_directly() {
    // ARRANGE
    let events = ["dep", "arr"];
    let feasible = build_network(
        10,
        &events,
        &[
            ("drive", ActivityKind::Drive, "dep", "arr", 2, 5, 1),
            ("cycle", ActivityKind::Turnaround, "arr", "arr", 8, 12, 1),
        ],
        &NetworkOptions::default(),
    );
    let infeasible = build_network(
        10,
        &events,
        &[
            ("drive", ActivityKind::Drive, "dep", "arr", 2, 5, 1),
            ("cycle", ActivityKind::Turnaround, "arr", "arr", 3, 4, 1),
        ],
        &NetworkOptions::default(),
    );
    let timetable = Timetable::new(vec![0, 2], 10);

    // ACT
    let tableau = tableau_from_timetable(&feasible, &timetable).unwrap();
    let result = tableau_from_timetable(&infeasible, &timetable);

    // ASSERT: the loop has tension 10 = lower + 2, drive sits at its lower bound
    assert_eq!(tableau.objective(), 2);
    assert!(matches!(result, Err(SolveError::InfeasibleInstance(_))));
}

#[test]
fn guessed_modulo_parameters_may_contradict() {
    // ARRANGE: all events at 0 violate bc; its nearest modulo parameter contradicts ab and ac
    let network = forced_slack_triangle();
    let timetable = Timetable::new(vec![0, 0, 0], 10);
    let assignment = ModuloAssignment::from_timetable(&network, &timetable);

    // ACT
    let result = tableau_from_assignment(&network, &assignment);

    // ASSERT
    match result {
        Err(SolveError::ContradictingModuloParameters(cycle)) => {
            assert_eq!(cycle.activities().len(), 3);
            assert!(!cycle.is_periodically_infeasible(&network));
            assert!(!cycle.repairs(&network, &assignment, &timetable).is_empty());
        }
        other => panic!(
            "expected ContradictingModuloParameters, got {:?}",
            other.map(|t| t.objective())
        ),
    }
}

#[test]
fn contradicting_modulo_parameters_are_repaired() {
    // ARRANGE
    let network = forced_slack_triangle();
    let timetable = Timetable::new(vec![0, 0, 0], 10);
    assert!(!timetable.is_feasible(&network));

    // ACT
    let tableau = tableau_from_timetable(&network, &timetable).unwrap();

    // ASSERT: b is 8 after a in every feasible timetable
    assert!(tableau.timetable().is_feasible(&network));
    assert_eq!(tableau.objective(), 800);
    assert_eq!(
        tableau.timetable().weighted_slack(&network),
        tableau.objective()
    );
}
