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

use model::base_types::{ActivityIdx, ActivityKind};
use model::config::{Config, ConfigAnnealing, PivotStrategy};
use model::network::{Network, NetworkOptions};
use model::test_utilities::{build_network, rigid_triangle_network, two_line_network};
use solution::error::TableauError;
use solution::{Basis, Tableau};

use super::{
    build_pivot_rule, evaluate_pivot, pivot_candidates, Acceptance, ColumnMode, ColumnOrdered,
    PivotRule, SimulatedAnnealing, SteepestDescent, TabuSearch,
};
use crate::test_utilities::random_tableau;

fn tableau_with_tree(network: &Arc<Network>, tree: &[u32]) -> Tableau {
    let basis =
        Basis::from_tree_edges(network, tree.iter().map(|&idx| (ActivityIdx(idx), true))).unwrap();
    Tableau::build(network.clone(), basis).unwrap()
}

fn assert_feasible(tableau: &Tableau) {
    let network = tableau.network();
    for a in network.activities() {
        let slack = tableau.slack(a);
        assert!(0 <= slack && slack <= network.activity(a).span());
    }
    assert_eq!(
        tableau.basis().number_of_tree_edges() + 1,
        network.number_of_events()
    );
}

#[test]
fn evaluation_predicts_the_rebuilt_tableau() {
    for tableau in [
        tableau_with_tree(&two_line_network(), &[0, 1, 2, 3, 4]),
        random_tableau(1),
        random_tableau(2),
    ] {
        let candidates = pivot_candidates(&tableau);
        assert!(!candidates.is_empty());
        for (entering, leaving, coefficient, at_lower) in candidates {
            // ACT
            let prediction = evaluate_pivot(&tableau, entering, leaving, coefficient, at_lower);
            let mut pivoted = tableau.clone();
            let result = pivoted.apply_pivot(entering, leaving, at_lower);

            // ASSERT
            match prediction {
                Some(pivot) => {
                    assert!(result.is_ok());
                    assert_eq!(pivoted.objective(), tableau.objective() + pivot.delta);
                    assert_eq!(
                        pivoted.robustness(),
                        tableau.robustness() + pivot.robustness_delta
                    );
                    assert_feasible(&pivoted);
                }
                None => assert!(matches!(
                    result,
                    Err(TableauError::InfeasibleActivity { .. })
                )),
            }
        }
    }
}

#[test]
fn rigid_triangle_is_optimal() {
    // ARRANGE
    let network = rigid_triangle_network();
    let acceptance = Acceptance::new(0.0, None);
    let mut rules: Vec<Box<dyn PivotRule>> = vec![
        Box::new(SteepestDescent::new(acceptance)),
        Box::new(ColumnOrdered::new(acceptance, ColumnMode::Fastest)),
        Box::new(ColumnOrdered::new(acceptance, ColumnMode::Percentage(0.5))),
    ];

    for rule in rules.iter_mut() {
        let mut tableau = tableau_with_tree(&network, &[0, 1]);

        // ACT
        let pivoted = rule.find_and_apply_pivot(&mut tableau).unwrap();

        // ASSERT
        assert!(!pivoted);
        assert_eq!(tableau.objective(), 0);
        assert!(tableau.basis().is_tree(ActivityIdx(0)));
    }
}

#[test]
fn steepest_descent_strictly_decreases() {
    for seed in 0..4 {
        // ARRANGE
        let mut tableau = random_tableau(seed);
        let mut rule = SteepestDescent::new(Acceptance::new(0.0, None));
        let mut objective = tableau.objective();

        // ACT & ASSERT
        while rule.find_and_apply_pivot(&mut tableau).unwrap() {
            assert!(tableau.objective() < objective);
            objective = tableau.objective();
            assert_feasible(&tableau);
        }
        // a local optimum: no candidate improves
        assert!(pivot_candidates(&tableau)
            .into_iter()
            .filter_map(|(e, f, c, l)| evaluate_pivot(&tableau, e, f, c, l))
            .all(|pivot| pivot.delta >= 0));
    }
}

#[test]
fn column_ordered_rules_only_improve() {
    for mode in [ColumnMode::Fastest, ColumnMode::Percentage(0.3)] {
        let mut tableau = random_tableau(7);
        let mut rule = ColumnOrdered::new(Acceptance::new(0.0, None), mode);
        let mut objective = tableau.objective();
        while rule.find_and_apply_pivot(&mut tableau).unwrap() {
            assert!(tableau.objective() < objective);
            objective = tableau.objective();
        }
        assert_feasible(&tableau);
    }
}

#[test]
fn minimum_improvement_rejects_small_gains() {
    let acceptance = Acceptance::new(0.1, None);
    assert!(acceptance.is_improvement(100, -10));
    assert!(!acceptance.is_improvement(100, -9));
    assert!(!acceptance.is_improvement(0, 0));
}

#[test]
fn robustness_threshold() {
    let acceptance = Acceptance::new(0.0, Some(10));
    assert!(acceptance.robustness_admissible(12, -2));
    assert!(!acceptance.robustness_admissible(12, -3));
    // below the threshold already: only non-decreasing changes
    assert!(acceptance.robustness_admissible(5, 0));
    assert!(!acceptance.robustness_admissible(5, -1));
    assert!(Acceptance::new(0.0, None).robustness_admissible(0, -100));
}

#[test]
fn tabu_search_ends_in_its_best_basis() {
    // ARRANGE
    let mut tableau = random_tableau(3);
    let initial = tableau.objective();
    let mut rule = TabuSearch::new(Acceptance::new(0.0, None), 10, 5);
    let mut best = initial;

    // ACT
    let mut steps = 0;
    while rule.find_and_apply_pivot(&mut tableau).unwrap() {
        best = best.min(tableau.objective());
        assert_feasible(&tableau);
        steps += 1;
        assert!(steps < 10_000);
    }

    // ASSERT
    assert_eq!(tableau.objective(), best);
    assert!(best <= initial);
}

#[test]
fn simulated_annealing_is_reproducible() {
    let annealing = ConfigAnnealing {
        temperature: 10.0,
        cooling_factor: 0.8,
        min_temperature: 0.5,
    };
    let run = || {
        let mut tableau = random_tableau(5);
        let mut rule = SimulatedAnnealing::new(Acceptance::new(0.0, None), &annealing, 42);
        let mut objectives = vec![tableau.objective()];
        while rule.find_and_apply_pivot(&mut tableau).unwrap() {
            objectives.push(tableau.objective());
            assert!(objectives.len() < 10_000);
        }
        assert!(rule.temperature() <= 10.0);
        assert_feasible(&tableau);
        objectives
    };
    assert_eq!(run(), run());
}

#[test]
fn every_configured_rule_terminates() {
    for strategy in [
        PivotStrategy::Steepest,
        PivotStrategy::Fastest,
        PivotStrategy::Percentage,
        PivotStrategy::SimulatedAnnealing,
        PivotStrategy::TabuSearch,
        PivotStrategy::Hybrid,
    ] {
        let mut config = Config::default();
        config.pivot.strategy = strategy;
        config.pivot.annealing.temperature = 5.0;
        let mut rule = build_pivot_rule(&config);
        let mut tableau = random_tableau(11);
        let mut steps = 0;
        while rule.find_and_apply_pivot(&mut tableau).unwrap() {
            steps += 1;
            assert!(steps < 10_000, "{:?} does not terminate", strategy);
        }
        assert_feasible(&tableau);
    }
}

#[test]
fn annealing_takes_decreases_below_the_improvement_threshold() {
    // ARRANGE: drive in the tree at its upper bound; the only feasible pivot puts wait at its
    // lower bound and lowers the objective from 6 to 0
    let network = build_network(
        10,
        &["dep", "arr"],
        &[
            ("drive", ActivityKind::Drive, "dep", "arr", 2, 5, 1),
            ("wait", ActivityKind::Wait, "dep", "arr", 2, 6, 1),
        ],
        &NetworkOptions::default(),
    );
    let basis = Basis::from_tree_edges(&network, [(ActivityIdx(0), false)]).unwrap();
    let mut tableau = Tableau::build(network.clone(), basis).unwrap();
    assert_eq!(tableau.objective(), 6);
    let annealing = ConfigAnnealing {
        temperature: 1.0,
        cooling_factor: 0.9,
        min_temperature: 0.1,
    };
    // no decrease can reach twice the objective
    let acceptance = Acceptance::new(2.0, None);
    let mut steepest = SteepestDescent::new(acceptance);
    let mut rule = SimulatedAnnealing::new(acceptance, &annealing, 3);

    // ACT
    let steepest_found = steepest.find_and_apply_pivot(&mut tableau.clone()).unwrap();
    let annealing_found = rule.find_and_apply_pivot(&mut tableau).unwrap();

    // ASSERT
    assert!(!steepest_found);
    assert!(annealing_found);
    assert_eq!(tableau.objective(), 0);
    assert_feasible(&tableau);
}
