use criterion::{criterion_group, criterion_main, Criterion};
use model::base_types::ActivityIdx;
use model::test_utilities::two_line_network;
use solution::{Basis, Tableau};

pub fn tableau_benchmarks(c: &mut Criterion) {
    let network = two_line_network();
    let basis = Basis::from_tree_edges(
        &network,
        (0..5).map(|idx| (ActivityIdx(idx), true)),
    )
    .unwrap();
    let tableau = Tableau::build(network.clone(), basis.clone()).unwrap();

    c.bench_function("build", |b| {
        b.iter(|| {
            Tableau::build(network.clone(), basis.clone()).unwrap();
        })
    });

    c.bench_function("apply_pivot", |b| {
        b.iter(|| {
            // headway_1 at its upper bound replaces change_b
            let mut tableau = tableau.clone();
            tableau.apply_pivot(ActivityIdx(6), ActivityIdx(3), false).unwrap();
        })
    });
}

criterion_group!(benches, tableau_benchmarks);
criterion_main!(benches);
