use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use itertools::Itertools;
use tree_edit_solver::{Solver, Strategy, TreeNode};

fn tree(leaves: Vec<TreeNode<u8>>, r: usize, label: u8) -> TreeNode<u8> {
    if leaves.len() < r {
        TreeNode::new(label, leaves)
    } else {
        let chunks = (leaves.len() + r - 1) / r;
        let children: Vec<_> = leaves
            .into_iter()
            .chunks(chunks)
            .into_iter()
            .map(|c| tree(c.collect(), r, label))
            .collect();

        TreeNode::new(label, children)
    }
}

fn leaves(n: usize, alphabet: u8) -> Vec<TreeNode<u8>> {
    (0..n).map(|i| TreeNode::leaf(i as u8 % alphabet)).collect()
}

fn bench(c: &mut Criterion) {
    let solver = Solver::<u64>::default();

    for strategy in Strategy::ALL {
        let mut group = c.benchmark_group(format!("{strategy}"));

        for r in [4, 8] {
            let a = tree(leaves(24, 3), r, 0);
            let b = tree(leaves(24, 4), r, 1);

            group.bench_with_input(BenchmarkId::from_parameter(r), &(a, b), |bench, (a, b)| {
                bench.iter(|| solver.solve(strategy, Some(a), Some(b)))
            });
        }

        group.finish();
    }
}

criterion_group!(benches, bench);
criterion_main!(benches);
