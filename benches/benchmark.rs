use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use ordered_avl::{AvlTree, Neighbor};

const N: usize = 100_000;

pub fn benchmarks(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let values: Vec<i32> = (1..=N).map(|_| rng.gen()).collect();

    c.bench_function("tree_insert", |b| {
        let mut tree = AvlTree::new();
        b.iter(|| {
            for value in &values {
                tree.insert(*value);
            }
        })
    });

    let tree: AvlTree<i32> = values.iter().copied().collect();

    c.bench_function("tree_search", |b| {
        b.iter(|| {
            for value in &values {
                black_box(tree.search(value));
            }
        })
    });

    c.bench_function("tree_find_neighbor", |b| {
        b.iter(|| {
            for value in &values {
                black_box(tree.find_neighbor(value, Neighbor::Successor));
            }
        })
    });

    c.bench_function("tree_find", |b| {
        b.iter(|| black_box(tree.find(&-1_000_000, &1_000_000)))
    });

    c.bench_function("tree_split_join", |b| {
        let mut tree = tree.clone();
        b.iter(|| {
            let (mut less, mut greater) = (AvlTree::new(), AvlTree::new());
            tree.split(&0, &mut less, &mut greater);
            let pivot_present = greater.remove(&0);
            tree.join(&mut less, 0, &mut greater);
            if !pivot_present {
                tree.remove(&0);
            }
        })
    });

    c.bench_function("tree_remove", |b| {
        let mut tree = tree.clone();
        b.iter(|| {
            for value in &values {
                tree.remove(value);
            }
        })
    });
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
