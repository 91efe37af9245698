//! Benchmarks for tree construction and the two traversals built on it:
//! bounded radius search (neighbor finding) and the Barnes-Hut gravity walk.

use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;

use rand::Rng;
use rand::SeedableRng;

use sph_core::dimension::ThreeD;
use sph_core::extent::Extent;
use sph_core::tree::collector::Collector;
use sph_core::tree::query::gravity_walk;
use sph_core::tree::query::radius_search;
use sph_core::tree::BhTree;
use sph_core::tree::TreeConfig;
use sph_core::tree::TreePoint;

fn random_points(n: usize) -> Vec<TreePoint<ThreeD, usize>> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    (0..n)
        .map(|i| TreePoint {
            index: i,
            position: glam::DVec3::new(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            ),
            mass: 1.0,
        })
        .collect()
}

fn extent() -> Extent<ThreeD> {
    Extent::new(glam::DVec3::new(-50.0, -50.0, -50.0), glam::DVec3::new(50.0, 50.0, 50.0))
}

fn bench_build(c: &mut Criterion) {
    let points = random_points(20_000);
    c.bench_function("tree_build_20k", |b| {
        b.iter(|| {
            let tree = BhTree::build(black_box(points.clone()), extent(), TreeConfig::default());
            black_box(tree.len())
        })
    });
}

fn bench_radius_search(c: &mut Criterion) {
    let points = random_points(20_000);
    let tree = BhTree::build(points, extent(), TreeConfig::default());
    c.bench_function("radius_search_20k", |b| {
        b.iter(|| {
            let mut collector: Collector<usize> = Collector::with_capacity(128);
            radius_search(&tree, black_box(glam::DVec3::new(0.0, 0.0, 0.0)), 5.0, &mut collector);
            black_box(collector.len())
        })
    });
}

fn bench_gravity_walk(c: &mut Criterion) {
    let points = random_points(20_000);
    let tree = BhTree::build(points, extent(), TreeConfig::default());
    c.bench_function("gravity_walk_20k", |b| {
        b.iter(|| {
            let result = gravity_walk(
                &tree,
                black_box(glam::DVec3::new(0.0, 0.0, 0.0)),
                None,
                0.5,
                1e-3,
                1.0,
            );
            black_box(result.potential)
        })
    });
}

criterion_group!(benches, bench_build, bench_radius_search, bench_gravity_walk);
criterion_main!(benches);
