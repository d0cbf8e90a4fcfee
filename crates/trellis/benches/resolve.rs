//! Resolution benchmarks: full passes against incremental ones.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use trellis::{
    Core, NodeId,
    backend::BackendRegistry,
    geom::{Axis, Extent},
    layout::Dimension,
    testing::tree::{core_with, grid_tree},
};

/// A settled tree of depth 4 and fan-out 6, returning its leaves.
fn settled_grid() -> (Core, Vec<NodeId>) {
    let mut core = core_with(BackendRegistry::new(), 1200.0, 400.0);
    let nodes = grid_tree(&mut core, 4, 6).expect("Failed to build grid");
    core.update();
    let leaves = nodes
        .into_iter()
        .filter(|id| core.children(*id).is_empty())
        .collect();
    (core, leaves)
}

/// Resolve every widget after a viewport resize.
fn benchmark_full_resolve(c: &mut Criterion) {
    let (mut core, _) = settled_grid();
    let mut wide = false;
    c.bench_function("full_resolve", |b| {
        b.iter(|| {
            wide = !wide;
            let w = if wide { 1300.0 } else { 1200.0 };
            core.set_viewport(Extent::new(w, 400.0));
            black_box(core.update());
        });
    });
}

/// Resolve after touching a single leaf.
fn benchmark_incremental_resolve(c: &mut Criterion) {
    let (mut core, leaves) = settled_grid();
    let leaf = leaves[leaves.len() / 2];
    let mut h = 1.0;
    c.bench_function("incremental_resolve", |b| {
        b.iter(|| {
            h = if h > 1.0 { 1.0 } else { 2.0 };
            core.set_dimension(leaf, Axis::Y, Dimension::Fixed(h))
                .expect("Failed to set dimension");
            black_box(core.update());
        });
    });
}

/// Build and resolve a tree from nothing.
fn benchmark_cold_build(c: &mut Criterion) {
    c.bench_function("cold_build", |b| {
        b.iter(|| black_box(settled_grid()));
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = benchmark_full_resolve, benchmark_incremental_resolve, benchmark_cold_build
}
criterion_main!(benches);
