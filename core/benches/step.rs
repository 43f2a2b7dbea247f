use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use cellular_core::prelude::*;

criterion_group!(step, lattice_benchmark, history_benchmark);
criterion_main!(step);

fn lattice_benchmark(c: &mut Criterion) {
    bench_lattice(c, Topology::Square, &[128, 128], 1);
    bench_lattice(c, Topology::Hexagonal, &[128, 128], 1);
    bench_lattice(c, Topology::Triangular, &[128, 128], 2);
    bench_lattice(c, Topology::Cubic, &[24, 24, 24], 1);
}

fn history_benchmark(c: &mut Criterion) {
    // Replaying a generation only unpacks a snapshot.
    c.bench_function("replay_128x128", |b| {
        b.iter_batched(
            || {
                let mut session = session(&[128, 128]);
                for _ in 0..10 {
                    session.step().expect("Failed to step");
                }
                session.seek_to(0).expect("Failed to seek");
                session
            },
            |mut session| {
                for _ in 0..10 {
                    session.step().expect("Failed to step");
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lattice(c: &mut Criterion, topology: Topology, extents: &[usize], radius: usize) {
    let mut group = c.benchmark_group(format!("step_{}_r{}", topology, radius));
    group.sample_size(10);
    let size = extents
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("x");
    group.bench_function(format!("{}_10_gens", size), |b| {
        b.iter_batched(
            || {
                let mut session = session(extents);
                session.set_rule(topology.default_rule());
                session
                    .set_lattice(topology, radius)
                    .expect("Failed to set lattice");
                session
            },
            |mut session| {
                for _ in 0..10 {
                    session.step().expect("Failed to step");
                }
                session.current_population().map(Population::live_count)
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn session(extents: &[usize]) -> Session {
    let mut session = Session::with_rng_seed(0);
    session
        .seed(Shape::with_extents(extents).expect("Bad shape"), 0.3)
        .expect("Failed to seed");
    session
}
